#![cfg(feature = "web")]

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use contact_upload::app::{AppState, router};
use contact_upload::downloader::csv_template;
use contact_upload::error::{Error, Result};
use contact_upload::form::SelectedFile;
use contact_upload::uploader::Uploader;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const BOUNDARY: &str = "contact-upload-test-boundary";

#[derive(Default)]
struct RecordingUploader {
    calls: Mutex<Vec<SelectedFile>>,
}

#[async_trait]
impl Uploader for RecordingUploader {
    async fn upload(&self, file: &SelectedFile) -> Result<()> {
        self.calls.lock().unwrap().push(file.clone());
        Ok(())
    }
}

fn setup() -> (Arc<AppState>, Arc<RecordingUploader>) {
    let uploader = Arc::new(RecordingUploader::default());
    let state = AppState::new(uploader.clone()).unwrap();
    (state, uploader)
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Vec<(String, String)>, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router(state.clone()).oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn page(state: &Arc<AppState>) -> String {
    let (status, _, body) = get(state, "/").await;
    assert_eq!(status, StatusCode::OK);
    String::from_utf8(body).unwrap()
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn file_part(file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body
}

async fn post_body(state: &Arc<AppState>, body: Vec<u8>) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        "/"
    );
    response.status()
}

async fn post_file(state: &Arc<AppState>, file_name: &str, bytes: &[u8]) -> StatusCode {
    let mut body = file_part(file_name, bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    post_body(state, body).await
}

async fn form_state(state: &Arc<AppState>) -> serde_json::Value {
    let (_, _, body) = get(state, "/api/state").await;
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn fresh_page_locks_upload_step() {
    let (state, _) = setup();
    let html = page(&state).await;

    assert!(html.contains("Contact Data Upload"));
    assert!(html.contains("Click or drag file here"));
    assert!(html.contains("card locked"));
    assert!(html.contains("accept=\".xlsx,.csv\" disabled"));
    assert!(!html.contains("window.addEventListener(\"load\""));
    println!("✓ landing page renders with step 2 locked");
}

#[tokio::test]
async fn template_downloads_are_attachments() {
    let (state, _) = setup();

    let (status, headers, body) = get(&state, "/template/csv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, csv_template().into_bytes());
    assert_eq!(
        header_value(&headers, "content-disposition"),
        Some("attachment; filename=\"contact_template.csv\"")
    );
    assert_eq!(header_value(&headers, "content-type"), Some("text/csv;charset=utf-8"));

    let (status, headers, body) = get(&state, "/template/xlsx").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(b"PK\x03\x04"));
    assert_eq!(
        header_value(&headers, "content-disposition"),
        Some("attachment; filename=\"contact_template.xlsx\"")
    );

    let (status, _, _) = get(&state, "/template/pdf").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let html = page(&state).await;
    assert!(!html.contains("card locked"));
    assert!(html.contains("Template downloaded"));
}

#[tokio::test]
async fn invalid_upload_shows_inline_error() {
    let (state, uploader) = setup();
    get(&state, "/template/csv").await;

    let status = post_file(&state, "contacts.csv", b"name,email\nJane,jane@test.com\n").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(uploader.calls.lock().unwrap().is_empty());

    let view = form_state(&state).await;
    assert_eq!(view["error"], "Missing columns: name, email, message");
    assert_eq!(view["file_name"], "contacts.csv");

    let html = page(&state).await;
    assert!(html.contains("Missing columns: name, email, message"));
}

#[tokio::test]
async fn valid_upload_is_forwarded_and_alerted_once() {
    let (state, uploader) = setup();
    get(&state, "/template/xlsx").await;

    let bytes = b"name,email,message\nJane,jane@test.com,Hi\n";
    post_file(&state, "contacts.csv", bytes).await;

    let calls = uploader.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![SelectedFile::new("contacts.csv", bytes.to_vec())]);

    let html = page(&state).await;
    assert!(html.contains("alert(\"Upload successful!\")"));

    // The alert is consumed by the first render
    let html = page(&state).await;
    assert!(!html.contains("alert(\"Upload successful!\")"));
    assert!(html.contains("Click or drag file here"));
}

#[tokio::test]
async fn submit_without_template_or_file_alerts() {
    let (state, uploader) = setup();

    // Before a template download the selection is ignored
    post_file(&state, "contacts.csv", b"name,email,message\nJane,jane@test.com,Hi\n").await;
    assert!(uploader.calls.lock().unwrap().is_empty());
    assert_eq!(form_state(&state).await["file_name"], serde_json::Value::Null);

    let html = page(&state).await;
    assert!(html.contains("alert(\"Please select a file first.\")"));
}

#[tokio::test]
async fn large_file_is_forwarded_whole() {
    let (state, uploader) = setup();
    get(&state, "/template/csv").await;

    let mut csv = String::from("name,email,message\n");
    while csv.len() < 3 * 1024 * 1024 {
        csv.push_str("Jane Doe,jane@test.com,Hello from a rather long contact export\n");
    }

    let status = post_file(&state, "contacts.csv", csv.as_bytes()).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let calls = uploader.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].bytes, csv.into_bytes());
    assert!(page(&state).await.contains("alert(\"Upload successful!\")"));
    println!("✓ a 3 MB file goes through the form untouched");
}

#[tokio::test]
async fn truncated_form_body_is_shown_inline() {
    let (state, uploader) = setup();
    get(&state, "/template/csv").await;

    // The part never ends: no closing boundary
    let body = file_part("contacts.csv", b"name,email,message\nJane,jane@te");
    let status = post_body(&state, body).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(uploader.calls.lock().unwrap().is_empty());

    let view = form_state(&state).await;
    assert_eq!(view["error"], "Could not read file");

    let html = page(&state).await;
    assert!(html.contains("Could not read file"));
    assert!(!html.contains("window.addEventListener(\"load\""));
}

#[test]
fn errors_map_to_status_codes() {
    use axum::response::IntoResponse;

    let render = Error::from(handlebars::RenderError::new("missing partial"));
    assert!(matches!(render, Error::Render(_)));
    assert_eq!(render.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

    let network = Error::NetworkFailure {
        status: Some(503),
        reason: "unavailable".to_string(),
    };
    assert_eq!(network.into_response().status(), StatusCode::BAD_GATEWAY);

    let invalid = Error::from(contact_upload::error::ValidationError::EmptyFile);
    assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
}
