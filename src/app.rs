use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use handlebars::Handlebars;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::downloader::TemplateKind;
use crate::error::{Error, Result, ValidationError};
use crate::form::{FormView, SelectedFile, UploadForm};
use crate::uploader::{HttpUploader, UPLOAD_FIELD, Uploader};

const PAGE: &str = "index";

/// Form state plus the alert waiting to be shown on the next render.
#[derive(Default)]
struct Page {
    form: UploadForm,
    alert: Option<&'static str>,
}

pub struct AppState {
    page: Mutex<Page>,
    uploader: Arc<dyn Uploader>,
    templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(uploader: Arc<dyn Uploader>) -> Result<Arc<Self>> {
        let mut templates = Handlebars::new();
        templates.register_template_string(PAGE, include_str!("./static/index.html"))?;

        Ok(Arc::new(AppState {
            page: Mutex::new(Page::default()),
            uploader,
            templates,
        }))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_page))
        .route("/template/:kind", get(download_template))
        .route("/upload", post(upload_file))
        .route("/api/state", get(get_state))
        // Files are only size-checked by the backend
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let uploader = HttpUploader::new(&config.api_base_url);
    log::info!("uploads go to {}", uploader.endpoint());

    let state = AppState::new(Arc::new(uploader))?;
    let app = router(state);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    log::info!("Listening on http://{}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        log::error!("request failed: {:?}", self);
        let status = match &self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NetworkFailure { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

async fn serve_page(State(state): State<Arc<AppState>>) -> std::result::Result<Html<String>, Error> {
    let mut page = state.page.lock().await;
    let alert = page.alert.take();
    let view = page.form.view();

    let data = serde_json::json!({
        "file_name": view.file_name,
        "error": view.error,
        "template_downloaded": view.template_downloaded,
        "can_submit": view.can_submit,
        "alert": alert,
        "alert_json": alert.map(|text| serde_json::Value::from(text).to_string()),
    });

    Ok(Html(state.templates.render(PAGE, &data)?))
}

async fn download_template(
    Path(kind): Path<String>,
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Response, Error> {
    let Some(kind) = TemplateKind::from_extension(&kind) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let file = state.page.lock().await.form.download_template(kind)?;
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response())
}

// Pull the `file` part out of the form. An empty file input still posts a
// nameless, empty part, which counts as no selection.
async fn read_upload(multipart: &mut Multipart) -> std::result::Result<Option<SelectedFile>, ValidationError> {
    let unreadable = |e: axum::extract::multipart::MultipartError| ValidationError::UnreadableFile {
        reason: e.to_string(),
    };

    let mut chosen = None;
    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(unreadable)?;
        if !name.is_empty() || !bytes.is_empty() {
            chosen = Some(SelectedFile::new(name, bytes.to_vec()));
        }
    }

    Ok(chosen)
}

async fn upload_file(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Redirect {
    let received = read_upload(&mut multipart).await;

    let mut page = state.page.lock().await;
    let outcome = match received {
        Ok(chosen) => {
            if let Some(file) = chosen {
                let (name, len) = (file.name.clone(), file.bytes.len());
                if page.form.select_file(Some(file)) {
                    log::info!("file selected: {} ({} bytes)", name, len);
                }
            }
            page.form.submit(state.uploader.as_ref()).await
        }
        Err(reason) => page.form.reject(reason),
    };
    page.alert = outcome.alert();

    Redirect::to("/")
}

async fn get_state(State(state): State<Arc<AppState>>) -> Json<FormView> {
    let page = state.page.lock().await;
    Json(page.form.view())
}
