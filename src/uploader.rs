use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::error::{Error, Result};
use crate::form::SelectedFile;

/// Multipart field the upload endpoint reads the file from.
pub const UPLOAD_FIELD: &str = "file";

/// Path of the upload endpoint relative to the configured base URL.
pub const UPLOAD_PATH: &str = "/api/upload/";

/// Destination for validated contact files.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: &SelectedFile) -> Result<()>;
}

/// Posts files to `{base_url}/api/upload/` as `multipart/form-data`.
///
/// One request per call: no timeout, retry or de-duplication.
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(base_url: &str) -> Self {
        HttpUploader {
            client: reqwest::Client::new(),
            endpoint: upload_endpoint(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Joins the base URL and the upload path without doubling slashes.
///
/// # Examples
/// ```
/// use contact_upload::uploader::upload_endpoint;
///
/// assert_eq!(upload_endpoint("http://api.local/"), "http://api.local/api/upload/");
/// ```
pub fn upload_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), UPLOAD_PATH)
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, file: &SelectedFile) -> Result<()> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::NetworkFailure {
                status: None,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NetworkFailure {
                status: Some(status.as_u16()),
                reason: format!("upload endpoint answered {}", status),
            });
        }

        log::info!("uploaded {} ({} bytes) to {}", file.name, file.bytes.len(), self.endpoint);
        Ok(())
    }
}
