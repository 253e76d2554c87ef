use serde::Serialize;

use crate::downloader::{TemplateFile, TemplateKind};
use crate::error::{Error, Result, ValidationError};
use crate::uploader::Uploader;
use crate::validator::validate_bytes;

pub const ALERT_NO_FILE: &str = "Please select a file first.";
pub const ALERT_UPLOADED: &str = "Upload successful!";
pub const ALERT_FAILED: &str = "Upload failed. Please try again.";

/// A file picked by the user, kept in memory until it is submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        SelectedFile {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// What happened to a submit attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    NoFileSelected,
    /// Validation refused the file; nothing was sent.
    Rejected(ValidationError),
    Uploaded,
    UploadFailed(Error),
}

impl SubmitOutcome {
    /// Blocking message to pop up, if any. Rejections are shown inline
    /// instead.
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            SubmitOutcome::NoFileSelected => Some(ALERT_NO_FILE),
            SubmitOutcome::Rejected(_) => None,
            SubmitOutcome::Uploaded => Some(ALERT_UPLOADED),
            SubmitOutcome::UploadFailed(_) => Some(ALERT_FAILED),
        }
    }
}

/// State of the two-step upload page: download a template, then upload a
/// filled-in file.
#[derive(Debug, Default)]
pub struct UploadForm {
    selected: Option<SelectedFile>,
    error: Option<String>,
    template_downloaded: bool,
}

/// Serializable snapshot of [`UploadForm`] for rendering.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FormView {
    pub file_name: Option<String>,
    pub error: Option<String>,
    pub template_downloaded: bool,
    pub can_submit: bool,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn template_downloaded(&self) -> bool {
        self.template_downloaded
    }

    pub fn can_submit(&self) -> bool {
        self.template_downloaded && self.selected.is_some()
    }

    pub fn view(&self) -> FormView {
        FormView {
            file_name: self.selected.as_ref().map(|file| file.name.clone()),
            error: self.error.clone(),
            template_downloaded: self.template_downloaded,
            can_submit: self.can_submit(),
        }
    }

    /// Render a template and unlock the upload step.
    pub fn download_template(&mut self, kind: TemplateKind) -> Result<TemplateFile> {
        let file = kind.render()?;
        self.template_downloaded = true;
        log::info!("template downloaded: {}", file.file_name);
        Ok(file)
    }

    /// Record the user's file choice; `None` clears it.
    ///
    /// The file input stays disabled until a template has been downloaded,
    /// so earlier selections are ignored. Returns whether the selection was
    /// taken.
    pub fn select_file(&mut self, file: Option<SelectedFile>) -> bool {
        if !self.template_downloaded {
            log::debug!("file selection ignored: no template downloaded yet");
            return false;
        }
        self.selected = file;
        true
    }

    /// Refuse a file that could not even be received, showing `reason` as the
    /// inline error like any other rejection.
    pub fn reject(&mut self, reason: ValidationError) -> SubmitOutcome {
        log::info!("rejected upload: {}", reason.detail());
        self.error = Some(reason.to_string());
        SubmitOutcome::Rejected(reason)
    }

    /// Validate the selected file and, if it passes, hand it to `uploader`.
    ///
    /// Invalid files never reach the uploader; their reason becomes the
    /// inline error. A failed upload keeps the selection so the user can
    /// try again.
    pub async fn submit<U: Uploader + ?Sized>(&mut self, uploader: &U) -> SubmitOutcome {
        let file = match &self.selected {
            Some(file) => file,
            None => return SubmitOutcome::NoFileSelected,
        };

        if let Err(reason) = validate_bytes(&file.bytes) {
            log::info!("rejected {}: {}", file.name, reason.detail());
            self.error = Some(reason.to_string());
            return SubmitOutcome::Rejected(reason);
        }
        self.error = None;

        match uploader.upload(file).await {
            Ok(()) => {
                self.selected = None;
                SubmitOutcome::Uploaded
            }
            Err(e) => {
                log::warn!("upload of {} failed: {:?}", file.name, e);
                SubmitOutcome::UploadFailed(e)
            }
        }
    }
}
