use thiserror::Error;

use crate::row::Field;

/// Reasons a contact file is refused before anything is sent.
///
/// The `Display` text of each variant is the message shown next to the
/// upload control. The extra fields carry detail for logs and callers that
/// want to point at the offending cell; they never change the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The file has no data rows.
    #[error("File is empty")]
    EmptyFile,

    /// The header row lacks one or more of `name`, `email`, `message`.
    #[error("Missing columns: name, email, message")]
    MissingColumns { missing: Vec<&'static str> },

    /// A data row has a blank name/message or a malformed email.
    /// `row` is 1-based and counts data rows only.
    #[error("Some rows have invalid or missing data")]
    InvalidRowData { row: usize, field: Field },

    /// The bytes could not be parsed as a workbook or CSV table.
    #[error("Could not read file")]
    UnreadableFile { reason: String },
}

impl ValidationError {
    /// Longer description including which column or row failed.
    pub fn detail(&self) -> String {
        match self {
            ValidationError::EmptyFile => self.to_string(),
            ValidationError::MissingColumns { missing } => {
                format!("missing columns: {}", missing.join(", "))
            }
            ValidationError::InvalidRowData { row, field } => {
                format!("row {}: invalid or missing {}", row, field)
            }
            ValidationError::UnreadableFile { reason } => {
                format!("could not read file: {}", reason)
            }
        }
    }
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The upload request failed or the endpoint answered with a non-2xx
    /// status. The server's body is never inspected.
    #[error("Upload failed. Please try again.")]
    NetworkFailure { status: Option<u16>, reason: String },

    #[error("Could not build template: {0}")]
    Template(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[cfg(feature = "web")]
    #[error("Could not render page: {0}")]
    Render(#[from] handlebars::RenderError),

    #[cfg(feature = "web")]
    #[error("Invalid page template: {0}")]
    PageTemplate(#[from] handlebars::TemplateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
