use crate::error::ValidationError;
use crate::loader::{FileFormat, Table, read_table};
use crate::row::{Field, REQUIRED_COLUMNS, Row};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Deliberately loose: something@something.something, no whitespace or
    // extra `@` in any part.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Summary of a file that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedFile {
    pub format: FileFormat,
    pub rows: usize,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

impl Row {
    /// Checks the per-row constraints, reporting the first failing field.
    ///
    /// `name` and `message` must have non-whitespace content; `email` is
    /// matched as-is, without trimming.
    pub fn check(&self) -> Result<(), Field> {
        if self.name.trim().is_empty() {
            return Err(Field::Name);
        }
        if !is_valid_email(&self.email) {
            return Err(Field::Email);
        }
        if self.message.trim().is_empty() {
            return Err(Field::Message);
        }
        Ok(())
    }
}

/// Validate an already parsed table, returning the number of data rows.
///
/// The whole table is accepted or rejected; the first failing row decides
/// the error.
///
/// # Examples
/// ```
/// use contact_upload::loader::Table;
/// use contact_upload::validator::validate_table;
///
/// let table = Table::from_grid(vec![
///     vec!["name".into(), "email".into(), "message".into()],
///     vec!["Jane".into(), "jane@test.com".into(), "Hi".into()],
/// ]);
/// assert_eq!(validate_table(&table), Ok(1));
/// ```
pub fn validate_table(table: &Table) -> Result<usize, ValidationError> {
    if table.is_empty() {
        return Err(ValidationError::EmptyFile);
    }

    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !table.has_column(column))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingColumns { missing });
    }

    for (index, record) in table.records.iter().enumerate() {
        if let Err(field) = Row::from_record(record).check() {
            return Err(ValidationError::InvalidRowData {
                row: index + 1,
                field,
            });
        }
    }

    Ok(table.len())
}

/// Parse and validate raw file bytes. The parser is picked from the bytes'
/// signature, never from the file name.
pub fn validate_bytes(bytes: &[u8]) -> Result<ValidatedFile, ValidationError> {
    let format = FileFormat::detect(bytes);
    let table = read_table(bytes, format)?;
    let rows = validate_table(&table)?;

    Ok(ValidatedFile { format, rows })
}
