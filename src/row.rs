use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Columns every uploaded file must carry, in template order.
pub const REQUIRED_COLUMNS: [&str; 3] = ["name", "email", "message"];

/// One column of a contact row.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub fn column(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A contact record read from one line of the uploaded table.
///
/// Rows only live for the duration of a validation pass; the upload itself
/// sends the original file bytes.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Row {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Row {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    /// The example row written into both downloadable templates.
    pub fn template() -> Self {
        Row::new("John Doe", "john@example.com", "Hello there")
    }

    /// Builds a row from a header-keyed record. Absent columns read as empty.
    pub fn from_record(record: &HashMap<String, String>) -> Self {
        let get = |field: Field| record.get(field.column()).cloned().unwrap_or_default();

        Row {
            name: get(Field::Name),
            email: get(Field::Email),
            message: get(Field::Message),
        }
    }

    /// Values in `REQUIRED_COLUMNS` order.
    pub fn values(&self) -> [&str; 3] {
        [self.name.as_str(), self.email.as_str(), self.message.as_str()]
    }
}
