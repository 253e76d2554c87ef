/*!
# Contact Upload

A small web page for uploading contact lists (`name`, `email`, `message`)
from a CSV file or spreadsheet, built in Rust.

## Overview

The user first downloads a template, fills it in and uploads it. The file is
parsed and checked locally; only a file that passes is forwarded, untouched,
to the backend as a multipart upload.

## Flow

1. **Template** - `contact_template.csv` or `contact_template.xlsx`, a header
   row and one example row.
2. **Validation** - the file must have at least one data row, the three
   required columns, a non-blank name and message on every row and an email
   shaped like `local@domain.tld`. Any failing row rejects the whole file.
3. **Upload** - `POST {API_BASE_URL}/api/upload/` with the file in the
   `file` field. Any non-2xx answer is reported as a generic failure.

## Modules

- **row**: Row model, required columns, template row
- **loader**: CSV/workbook parsing into a header-keyed table
- **validator**: Contact file validation
- **downloader**: Template export (CSV, XLSX)
- **uploader**: Multipart upload to the backend
- **form**: Page state and the select/validate/upload flow
- **config**: Environment configuration
- **app**: Routing and page rendering

## Error messages

| Error | Shown as |
|---|---|
| Empty file | `File is empty` |
| Missing columns | `Missing columns: name, email, message` |
| Bad row | `Some rows have invalid or missing data` |
| Unparseable file | `Could not read file` |
| Upload failure | `Upload failed. Please try again.` |
*/

pub mod downloader;
pub mod error;
pub mod loader;
pub mod row;
pub mod validator;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod config;
#[cfg(feature = "web")]
pub mod form;
#[cfg(feature = "web")]
pub mod uploader;

pub use downloader::*;
pub use error::*;
pub use loader::*;
pub use row::*;
pub use validator::*;
