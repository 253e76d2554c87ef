use crate::error::Result;
use crate::row::{REQUIRED_COLUMNS, Row};

/// Name of the worksheet inside the XLSX template.
pub const TEMPLATE_SHEET: &str = "Template";

/// The two downloadable template formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    Csv,
    Xlsx,
}

/// A rendered template ready to be offered as a download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateFile {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl TemplateKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(TemplateKind::Csv),
            "xlsx" => Some(TemplateKind::Xlsx),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateKind::Csv => "contact_template.csv",
            TemplateKind::Xlsx => "contact_template.xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            TemplateKind::Csv => "text/csv;charset=utf-8",
            TemplateKind::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn render(&self) -> Result<TemplateFile> {
        let bytes = match self {
            TemplateKind::Csv => csv_template().into_bytes(),
            TemplateKind::Xlsx => xlsx_template()?,
        };

        Ok(TemplateFile {
            file_name: self.file_name(),
            content_type: self.content_type(),
            bytes,
        })
    }
}

/// Contact template as CSV text
///
/// A header line followed by the example row, with no trailing newline.
/// Values containing commas, quotes or newlines are quoted.
///
/// # Examples
/// ```
/// use contact_upload::downloader::csv_template;
///
/// assert_eq!(
///     csv_template(),
///     "name,email,message\nJohn Doe,john@example.com,Hello there"
/// );
/// ```
pub fn csv_template() -> String {
    let example = Row::template();

    [REQUIRED_COLUMNS, example.values()]
        .iter()
        .map(|line| line.iter().map(|value| escape_csv(value)).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contact template as an XLSX workbook
///
/// A single worksheet named `Template` holding the header row and the
/// example row, written with rust_xlsxwriter.
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes or an error
pub fn xlsx_template() -> Result<Vec<u8>> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(TEMPLATE_SHEET)?;

    let example = Row::template();
    for (r, line) in [REQUIRED_COLUMNS, example.values()].iter().enumerate() {
        for (c, value) in line.iter().enumerate() {
            worksheet.write_string(r as u32, c as u16, *value)?;
        }
    }

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
