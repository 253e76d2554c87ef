use crate::error::{Result, ValidationError};
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

/// One data row keyed by header name.
pub type Record = HashMap<String, String>;

/// Parsed contents of an uploaded file: the header row and the data rows
/// below it, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    /// Build a table from a grid of cell text. The first row is the header.
    ///
    /// Rows whose cells are all empty are dropped, short rows read the
    /// missing cells as empty text and a repeated header keeps its first
    /// column.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Self {
        let mut rows = grid.into_iter();
        let headers = match rows.next() {
            Some(headers) => headers,
            None => return Table::default(),
        };

        let records = rows
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|row| {
                let mut record = Record::with_capacity(headers.len());
                for (c, header) in headers.iter().enumerate() {
                    let value = row.get(c).cloned().unwrap_or_default();
                    record.entry(header.clone()).or_insert(value);
                }
                record
            })
            .collect();

        Table { headers, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|header| header == column)
    }
}

/// How the bytes of an upload should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    /// Any spreadsheet container calamine understands (xlsx, xls, xlsb, ods).
    Workbook,
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

impl FileFormat {
    /// Pick a format from the file signature alone.
    ///
    /// The file name is not consulted: a text export saved as `.xlsx` is
    /// still read as CSV.
    ///
    /// # Examples
    /// ```
    /// use contact_upload::loader::FileFormat;
    ///
    /// assert_eq!(FileFormat::detect(b"name,email"), FileFormat::Csv);
    /// assert_eq!(FileFormat::detect(b"PK\x03\x04rest"), FileFormat::Workbook);
    /// ```
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            FileFormat::Workbook
        } else {
            FileFormat::Csv
        }
    }
}

/// Parse raw upload bytes into a table.
///
/// Any failure to make sense of the bytes is reported as
/// [`ValidationError::UnreadableFile`].
pub fn read_table(bytes: &[u8], format: FileFormat) -> std::result::Result<Table, ValidationError> {
    let grid = match format {
        FileFormat::Csv => csv_grid(bytes)?,
        FileFormat::Workbook => workbook_grid(bytes)?,
    };

    Ok(Table::from_grid(grid))
}

/// Read a file from disk and parse it, detecting the format from its
/// contents.
///
/// # Examples
/// ```no_run
/// use contact_upload::loader::load_table;
///
/// match load_table("contacts.xlsx") {
///     Ok(table) => println!("Loaded {} rows", table.len()),
///     Err(e) => eprintln!("Error loading file: {}", e),
/// }
/// ```
pub fn load_table(filepath: impl AsRef<Path>) -> Result<Table> {
    let bytes = std::fs::read(filepath)?;
    Ok(read_table(&bytes, FileFormat::detect(&bytes))?)
}

fn unreadable(reason: impl ToString) -> ValidationError {
    ValidationError::UnreadableFile {
        reason: reason.to_string(),
    }
}

// First worksheet only, every cell rendered to its display text
fn workbook_grid(bytes: &[u8]) -> std::result::Result<Vec<Vec<String>>, ValidationError> {
    use calamine::{Reader, open_workbook_auto_from_rs};

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(unreadable)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unreadable("no worksheet found"))?
        .map_err(unreadable)?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect())
}

fn csv_grid(bytes: &[u8]) -> std::result::Result<Vec<Vec<String>>, ValidationError> {
    let text = decode_text(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut grid = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| unreadable(format!("line {}: {}", index + 1, e)))?;
        grid.push(record.iter().map(str::to_string).collect());
    }

    Ok(grid)
}

// Legacy exports are often Windows-1252 rather than UTF-8
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.trim_start_matches('\u{feff}')),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text
        }
    }
}
