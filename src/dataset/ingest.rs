//! Dataset ingestion from uploaded CSV and XLSX files.
//!
//! CSV files come from all kinds of spreadsheet exports, so the encoding and
//! separator are sniffed: a fixed list of `(encoding, separator)` attempts is
//! tried in order and the first one that decodes cleanly and yields at least
//! [`MIN_EXPECTED_COLUMNS`] columns wins. XLSX files are read with `calamine`
//! (first worksheet, first row is the header).
//!
//! Every value comes out as text; missing values are empty strings.

use calamine::{Data, Reader, Xlsx};
use encoding_rs::{UTF_8, WINDOWS_1254};
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;

use super::Dataset;
use crate::error::LabelError;

/// A CSV parse with fewer columns than this is considered a wrong guess.
pub const MIN_EXPECTED_COLUMNS: usize = 2;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

impl FileKind {
    /// Detect the format from a file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "xlsx" => Some(FileKind::Xlsx),
            _ => None,
        }
    }
}

/// Text encodings tried when sniffing CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Windows-1254 (Turkish).
    Cp1254,
    /// ISO-8859-1.
    Latin1,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Cp1254 => "cp1254",
            TextEncoding::Latin1 => "latin1",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::Cp1254 => {
                WINDOWS_1254.decode_without_bom_handling_and_without_replacement(bytes)
            }
            // Every byte maps to the code point of the same value.
            TextEncoding::Latin1 => Some(Cow::Owned(bytes.iter().map(|&b| b as char).collect())),
        }
    }
}

/// `(encoding, separator)` pairs, in the order they are attempted.
pub const CSV_ATTEMPTS: &[(TextEncoding, u8)] = &[
    (TextEncoding::Utf8, b'\t'),
    (TextEncoding::Cp1254, b'\t'),
    (TextEncoding::Latin1, b'\t'),
    (TextEncoding::Utf8, b','),
    (TextEncoding::Latin1, b';'),
    (TextEncoding::Cp1254, b';'),
    (TextEncoding::Utf8, b';'),
    (TextEncoding::Latin1, b','),
    (TextEncoding::Cp1254, b','),
];

/// Read an uploaded file, dispatching on its extension.
pub fn read_dataset(filename: &str, bytes: &[u8]) -> Result<Dataset, LabelError> {
    match FileKind::from_filename(filename) {
        Some(FileKind::Csv) => read_csv(bytes),
        Some(FileKind::Xlsx) => read_xlsx(bytes),
        None => Err(LabelError::validation(
            "Unsupported file format. Please upload a CSV or XLSX file.",
        )),
    }
}

/// Read CSV bytes, sniffing encoding and separator.
pub fn read_csv(bytes: &[u8]) -> Result<Dataset, LabelError> {
    for &(encoding, delimiter) in CSV_ATTEMPTS {
        let Some(text) = encoding.decode(bytes) else {
            continue;
        };
        if let Some(dataset) = parse_csv(&text, delimiter)
            && dataset.columns().len() >= MIN_EXPECTED_COLUMNS
        {
            log::debug!(
                "[ingest] CSV decoded as {} with separator {:?} ({} columns)",
                encoding.label(),
                delimiter as char,
                dataset.columns().len()
            );
            return Ok(dataset);
        }
    }

    Err(LabelError::Ingestion(
        "CSV read error: no usable encoding or separator found.".to_string(),
    ))
}

/// Parse decoded CSV text with one separator.
///
/// Returns `None` when the text has no header row, fails to parse, or has a
/// row with more fields than the header.
pub fn parse_csv(text: &str, delimiter: u8) -> Option<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        // Header handled manually so it goes through the same naming rules as XLSX.
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = records.next()?.ok()?;
    let columns = column_names(header.iter());

    let mut rows = Vec::new();
    for record in records {
        let record = record.ok()?;
        if record.len() > columns.len() {
            return None;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Some(Dataset::new(columns, rows))
}

/// Read the first worksheet of an XLSX workbook.
pub fn read_xlsx(bytes: &[u8]) -> Result<Dataset, LabelError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| LabelError::Ingestion(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LabelError::Ingestion("Workbook has no worksheets.".to_string()))?
        .map_err(|e| LabelError::Ingestion(format!("Failed to read worksheet: {}", e)))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| LabelError::Ingestion("Worksheet is empty.".to_string()))?;
    let header: Vec<String> = header.iter().map(cell_text).collect();
    let columns = column_names(header.iter().map(String::as_str));

    let mut rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    // Blank rows inside the sheet keep their position; only the tail is trimmed.
    while rows
        .last()
        .is_some_and(|row| row.iter().all(String::is_empty))
    {
        rows.pop();
    }

    Ok(Dataset::new(columns, rows))
}

/// Render one spreadsheet cell as text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // f64 Display already drops a trailing ".0"
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// Normalize header names: blanks become `Unnamed: <i>`, repeats get a `.<n>` suffix.
fn column_names<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.enumerate()
        .map(|(i, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let unique = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::from_filename("data.CSV"), Some(FileKind::Csv));
        assert_eq!(FileKind::from_filename("book.xlsx"), Some(FileKind::Xlsx));
        assert_eq!(FileKind::from_filename("notes.txt"), None);
        assert_eq!(FileKind::from_filename("noext"), None);
    }

    #[test]
    fn test_comma_csv() {
        let ds = read_csv(b"Name,SKU,Price\nApple,A-1,3\nPear,P-2,\n").unwrap();
        assert_eq!(ds.columns(), &["Name", "SKU", "Price"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.row(1).unwrap().get("Price"), Some(""));
    }

    #[test]
    fn test_semicolon_csv() {
        let ds = read_csv(b"Name;SKU\nApple;A-1\n").unwrap();
        assert_eq!(ds.columns(), &["Name", "SKU"]);
        assert_eq!(ds.row(0).unwrap().get("SKU"), Some("A-1"));
    }

    #[test]
    fn test_tab_csv() {
        let ds = read_csv(b"Name\tSKU\nApple, red\tA-1\n").unwrap();
        assert_eq!(ds.row(0).unwrap().get("Name"), Some("Apple, red"));
    }

    #[test]
    fn test_cp1254_bytes() {
        // "Ürün<TAB>Şehir\nÇay<TAB>İzmir" in Windows-1254
        let bytes = b"\xDCr\xFCn\t\xDEehir\n\xC7ay\t\xDDzmir\n";
        let ds = read_csv(bytes).unwrap();
        assert_eq!(ds.columns(), &["Ürün", "Şehir"]);
        assert_eq!(ds.row(0).unwrap().get("Şehir"), Some("İzmir"));
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let ds = read_csv("\u{FEFF}Name,SKU\nA,1\n".as_bytes()).unwrap();
        assert_eq!(ds.columns()[0], "Name");
    }

    #[test]
    fn test_single_column_is_ingestion_error() {
        let err = read_csv(b"OnlyOne\nvalue\n").unwrap_err();
        assert!(matches!(err, LabelError::Ingestion(_)));
    }

    #[test]
    fn test_extra_fields_reject_attempt() {
        assert!(parse_csv("A,B\n1,2,3\n", b',').is_none());
        assert!(parse_csv("A,B\n1\n", b',').is_some());
    }

    #[test]
    fn test_header_names_normalized() {
        let ds = parse_csv("Name,,Name\n1,2,3\n", b',').unwrap();
        assert_eq!(ds.columns(), &["Name", "Unnamed: 1", "Name.1"]);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            read_dataset("notes.txt", b"a,b"),
            Err(LabelError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_xlsx_is_ingestion_error() {
        assert!(matches!(
            read_xlsx(b"definitely not a zip"),
            Err(LabelError::Ingestion(_))
        ));
    }

    fn sample_workbook() -> Vec<u8> {
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let added = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();

        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Name").unwrap();
        sheet.write_string(0, 1, "Qty").unwrap();
        sheet.write_string(0, 2, "Added").unwrap();
        sheet.write_string(1, 0, "Apple").unwrap();
        sheet.write_number(1, 1, 12.0).unwrap();
        sheet
            .write_datetime_with_format(1, 2, &added, &date_format)
            .unwrap();
        // row 2 left blank
        sheet.write_string(3, 0, "Pear").unwrap();
        sheet.write_number(3, 1, 1.5).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_xlsx_workbook() {
        let ds = read_dataset("stock.xlsx", &sample_workbook()).unwrap();
        assert_eq!(ds.columns(), &["Name", "Qty", "Added"]);
        assert_eq!(ds.len(), 3);

        let apple = ds.row(0).unwrap();
        assert_eq!(apple.get("Qty"), Some("12"));
        assert_eq!(apple.get("Added"), Some("2024-03-15 00:00:00"));

        let blank = ds.row(1).unwrap();
        assert_eq!(blank.get("Name"), Some(""));
        assert_eq!(blank.get("Qty"), Some(""));

        let pear = ds.row(2).unwrap();
        assert_eq!(pear.get("Name"), Some("Pear"));
        assert_eq!(pear.get("Qty"), Some("1.5"));
        assert_eq!(pear.get("Added"), Some(""));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("x".into())), "x");
    }
}
