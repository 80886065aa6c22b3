//! Turns an uploaded CSV or Excel file into header-keyed rows.
//!
//! The whole file is read before anything is returned: callers either get
//! every row in source order or a single error.

use crate::error::UploadError;
use calamine::{open_workbook, Data, Reader, Xls, Xlsx};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Supported upload formats, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Xlsx,
    Xls,
}

impl TabularFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(TabularFormat::Csv),
            "xlsx" => Some(TabularFormat::Xlsx),
            "xls" => Some(TabularFormat::Xls),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TabularFormat::Csv => ".csv",
            TabularFormat::Xlsx => ".xlsx",
            TabularFormat::Xls => ".xls",
        }
    }
}

/// One data row as `(column, value)` pairs in header order.
///
/// Cells that are missing from the source (short CSV lines, blank Excel
/// cells) have no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// The header row plus every data row below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

pub fn parse_file(path: &Path, format: TabularFormat) -> Result<RawTable, UploadError> {
    match format {
        TabularFormat::Csv => {
            let file = File::open(path).map_err(|e| UploadError::Parse(e.to_string()))?;
            parse_csv(BufReader::new(file))
        }
        TabularFormat::Xlsx => parse_first_sheet(open_workbook::<Xlsx<_>, _>(path).map_err(parse_error)?),
        TabularFormat::Xls => parse_first_sheet(open_workbook::<Xls<_>, _>(path).map_err(parse_error)?),
    }
}

/// Comma separated, first line is the header.
pub fn parse_csv<R: Read>(reader: R) -> Result<RawTable, UploadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(parse_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse_error)?;
        rows.push(RawRow::from_pairs(
            headers.iter().map(String::as_str).zip(record.iter()),
        ));
    }

    finish(headers, rows)
}

/// Only the first worksheet is read; fully blank rows are skipped.
fn parse_first_sheet<RS, R>(mut workbook: R) -> Result<RawTable, UploadError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(parse_error)?,
        None => return Err(UploadError::EmptyFile),
    };

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells.iter().map(|c| c.to_string()).collect(),
        None => return Err(UploadError::EmptyFile),
    };

    let mut rows = Vec::new();
    for cells in sheet_rows {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        rows.push(RawRow::from_pairs(
            headers
                .iter()
                .zip(cells)
                .filter(|(header, cell)| !header.is_empty() && !matches!(cell, Data::Empty))
                .map(|(header, cell)| (header.as_str(), cell.to_string())),
        ));
    }

    finish(headers, rows)
}

fn finish(headers: Vec<String>, rows: Vec<RawRow>) -> Result<RawTable, UploadError> {
    if rows.is_empty() {
        return Err(UploadError::EmptyFile);
    }
    Ok(RawTable { headers, rows })
}

fn parse_error<E: Display>(err: E) -> UploadError {
    UploadError::Parse(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("contacts.csv", Some(TabularFormat::Csv))]
    #[case("CONTACTS.XLSX", Some(TabularFormat::Xlsx))]
    #[case("old.report.xls", Some(TabularFormat::Xls))]
    #[case("notes.txt", None)]
    #[case("csv", None)]
    fn format_follows_extension(#[case] name: &str, #[case] expected: Option<TabularFormat>) {
        assert_eq!(TabularFormat::from_file_name(name), expected);
    }

    #[test]
    fn csv_rows_keep_source_order_and_header_names() {
        let data = "FirstName,Phone,Notes\nAnn,5550001,call back\nBob,5550002,\n";
        let table = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["FirstName", "Phone", "Notes"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("FirstName"), Some("Ann"));
        assert_eq!(table.rows[0].get("Notes"), Some("call back"));
        assert_eq!(table.rows[1].get("Phone"), Some("5550002"));
        assert_eq!(table.rows[1].get("Notes"), Some(""));
    }

    #[test]
    fn short_csv_lines_leave_trailing_columns_absent() {
        let table = parse_csv("FirstName,Phone,Notes\nAnn,5550001\n".as_bytes()).unwrap();
        assert_eq!(table.rows[0].get("Phone"), Some("5550001"));
        assert_eq!(table.rows[0].get("Notes"), None);
    }

    #[test]
    fn quoted_commas_stay_in_one_field() {
        let table =
            parse_csv("FirstName,Phone,Notes\n\"Lee, Jr\",5550001,\"a, b\"\n".as_bytes()).unwrap();
        assert_eq!(table.rows[0].get("FirstName"), Some("Lee, Jr"));
        assert_eq!(table.rows[0].get("Notes"), Some("a, b"));
    }

    #[rstest]
    #[case("")]
    #[case("FirstName,Phone,Notes\n")]
    fn csv_without_data_rows_is_empty(#[case] data: &str) {
        assert!(matches!(
            parse_csv(data.as_bytes()),
            Err(UploadError::EmptyFile)
        ));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let data: &[u8] = b"FirstName,Phone,Notes\n\xff\xfe,1,2\n";
        assert!(matches!(parse_csv(data), Err(UploadError::Parse(_))));
    }

    #[test]
    fn parse_file_reads_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "FirstName,Phone,Notes\nAnn,5550001,x\n").unwrap();

        let table = parse_file(file.path(), TabularFormat::Csv).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[rstest]
    #[case(TabularFormat::Xlsx)]
    #[case(TabularFormat::Xls)]
    fn garbage_workbook_is_a_parse_error(#[case] format: TabularFormat) {
        let mut file = tempfile::Builder::new()
            .suffix(format.extension())
            .tempfile()
            .unwrap();
        file.write_all(b"definitely not a spreadsheet").unwrap();

        assert!(matches!(
            parse_file(file.path(), format),
            Err(UploadError::Parse(_))
        ));
    }

    fn xlsx_fixture(build: impl FnOnce(&mut rust_xlsxwriter::Workbook)) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = rust_xlsxwriter::Workbook::new();
        build(&mut workbook);
        workbook.save(file.path()).unwrap();
        file
    }

    fn write_headers(sheet: &mut rust_xlsxwriter::Worksheet) {
        for (col, name) in ["FirstName", "Phone", "Notes"].iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
    }

    #[test]
    fn xlsx_reads_first_sheet_keyed_by_header() {
        let file = xlsx_fixture(|workbook| {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Contacts").unwrap();
            write_headers(sheet);
            sheet.write_string(1, 0, "Ann").unwrap();
            sheet.write_number(1, 1, 9876543210.0).unwrap();
            // row 2 left blank
            sheet.write_string(3, 0, "Bob").unwrap();
            sheet.write_string(3, 1, "5550002").unwrap();
            sheet.write_string(3, 2, "call back").unwrap();

            let other = workbook.add_worksheet();
            other.set_name("Archive").unwrap();
            write_headers(other);
            other.write_string(1, 0, "Zed").unwrap();
            other.write_string(1, 1, "1").unwrap();
        });

        let table = parse_file(file.path(), TabularFormat::Xlsx).unwrap();
        assert_eq!(table.headers, vec!["FirstName", "Phone", "Notes"]);
        assert_eq!(
            table.rows,
            vec![
                RawRow::from_pairs([("FirstName", "Ann"), ("Phone", "9876543210")]),
                RawRow::from_pairs([
                    ("FirstName", "Bob"),
                    ("Phone", "5550002"),
                    ("Notes", "call back"),
                ]),
            ]
        );

        let records = crate::distribution::validator::validate(&table).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phone, "9876543210");
        assert_eq!(records[0].notes, "");
        assert_eq!(records[1].first_name, "Bob");
    }

    #[test]
    fn xlsx_with_only_a_header_row_is_empty() {
        let file = xlsx_fixture(|workbook| {
            let sheet = workbook.add_worksheet();
            write_headers(sheet);
        });

        assert!(matches!(
            parse_file(file.path(), TabularFormat::Xlsx),
            Err(UploadError::EmptyFile)
        ));
    }
}
