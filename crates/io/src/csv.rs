// CSV/TSV import/export

use std::io::Read;
use std::path::Path;

use rollcall_recon::model::{CellValue, Table};

use crate::error::IoError;
use crate::header_names;

/// Sheet label for CSV tables (CSV files have exactly one sheet).
pub const CSV_SHEET_NAME: &str = "csv";

pub fn import(path: &Path) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(path, &content, delimiter)
}

pub fn import_with_delimiter(path: &Path, delimiter: u8) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    import_from_string(path, &content, delimiter)
}

/// Lines inspected when guessing the delimiter.
const SNIFF_LINES: usize = 10;

/// Guess the delimiter from the head of the file: among tab, `;`, `,` and
/// `|`, pick the one that splits the header row into the most columns with
/// the following rows agreeing on that width. Falls back to comma.
fn sniff_delimiter(content: &str) -> u8 {
    let sample = content.lines().take(SNIFF_LINES).collect::<Vec<_>>().join("\n");

    let mut best = (0, b',');
    for delimiter in [b'\t', b';', b',', b'|'] {
        let widths = row_widths(&sample, delimiter);
        let Some(&header_width) = widths.first() else {
            continue;
        };
        if header_width < 2 {
            continue;
        }
        let agreeing = widths.iter().filter(|&&w| w == header_width).count();
        let score = agreeing * header_width;
        if score > best.0 {
            best = (score, delimiter);
        }
    }
    best.1
}

/// Field count of each record in `sample` when split on `delimiter`.
fn row_widths(sample: &str, delimiter: u8) -> Vec<usize> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample.as_bytes())
        .records()
        .map_while(Result::ok)
        .map(|record| record.len())
        .collect()
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let mut file = std::fs::File::open(path).map_err(|e| IoError::read(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| IoError::read(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(s)),
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{}: not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(path: &Path, content: &str, delimiter: u8) -> Result<Table, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| IoError::read(path, e))?,
        None => {
            return Err(IoError::EmptySheet {
                path: path.display().to_string(),
                sheet: CSV_SHEET_NAME.to_string(),
            })
        }
    };

    let headers = header_names(header.iter());
    let mut table = Table::new(path.display().to_string(), CSV_SHEET_NAME, headers);

    for (row_idx, result) in records.enumerate() {
        let record = result.map_err(|e| IoError::read(path, format!("line {}: {e}", row_idx + 2)))?;
        table.push_row(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(table)
}

pub fn export(table: &Table, path: &Path) -> Result<(), IoError> {
    export_with_delimiter(table, path, b',')
}

pub fn export_tsv(table: &Table, path: &Path) -> Result<(), IoError> {
    export_with_delimiter(table, path, b'\t')
}

fn export_with_delimiter(table: &Table, path: &Path, delimiter: u8) -> Result<(), IoError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| IoError::write(path, e))?;

    writer
        .write_record(&table.headers)
        .map_err(|e| IoError::write(path, e))?;

    for row in &table.rows {
        let record: Vec<String> = row.iter().map(ToString::to_string).collect();
        writer.write_record(&record).map_err(|e| IoError::write(path, e))?;
    }

    writer.flush().map_err(|e| IoError::write(path, e))?;
    Ok(())
}
