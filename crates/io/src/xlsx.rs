// Excel import (xlsx, xlsm, xls, xlsb, ods) via calamine; xlsx export via rust_xlsxwriter.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rollcall_recon::model::{CellValue, SerialKind, Table};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};

use crate::error::IoError;
use crate::header_names;

/// Sheet name used for exported tables.
pub const EXPORT_SHEET_NAME: &str = "Sheet1";

/// Import one sheet of an Excel file. `sheet` selects by name; `None` picks
/// the first sheet.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::read(path, e))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(IoError::SheetNotFound {
                    path: path.display().to_string(),
                    sheet: name.to_string(),
                    available: sheet_names,
                });
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IoError::read(path, "workbook contains no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::read(path, format!("sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or_else(|| IoError::EmptySheet {
        path: path.display().to_string(),
        sheet: sheet_name.clone(),
    })?;

    let headers = header_names(header_row.iter().map(|cell| cell_value(cell).to_string()));
    let mut table = Table::new(path.display().to_string(), sheet_name, headers);
    for row in rows {
        table.push_row(row.iter().map(cell_value).collect());
    }
    Ok(table)
}

/// Convert a calamine cell. Dates keep their serial number and are tagged as
/// dates; error cells (`#N/A`, `#REF!`, ...) carry no value.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Int(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Check if a number exceeds Excel's 15-digit precision limit.
fn exceeds_excel_precision(n: f64) -> bool {
    n.fract() == 0.0 && n.abs() >= 1e15
}

/// Export a table as a single-sheet xlsx: bold header row, then data rows
/// with their original cell types.
pub fn export(table: &Table, path: &Path) -> Result<(), IoError> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(EXPORT_SHEET_NAME)
        .map_err(|e| IoError::write(path, e))?;

    let header_format = Format::new().set_bold();
    for (col, name) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .map_err(|e| IoError::write(path, format!("header '{name}': {e}")))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            write_cell(worksheet, row_idx as u32 + 1, col as u16, value)
                .map_err(|e| IoError::write(path, format!("row {}: {e}", row_idx + 2)))?;
        }
    }

    workbook.save(path).map_err(|e| IoError::write(path, e))?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    match value {
        CellValue::Empty => {}
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Number(n) if !n.is_finite() => {}
        // Beyond 15 significant digits Excel rounds; keep the exact digits as text.
        CellValue::Number(n) if exceeds_excel_precision(*n) => {
            worksheet.write_string(row, col, format!("{}", *n as i64))?;
        }
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::Int(n) if exceeds_excel_precision(*n as f64) => {
            worksheet.write_string(row, col, n.to_string())?;
        }
        CellValue::Int(n) => {
            worksheet.write_number(row, col, *n as f64)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(serial) if !serial.is_finite() => {}
        CellValue::DateTime(serial) => {
            worksheet.write_number_with_format(row, col, *serial, &date_format(*serial))?;
        }
    }
    Ok(())
}

fn date_format(serial: f64) -> Format {
    let pattern = match SerialKind::of(serial) {
        SerialKind::Date => "yyyy-mm-dd",
        SerialKind::Time => "hh:mm:ss",
        SerialKind::DateTime => "yyyy-mm-dd hh:mm:ss",
    };
    Format::new().set_num_format(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Table {
        let mut t = Table::new(
            "ai.xls",
            "Kişiler",
            vec!["full_name".into(), "phone_number".into(), "vip".into(), "note".into()],
        );
        t.push_row(vec![
            CellValue::Text("Unknown Person".into()),
            CellValue::Number(5559998888.0),
            CellValue::Bool(true),
            CellValue::Empty,
        ]);
        t.push_row(vec![
            CellValue::Text("Ayşe Yılmaz".into()),
            CellValue::Text("+90 555 111 22 33".into()),
            CellValue::Bool(false),
            CellValue::Text("ikinci".into()),
        ]);
        t
    }

    #[test]
    fn test_export_import_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fark.xlsx");
        let table = sample();

        export(&table, &path).unwrap();
        let back = import(&path, None).unwrap();

        assert_eq!(back.sheet, EXPORT_SHEET_NAME);
        assert_eq!(back.headers, table.headers);
        assert_eq!(back.rows, table.rows);
    }

    #[test]
    fn test_import_named_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("two.xlsx");

        let mut workbook = XlsxWorkbook::new();
        workbook.add_worksheet().set_name("first").unwrap().write_string(0, 0, "x").unwrap();
        let ws = workbook.add_worksheet().set_name("kisiler").unwrap();
        ws.write_string(0, 0, "full_name").unwrap();
        ws.write_string(0, 1, "phone_number").unwrap();
        ws.write_string(1, 0, "Ali").unwrap();
        ws.write_number(1, 1, 5551234.0).unwrap();
        workbook.save(&path).unwrap();

        let first = import(&path, None).unwrap();
        assert_eq!(first.sheet, "first");
        assert_eq!(first.headers, vec!["x"]);
        assert_eq!(first.row_count(), 0);

        let named = import(&path, Some("kisiler")).unwrap();
        assert_eq!(named.headers, vec!["full_name", "phone_number"]);
        assert_eq!(named.rows[0][1], CellValue::Number(5551234.0));
    }

    #[test]
    fn test_import_missing_sheet_lists_available() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.xlsx");
        export(&sample(), &path).unwrap();

        let err = import(&path, Some("Nope")).unwrap_err();
        assert!(matches!(err, IoError::SheetNotFound { .. }));
        assert!(err.to_string().contains("Sheet1"));
    }

    #[test]
    fn test_import_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        let err = import(&path, None).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }

    #[test]
    fn test_import_empty_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let mut workbook = XlsxWorkbook::new();
        workbook.add_worksheet();
        workbook.save(&path).unwrap();

        let err = import(&path, None).unwrap_err();
        assert!(matches!(err, IoError::EmptySheet { .. }));
    }

    #[test]
    fn test_large_integers_exported_as_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.xlsx");
        let mut table = Table::new("s", "s", vec!["id".into()]);
        table.push_row(vec![CellValue::Int(1234567890123456789)]);
        export(&table, &path).unwrap();

        let back = import(&path, None).unwrap();
        assert_eq!(back.rows[0][0], CellValue::Text("1234567890123456789".into()));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/fark.xlsx");
        let err = export(&sample(), &path).unwrap_err();
        assert!(matches!(err, IoError::Write { .. }));
    }

    #[test]
    fn test_date_cells_survive_export() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("joined.xlsx");
        let mut workbook = XlsxWorkbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(0, 0, "full_name").unwrap();
        ws.write_string(0, 1, "joined").unwrap();
        ws.write_string(0, 2, "last_seen").unwrap();
        ws.write_string(1, 0, "Ali").unwrap();
        ws.write_number_with_format(1, 1, 45296.0, &Format::new().set_num_format("dd/mm/yyyy"))
            .unwrap();
        ws.write_number_with_format(1, 2, 45296.5, &Format::new().set_num_format("yyyy-mm-dd hh:mm"))
            .unwrap();
        workbook.save(&input).unwrap();

        let table = import(&input, None).unwrap();
        assert_eq!(table.rows[0][1], CellValue::DateTime(45296.0));
        assert_eq!(table.rows[0][2], CellValue::DateTime(45296.5));

        let output = dir.path().join("fark.xlsx");
        export(&table, &output).unwrap();
        let back = import(&output, None).unwrap();
        assert_eq!(back.rows, table.rows);
    }

    #[test]
    fn test_exceeds_excel_precision() {
        assert!(!exceeds_excel_precision(5551112233.0));
        assert!(exceeds_excel_precision(1e15));
        assert!(!exceeds_excel_precision(0.5));
    }
}
