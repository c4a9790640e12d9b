// File I/O operations: whole-sheet tables in, one table out.

pub mod csv;
pub mod error;
pub mod xlsx;

use std::path::Path;

use rollcall_recon::model::Table;

pub use error::IoError;

/// File formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Anything calamine opens: xlsx, xlsm, xls, xlsb, ods.
    Excel,
    Csv,
    Tsv,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xls") | Some("xlsb") | Some("ods") => Ok(Self::Excel),
            Some("csv") => Ok(Self::Csv),
            Some("tsv") => Ok(Self::Tsv),
            _ => Err(IoError::UnsupportedFormat {
                path: path.display().to_string(),
                extension: ext.unwrap_or_else(|| "(none)".into()),
            }),
        }
    }
}

/// Read one sheet of a spreadsheet file into a [`Table`]. The first row is
/// the header row. `sheet` selects a sheet by name (Excel formats only);
/// `None` reads the first sheet.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let table = match TableFormat::from_path(path)? {
        TableFormat::Excel => self::xlsx::import(path, sheet)?,
        TableFormat::Csv => self::csv::import(path)?,
        TableFormat::Tsv => self::csv::import_with_delimiter(path, b'\t')?,
    };
    log::info!(
        "read {} rows x {} columns from {} [{}]",
        table.row_count(),
        table.headers.len(),
        table.origin,
        table.sheet
    );
    Ok(table)
}

/// Write `table` (header row + data rows) to `path`; `.xlsx` or `.csv`/`.tsv`.
pub fn write_table(table: &Table, path: &Path) -> Result<(), IoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("xlsx") => self::xlsx::export(table, path)?,
        Some("csv") => self::csv::export(table, path)?,
        Some("tsv") => self::csv::export_tsv(table, path)?,
        _ => {
            return Err(IoError::UnsupportedFormat {
                path: path.display().to_string(),
                extension: ext.unwrap_or_else(|| "(none)".into()),
            })
        }
    }
    log::info!("wrote {} rows to {}", table.row_count(), path.display());
    Ok(())
}

/// Header names from a header row, verbatim. Empty header cells become
/// `Unnamed: <col>`; padding is kept so column lookup and output layout see
/// exactly what the file holds.
pub(crate) fn header_names<I, S>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    cells
        .into_iter()
        .enumerate()
        .map(|(col, cell)| {
            let name: String = cell.into();
            if name.is_empty() {
                format!("Unnamed: {col}")
            } else {
                name
            }
        })
        .collect()
}
