#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Input file missing, unreadable, or corrupt.
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },
    /// Named sheet absent from the workbook.
    #[error("{path}: sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        path: String,
        sheet: String,
        available: Vec<String>,
    },
    /// Sheet has no header row.
    #[error("{path}: sheet '{sheet}' is empty (no header row)")]
    EmptySheet { path: String, sheet: String },
    #[error("unsupported file format '{extension}' for {path}")]
    UnsupportedFormat { path: String, extension: String },
    /// Output file cannot be created or written.
    #[error("cannot write {path}: {message}")]
    Write { path: String, message: String },
}

impl IoError {
    pub(crate) fn read(path: &std::path::Path, message: impl ToString) -> Self {
        Self::Read {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn write(path: &std::path::Path, message: impl ToString) -> Self {
        Self::Write {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}
