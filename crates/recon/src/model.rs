use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Cells + tables
// ---------------------------------------------------------------------------

/// A single spreadsheet cell as read from an input file.
///
/// Date and time cells keep their Excel serial number so they can be written
/// back as dates; error cells are read as `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    #[serde(serialize_with = "serialize_serial")]
    DateTime(f64),
}

impl CellValue {
    /// True for cells that carry no value at all (blank, or a NaN number).
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(n) | Self::DateTime(n) => n.is_nan(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            // Integral floats render without decimals: phone columns are
            // often stored as numbers.
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Self::DateTime(serial) => match serial_to_datetime(*serial) {
                Some(dt) => f.write_str(&format_serial(*serial, dt)),
                None => write!(f, "{serial}"),
            },
        }
    }
}

/// Which parts of a date/time serial carry information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialKind {
    Date,
    Time,
    DateTime,
}

impl SerialKind {
    pub fn of(serial: f64) -> Self {
        let has_date = serial.floor() > 0.0;
        let has_time = serial.fract().abs() > 0.0001;
        match (has_date, has_time) {
            (true, true) => Self::DateTime,
            (false, true) => Self::Time,
            _ => Self::Date,
        }
    }
}

/// Excel 1900 date system: serial 0 is 1899-12-30 (the leap-year bug
/// is absorbed by starting one day early).
fn serial_to_datetime(serial: f64) -> Option<chrono::NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(chrono::TimeDelta::try_milliseconds(millis)?)
}

fn format_serial(serial: f64, dt: chrono::NaiveDateTime) -> String {
    match SerialKind::of(serial) {
        SerialKind::Date => dt.format("%Y-%m-%d").to_string(),
        SerialKind::Time => dt.format("%H:%M:%S").to_string(),
        SerialKind::DateTime => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

fn serialize_serial<S: serde::Serializer>(serial: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&CellValue::DateTime(*serial))
}

/// One sheet read fully into memory: a header row plus data rows.
///
/// Rows are kept exactly as read (blank rows included) so that row indices
/// stay valid for projecting results back onto the original layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Where the table came from (file path), for messages.
    pub origin: String,
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(origin: impl Into<String>, sheet: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            origin: origin.into(),
            sheet: sheet.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.headers.len(), CellValue::Empty);
        self.rows.push(row);
    }

    /// Position of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (row, col); `None` when out of range or absent.
    pub fn value(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .filter(|v| !v.is_absent())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// New table with the same headers holding only the given rows, in the
    /// order given. Out-of-range indices are skipped.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            origin: self.origin.clone(),
            sheet: self.sheet.clone(),
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Adapted records
// ---------------------------------------------------------------------------

/// Which side of the reconciliation a table plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Source,
    Reference,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// A row of either schema reduced to the common comparable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonRecord {
    /// Position in the original (pre-filter) table.
    pub row_index: usize,
    pub display_name: String,
    pub display_phone: CellValue,
    pub normalized_name: String,
    pub normalized_phone: String,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Name and phone both present in the reference as a pair.
    Exact,
    /// Name alone is known to the reference; phone may differ or be missing.
    NameOnly,
    /// Phone alone is known to the reference; name may differ or be missing.
    PhoneOnly,
    Unmatched,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        !matches!(self, Self::Unmatched)
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::NameOnly => write!(f, "name_only"),
            Self::PhoneOnly => write!(f, "phone_only"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// A source record with no full or partial match in the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    pub row_index: usize,
    pub display_name: String,
    pub display_phone: CellValue,
}

#[derive(Debug)]
pub struct MatchOutput {
    pub differences: Vec<Difference>,
    pub outcome_counts: HashMap<MatchOutcome, usize>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconSummary {
    pub source_rows: usize,
    pub source_records: usize,
    pub reference_rows: usize,
    pub reference_records: usize,
    pub index_keys: usize,
    pub matched_exact: usize,
    pub matched_name_only: usize,
    pub matched_phone_only: usize,
    pub differences: usize,
}

impl ReconSummary {
    pub fn matched(&self) -> usize {
        self.matched_exact + self.matched_name_only + self.matched_phone_only
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub source: String,
    pub reference: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub differences: Vec<Difference>,
}

impl ReconResult {
    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    /// Original source rows of every difference, in source order, with the
    /// source's column layout.
    pub fn project(&self, source: &Table) -> Table {
        let indices: Vec<usize> = self.differences.iter().map(|d| d.row_index).collect();
        source.select_rows(&indices)
    }
}
