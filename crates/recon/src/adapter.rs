//! Schema adapters: reduce each input layout to [`CommonRecord`]s.
//!
//! The matcher only ever sees `CommonRecord`s, so all column lookups and
//! schema-specific shaping live behind [`RecordAdapter`].

use crate::config::{ReferenceColumns, SourceColumns};
use crate::error::ReconError;
use crate::model::{CellValue, CommonRecord, Dataset, Table};
use crate::normalize::{normalize_name, normalize_phone};

/// Anything that can turn a raw table into a sequence of common records.
pub trait RecordAdapter {
    fn dataset(&self) -> Dataset;

    /// Adapt every row of `table`, dropping rows whose normalized name and
    /// phone are both empty. Fails when a required column is absent.
    fn adapt(&self, table: &Table) -> Result<Vec<CommonRecord>, ReconError>;
}

/// Source layout: one full-name column and one phone column.
#[derive(Debug, Clone)]
pub struct SourceAdapter {
    columns: SourceColumns,
}

impl SourceAdapter {
    pub fn new(columns: SourceColumns) -> Self {
        Self { columns }
    }
}

impl Default for SourceAdapter {
    fn default() -> Self {
        Self::new(SourceColumns::default())
    }
}

impl RecordAdapter for SourceAdapter {
    fn dataset(&self) -> Dataset {
        Dataset::Source
    }

    fn adapt(&self, table: &Table) -> Result<Vec<CommonRecord>, ReconError> {
        let [name_idx, phone_idx] = require_columns(
            self.dataset(),
            table,
            [&self.columns.full_name, &self.columns.phone_number],
        )?;

        let records = (0..table.row_count())
            .filter_map(|row| {
                let name = table.value(row, name_idx);
                let phone = table.value(row, phone_idx);
                common_record(
                    row,
                    name.map(ToString::to_string).unwrap_or_default(),
                    name,
                    phone,
                )
            })
            .collect::<Vec<_>>();

        log::debug!(
            "{}: {} of {} source rows retained",
            table.origin,
            records.len(),
            table.row_count()
        );
        Ok(records)
    }
}

/// Reference layout: separate first-name / last-name columns and a phone
/// column. The full name is synthesized as `first + " " + last`, trimmed.
#[derive(Debug, Clone)]
pub struct ReferenceAdapter {
    columns: ReferenceColumns,
}

impl ReferenceAdapter {
    pub fn new(columns: ReferenceColumns) -> Self {
        Self { columns }
    }
}

impl Default for ReferenceAdapter {
    fn default() -> Self {
        Self::new(ReferenceColumns::default())
    }
}

impl RecordAdapter for ReferenceAdapter {
    fn dataset(&self) -> Dataset {
        Dataset::Reference
    }

    fn adapt(&self, table: &Table) -> Result<Vec<CommonRecord>, ReconError> {
        let [first_idx, last_idx, phone_idx] = require_columns(
            self.dataset(),
            table,
            [
                &self.columns.first_name,
                &self.columns.last_name,
                &self.columns.phone,
            ],
        )?;

        let records = (0..table.row_count())
            .filter_map(|row| {
                let first = table.value(row, first_idx).map(ToString::to_string).unwrap_or_default();
                let last = table.value(row, last_idx).map(ToString::to_string).unwrap_or_default();
                let full_name = format!("{first} {last}").trim().to_string();
                let name_cell = CellValue::Text(full_name.clone());
                common_record(row, full_name, Some(&name_cell), table.value(row, phone_idx))
            })
            .collect::<Vec<_>>();

        log::debug!(
            "{}: {} of {} reference rows retained",
            table.origin,
            records.len(),
            table.row_count()
        );
        Ok(records)
    }
}

/// Resolve every required column, reporting all missing ones at once.
fn require_columns<const N: usize>(
    dataset: Dataset,
    table: &Table,
    names: [&String; N],
) -> Result<[usize; N], ReconError> {
    let mut indices = [0usize; N];
    let mut missing = Vec::new();

    for (slot, name) in indices.iter_mut().zip(names) {
        match table.column_index(name) {
            Some(idx) => *slot = idx,
            None => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(ReconError::MissingColumns {
            dataset,
            origin: table.origin.clone(),
            sheet: table.sheet.clone(),
            missing,
        });
    }
    Ok(indices)
}

fn common_record(
    row_index: usize,
    display_name: String,
    name: Option<&CellValue>,
    phone: Option<&CellValue>,
) -> Option<CommonRecord> {
    let normalized_name = normalize_name(name);
    let normalized_phone = normalize_phone(phone);
    if normalized_name.is_empty() && normalized_phone.is_empty() {
        return None;
    }
    Some(CommonRecord {
        row_index,
        display_name,
        display_phone: phone.cloned().unwrap_or(CellValue::Empty),
        normalized_name,
        normalized_phone,
    })
}
