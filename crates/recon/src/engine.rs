use crate::adapter::{RecordAdapter, ReferenceAdapter, SourceAdapter};
use crate::config::SchemaConfig;
use crate::error::ReconError;
use crate::index::ReferenceIndex;
use crate::matcher::find_differences;
use crate::model::{ReconMeta, ReconResult, Table};
use crate::summary::{compute_summary, StageCounts};

/// Run reconciliation: adapt both tables, index the reference, and report the
/// source rows with no counterpart. Both tables are checked for their
/// required columns before any matching happens.
pub fn run(schema: &SchemaConfig, source: &Table, reference: &Table) -> Result<ReconResult, ReconError> {
    let source_adapter = SourceAdapter::new(schema.source.clone());
    let reference_adapter = ReferenceAdapter::new(schema.reference.clone());

    let source_records = source_adapter.adapt(source)?;
    let reference_records = reference_adapter.adapt(reference)?;

    let index = ReferenceIndex::from_records(&reference_records);
    let output = find_differences(&index, &source_records);

    let stages = StageCounts {
        source_rows: source.row_count(),
        source_records: source_records.len(),
        reference_rows: reference.row_count(),
        reference_records: reference_records.len(),
        index_keys: index.len(),
    };
    let summary = compute_summary(&stages, &output);

    log::info!(
        "{} of {} source records have no counterpart in {}",
        summary.differences,
        summary.source_records,
        reference.origin
    );

    Ok(ReconResult {
        meta: ReconMeta {
            source: source.origin.clone(),
            reference: reference.origin.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        differences: output.differences,
    })
}
