use crate::model::{MatchOutcome, MatchOutput, ReconSummary};

/// Row and record counts for one run.
pub struct StageCounts {
    pub source_rows: usize,
    pub source_records: usize,
    pub reference_rows: usize,
    pub reference_records: usize,
    pub index_keys: usize,
}

/// Compute summary statistics from stage counts and match output.
pub fn compute_summary(stages: &StageCounts, output: &MatchOutput) -> ReconSummary {
    let count = |outcome: MatchOutcome| output.outcome_counts.get(&outcome).copied().unwrap_or(0);

    ReconSummary {
        source_rows: stages.source_rows,
        source_records: stages.source_records,
        reference_rows: stages.reference_rows,
        reference_records: stages.reference_records,
        index_keys: stages.index_keys,
        matched_exact: count(MatchOutcome::Exact),
        matched_name_only: count(MatchOutcome::NameOnly),
        matched_phone_only: count(MatchOutcome::PhoneOnly),
        differences: output.differences.len(),
    }
}
