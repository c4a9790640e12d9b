use std::collections::HashMap;

use crate::classify::classify;
use crate::index::ReferenceIndex;
use crate::model::{CommonRecord, Difference, MatchOutcome, MatchOutput};

/// Classify every source record; collect the unmatched ones in source order.
pub fn find_differences(index: &ReferenceIndex, source: &[CommonRecord]) -> MatchOutput {
    let mut differences = Vec::new();
    let mut outcome_counts: HashMap<MatchOutcome, usize> = HashMap::new();

    for record in source {
        let outcome = classify(index, record);
        *outcome_counts.entry(outcome).or_insert(0) += 1;

        if !outcome.is_match() {
            differences.push(Difference {
                row_index: record.row_index,
                display_name: record.display_name.clone(),
                display_phone: record.display_phone.clone(),
            });
        }
    }

    log::debug!(
        "classified {} source records: {} differences",
        source.len(),
        differences.len()
    );

    MatchOutput {
        differences,
        outcome_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn rec(row_index: usize, name: &str, phone: &str) -> CommonRecord {
        CommonRecord {
            row_index,
            display_name: name.to_uppercase(),
            display_phone: CellValue::Text(phone.into()),
            normalized_name: name.into(),
            normalized_phone: phone.into(),
        }
    }

    #[test]
    fn differences_in_source_order() {
        let reference = vec![rec(0, "a", "1"), rec(1, "b", "2")];
        let source = vec![
            rec(7, "z", "9"),
            rec(8, "a", "1"),
            rec(10, "y", "8"),
            rec(11, "x", "2"),
        ];
        let index = ReferenceIndex::from_records(&reference);
        let out = find_differences(&index, &source);

        let rows: Vec<usize> = out.differences.iter().map(|d| d.row_index).collect();
        assert_eq!(rows, vec![7, 10]);
        assert_eq!(out.differences[0].display_name, "Z");
        assert_eq!(out.outcome_counts.get(&MatchOutcome::Exact), Some(&1));
        assert_eq!(out.outcome_counts.get(&MatchOutcome::PhoneOnly), Some(&1));
        assert_eq!(out.outcome_counts.get(&MatchOutcome::Unmatched), Some(&2));
        assert_eq!(out.outcome_counts.get(&MatchOutcome::NameOnly), None);
    }

    #[test]
    fn reference_against_itself_has_no_differences() {
        let reference = vec![rec(0, "a", "1"), rec(1, "", "2"), rec(2, "c", ""), rec(3, "a", "4")];
        let index = ReferenceIndex::from_records(&reference);
        let out = find_differences(&index, &reference);
        assert!(out.differences.is_empty());
    }

    #[test]
    fn empty_source() {
        let index = ReferenceIndex::from_records(&[rec(0, "a", "1")]);
        let out = find_differences(&index, &[]);
        assert!(out.differences.is_empty());
        assert!(out.outcome_counts.is_empty());
    }
}
