use crate::index::{MatchKey, ReferenceIndex};
use crate::model::{CommonRecord, MatchOutcome};

/// Classify one source record against the reference index.
///
/// Rules, first hit wins: exact (name, phone) pair; name alone; phone alone.
/// A partial rule only applies when its component is non-empty.
pub fn classify(index: &ReferenceIndex, record: &CommonRecord) -> MatchOutcome {
    let name = record.normalized_name.as_str();
    let phone = record.normalized_phone.as_str();

    if index.contains(&MatchKey::full(name, phone)) {
        MatchOutcome::Exact
    } else if !name.is_empty() && index.contains(&MatchKey::name_only(name)) {
        MatchOutcome::NameOnly
    } else if !phone.is_empty() && index.contains(&MatchKey::phone_only(phone)) {
        MatchOutcome::PhoneOnly
    } else {
        MatchOutcome::Unmatched
    }
}
