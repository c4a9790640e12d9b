use std::collections::HashSet;

use crate::model::CommonRecord;

/// Lookup key: (normalized name, normalized phone). Partial keys leave the
/// other component empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub name: String,
    pub phone: String,
}

impl MatchKey {
    pub fn full(name: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
        }
    }

    pub fn name_only(name: &str) -> Self {
        Self::full(name, "")
    }

    pub fn phone_only(phone: &str) -> Self {
        Self::full("", phone)
    }
}

/// Accumulates reference keys. Call [`build`](Self::build) to freeze the
/// result into a [`ReferenceIndex`].
#[derive(Debug, Default)]
pub struct ReferenceIndexBuilder {
    keys: HashSet<MatchKey>,
    records: usize,
}

impl ReferenceIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the full key, plus each partial key whose component is non-empty.
    pub fn insert(&mut self, record: &CommonRecord) -> &mut Self {
        let name = record.normalized_name.as_str();
        let phone = record.normalized_phone.as_str();

        self.keys.insert(MatchKey::full(name, phone));
        if !name.is_empty() {
            self.keys.insert(MatchKey::name_only(name));
        }
        if !phone.is_empty() {
            self.keys.insert(MatchKey::phone_only(phone));
        }
        self.records += 1;
        self
    }

    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a CommonRecord>) -> &mut Self {
        for record in records {
            self.insert(record);
        }
        self
    }

    pub fn build(self) -> ReferenceIndex {
        log::debug!(
            "reference index built: {} keys from {} records",
            self.keys.len(),
            self.records
        );
        ReferenceIndex {
            keys: self.keys,
            record_count: self.records,
        }
    }
}

/// Immutable set of reference keys, shared read-only by classification.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    keys: HashSet<MatchKey>,
    record_count: usize,
}

impl ReferenceIndex {
    pub fn from_records(records: &[CommonRecord]) -> Self {
        let mut builder = ReferenceIndexBuilder::new();
        builder.extend(records);
        builder.build()
    }

    pub fn contains(&self, key: &MatchKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of distinct keys (full and partial).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of reference records the index was built from.
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}
