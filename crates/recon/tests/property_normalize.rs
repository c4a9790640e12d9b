// Property-based tests for normalization and matching.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use rollcall_recon::index::ReferenceIndex;
use rollcall_recon::matcher::find_differences;
use rollcall_recon::model::{CellValue, CommonRecord};
use rollcall_recon::normalize::{normalize_name, normalize_phone};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Arbitrary cell: mostly text (including non-ASCII and odd whitespace),
/// sometimes numeric, sometimes empty.
fn arb_cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        4 => any::<String>().prop_map(CellValue::Text),
        2 => r"[ \tA-Za-zÇĞİÖŞÜçğıöşü]{0,20}".prop_map(CellValue::Text),
        2 => r"[+() 0-9.-]{0,16}".prop_map(CellValue::Text),
        1 => any::<f64>().prop_map(CellValue::Number),
        1 => any::<i64>().prop_map(CellValue::Int),
        1 => any::<bool>().prop_map(CellValue::Bool),
        1 => Just(CellValue::Empty),
    ]
}

fn arb_record() -> impl Strategy<Value = CommonRecord> {
    (arb_cell(), arb_cell()).prop_map(|(name, phone)| CommonRecord {
        row_index: 0,
        display_name: name.to_string(),
        normalized_name: normalize_name(Some(&name)),
        normalized_phone: normalize_phone(Some(&phone)),
        display_phone: phone,
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn name_is_idempotent(cell in arb_cell()) {
        let once = normalize_name(Some(&cell));
        let twice = normalize_name(Some(&CellValue::Text(once.clone())));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn name_has_no_edge_or_double_whitespace(cell in arb_cell()) {
        let name = normalize_name(Some(&cell));
        prop_assert_eq!(name.trim(), name.as_str());
        prop_assert!(!name.contains("  "));
    }

    #[test]
    fn phone_is_digits_only(cell in arb_cell()) {
        let phone = normalize_phone(Some(&cell));
        prop_assert!(phone.chars().all(|c| c.is_ascii_digit()), "non-digit in {:?}", phone);
    }

    #[test]
    fn phone_is_idempotent(cell in arb_cell()) {
        let once = normalize_phone(Some(&cell));
        let twice = normalize_phone(Some(&CellValue::Text(once.clone())));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reference_matches_itself(records in prop::collection::vec(arb_record(), 0..40)) {
        let retained: Vec<CommonRecord> = records
            .into_iter()
            .enumerate()
            .filter(|(_, r)| !r.normalized_name.is_empty() || !r.normalized_phone.is_empty())
            .map(|(i, mut r)| { r.row_index = i; r })
            .collect();
        let index = ReferenceIndex::from_records(&retained);
        let out = find_differences(&index, &retained);
        prop_assert!(out.differences.is_empty());
    }

    #[test]
    fn adding_reference_records_never_adds_differences(
        base in prop::collection::vec(arb_record(), 0..20),
        extra in prop::collection::vec(arb_record(), 0..20),
        source in prop::collection::vec(arb_record(), 0..20),
    ) {
        let small = ReferenceIndex::from_records(&base);
        let mut all = base.clone();
        all.extend(extra);
        let large = ReferenceIndex::from_records(&all);

        let before = find_differences(&small, &source).differences.len();
        let after = find_differences(&large, &source).differences.len();
        prop_assert!(after <= before);
    }
}

#[test]
fn missing_values_normalize_to_empty() {
    assert_eq!(normalize_name(None), "");
    assert_eq!(normalize_phone(None), "");
}
