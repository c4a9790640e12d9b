//! Canonical comparison forms for name and phone cells.
//!
//! Both inputs are schematically inconsistent (numeric vs. text phone
//! columns, mixed-case names), so every comparison goes through here. The
//! functions are total: any cell, including a missing one, maps to a string.

use crate::model::CellValue;

/// Lower-case, trim, and collapse whitespace runs to a single space.
/// Missing cells normalize to `""`.
pub fn normalize_name(raw: Option<&CellValue>) -> String {
    match raw {
        Some(value) if !value.is_absent() => normalize_name_text(&value.to_string()),
        _ => String::new(),
    }
}

/// Keep only decimal digits, any script, folded to ASCII (`٠٥٥٥` → `0555`).
/// Missing cells normalize to `""`.
pub fn normalize_phone(raw: Option<&CellValue>) -> String {
    match raw {
        Some(value) if !value.is_absent() => normalize_phone_text(&value.to_string()),
        _ => String::new(),
    }
}

pub fn normalize_name_text(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_phone_text(text: &str) -> String {
    text.chars()
        .filter_map(decimal_digit_value)
        .map(|d| char::from(b'0' + d))
        .collect()
}

/// First code point (the zero) of every Unicode decimal-digit (`Nd`) run.
/// Each run is exactly ten consecutive code points, zero through nine.
const DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6,
    0x0C66, 0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0,
    0x1810, 0x1946, 0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620,
    0xA8D0, 0xA900, 0xA9D0, 0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066,
    0x110F0, 0x11136, 0x111D0, 0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730,
    0x118E0, 0x11950, 0x11C50, 0x11D50, 0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50,
    0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950,
    0x1FBF0,
];

/// Value of a decimal digit in any script, `None` for everything else.
fn decimal_digit_value(c: char) -> Option<u8> {
    if c.is_ascii_digit() {
        return Some(c as u8 - b'0');
    }
    let cp = c as u32;
    let run = DIGIT_ZEROS.partition_point(|&zero| zero <= cp).checked_sub(1)?;
    let offset = cp - DIGIT_ZEROS[run];
    (offset < 10).then_some(offset as u8)
}
