//! Text helpers shared by the card and the detail overlay.

use std::fmt::Display;

/// Marker shown in place of any field the record does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats an optional field, falling back to [`NOT_AVAILABLE`].
pub fn or_na<T: Display>(value: Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// `mr-mime` -> `Mr Mime`
pub fn title_case(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pulls the trailing Roman numeral out of an API generation name,
/// e.g. `generation-iii` -> `III`.
pub fn extract_roman_numerals(generation: &str) -> Option<String> {
    let tail = generation.rsplit('-').next()?;
    if tail.is_empty() {
        return None;
    }
    let upper = tail.to_ascii_uppercase();
    if upper.chars().all(|ch| "IVXLCDM".contains(ch)) {
        Some(upper)
    } else {
        None
    }
}
