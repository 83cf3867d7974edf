//! Text sanitization for raw city records.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters dropped from incoming names and countries. Alphanumerics,
/// spaces, and hyphens survive; everything else is stripped.
static SPECIAL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^A-Za-z0-9 -]").expect("literal character class"));

/// Strips every character that is not alphanumeric, a space, or a hyphen.
///
/// Blank input yields an empty string. Case is preserved; matching is made
/// case-insensitive later, at the index and store layers.
pub fn remove_special_characters(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    SPECIAL_CHARS.replace_all(input, "").into_owned()
}
