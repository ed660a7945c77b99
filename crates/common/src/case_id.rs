//! Case id extraction from the confirmation banner

use once_cell::sync::Lazy;
use regex::Regex;

static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("valid regex"));

static CASE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^APW-\d+$").expect("valid regex"));

/// Pull the case id out of banner text such as `"Case created (APW-1234)"`.
///
/// Falls back to the whole text with parentheses stripped.
pub fn extract_case_id(text: &str) -> String {
    let text = text.trim();
    match PARENTHESIZED.captures(text).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().trim().to_string(),
        None => text.replace(['(', ')'], "").trim().to_string(),
    }
}

pub fn is_case_id(id: &str) -> bool {
    CASE_ID.is_match(id)
}
