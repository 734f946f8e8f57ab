// 🧹 Description Normalizer
// Canonical form used when comparing free-text descriptions.

use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\d+").expect("valid regex"));
static FOUR_DIGIT_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("valid regex"));

/// Lowercase, drop reference numbers (`#NNNN`, bare 4-digit groups) and
/// punctuation, collapse whitespace. Never fails; may return an empty string.
pub fn normalize(description: &str) -> String {
    let lowered = description.to_lowercase();
    let without_refs = REFERENCE_NUMBER.replace_all(&lowered, " ");
    let without_groups = FOUR_DIGIT_GROUP.replace_all(&without_refs, " ");

    let cleaned: String = without_groups
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
