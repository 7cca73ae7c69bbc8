//! Normalization of model-provided fields. Anything unrecognized collapses to
//! a fixed fallback so the rest of the pipeline only sees closed sets.

use crate::model::{ClauseCategory, Severity};

pub const REASONING_PLACEHOLDER: &str = "Unable to determine risk reasoning.";
pub const RECOMMENDATION_PLACEHOLDER: &str = "No specific recommendation generated.";
pub const SUMMARY_PLACEHOLDER: &str = "Summary generation failed.";

pub fn validate_category(raw: &str) -> ClauseCategory {
    let normalized = raw.trim().to_lowercase();
    ClauseCategory::ALL
        .into_iter()
        .find(|category| category.as_str().to_lowercase() == normalized)
        .unwrap_or(ClauseCategory::Other)
}

pub fn validate_severity(raw: &str) -> Severity {
    let mut chars = raw.trim().chars();
    let normalized = match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect::<String>(),
        None => String::new(),
    };

    Severity::ALL
        .into_iter()
        .find(|severity| severity.as_str() == normalized)
        .unwrap_or(Severity::Medium)
}

pub fn text_or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => placeholder.to_string(),
    }
}
