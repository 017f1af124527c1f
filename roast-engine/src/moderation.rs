//! Text sanitation and content rules

use once_cell::sync::Lazy;
use regex::Regex;
use roast_core::{RoastError, RoastResult, ValidationError};
use std::collections::BTreeSet;

/// Topics the playground refuses to roast, with the reason reported back.
static BLOCKED_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\b(race|racial|ethnic)\b", "protected characteristic"),
        (r"(?i)\b(gender|sex|sexual orientation)\b", "protected characteristic"),
        (r"(?i)\b(disab(led|ility))\b", "protected characteristic"),
        (r"(?i)\b(religion|religious)\b", "protected characteristic"),
        (r"(?i)\b(kill|murder|suicide|die)\b", "violence"),
        (r"(?i)\b(slur|hate)\b", "hateful language"),
    ]
    .into_iter()
    .filter_map(|(pattern, reason)| Regex::new(pattern).ok().map(|re| (re, reason)))
    .collect()
});

/// Strip angle brackets, trim, and truncate to `max_len` characters.
pub fn sanitize(text: &str, max_len: usize) -> String {
    let stripped: String = text.chars().filter(|c| *c != '<' && *c != '>').collect();
    stripped.trim().chars().take(max_len).collect::<String>().trim_end().to_string()
}

/// Reason the text is blocked, if any.
pub fn flag_reason(text: &str) -> Option<&'static str> {
    BLOCKED_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, reason)| *reason)
}

pub fn is_content_safe(text: &str) -> bool {
    flag_reason(text).is_none()
}

pub fn check_content(field: &str, text: &str) -> RoastResult<()> {
    match flag_reason(text) {
        Some(reason) => Err(ValidationError::ContentFlagged {
            field: field.to_string(),
            reason: reason.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

/// Sanitize and require a non-empty result.
pub fn required_text(field: &str, text: &str, max_len: usize) -> RoastResult<String> {
    let clean = sanitize(text, max_len);
    if clean.is_empty() {
        return Err(RoastError::required(field));
    }
    Ok(clean)
}

/// Trim and require a non-empty result, rejecting rather than rewriting text
/// that is too long or carries angle brackets. Used where the stored value
/// must match what the caller will later look it up by.
pub fn exact_text(field: &str, text: &str, max_len: usize) -> RoastResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RoastError::required(field));
    }
    if trimmed.chars().count() > max_len {
        return Err(RoastError::invalid(
            field,
            format!("longer than {} characters", max_len),
        ));
    }
    if trimmed.contains(['<', '>']) {
        return Err(RoastError::invalid(field, "angle brackets are not allowed"));
    }
    Ok(trimmed.to_string())
}

/// Sanitized, lowercased, deduplicated tags; at most `max_tags`, first seen wins.
pub fn normalize_tags(tags: &[String], max_tags: usize, max_len: usize) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    for tag in tags {
        if seen.len() >= max_tags {
            break;
        }
        let clean = sanitize(tag, max_len).to_lowercase();
        if !clean.is_empty() {
            seen.insert(clean);
        }
    }
    seen
}
