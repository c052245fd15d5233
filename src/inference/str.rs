use chrono::{DateTime, NaiveDate, NaiveDateTime};
use crate::config::DatePolicy;
use crate::ir::TypeKind;

pub fn classify_string(s: &str, policy: &DatePolicy) -> TypeKind {
    if looks_like_date(s, policy) { TypeKind::Date } else { TypeKind::String }
}

/// Strict parse against the policy's formats. Surrounding whitespace or any
/// trailing text makes the parse fail.
pub fn looks_like_date(s: &str, policy: &DatePolicy) -> bool {
    if !policy.enabled || s.is_empty() {
        return false;
    }
    // every accepted format starts with a digit; skip chrono for ordinary text
    if !s.as_bytes()[0].is_ascii_digit() {
        return false;
    }
    if policy.rfc3339 && DateTime::parse_from_rfc3339(s).is_ok() {
        return true;
    }
    policy.formats.iter().any(|fmt| {
        NaiveDateTime::parse_from_str(s, fmt).is_ok() || NaiveDate::parse_from_str(s, fmt).is_ok()
    })
}
