//! Deserialization helpers for identifier fields.
//!
//! The WhatsApp Cloud API is inconsistent about whether numeric identifiers
//! (phone_number_id, WABA id) arrive as JSON numbers or strings. Every lookup
//! key is funnelled through these helpers so that `"123"` and `123` end up as
//! the same canonical string.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Canonicalize a JSON value into a non-empty lookup key string.
///
/// Strings are trimmed; numbers are rendered in their JSON form. Empty
/// strings and non-scalar values yield `None`.
pub fn canonical_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deserialize a required identifier that may arrive as a string or number.
pub(crate) fn flex_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    canonical_key(&value)
        .ok_or_else(|| serde::de::Error::custom("expected a non-empty string or number"))
}

/// Deserialize an optional identifier that may arrive as a string or number.
///
/// `null`, absent, and empty-string values all become `None`.
pub(crate) fn opt_flex_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(canonical_key))
}
