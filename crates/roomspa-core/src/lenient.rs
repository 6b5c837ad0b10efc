//! Forgiving field decoders for backend records
//!
//! The backend is not strict about scalar encodings: identifiers arrive as
//! integers or UUID strings, decimals as numbers or strings, and optional
//! fields as `null` or missing entirely. These helpers decode through
//! [`serde_json::Value`] and fall back to the type's default instead of
//! failing the whole payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a string, number or boolean into a `String`; `null` becomes empty
///
/// # Errors
///
/// Only fails when the underlying deserializer itself fails.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Like [`string`] but keeps absence and blank strings as `None`
///
/// # Errors
///
/// Only fails when the underlying deserializer itself fails.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(deserializer)?).filter(|s| !s.trim().is_empty()))
}

/// Decode a number or numeric string into `f64`; anything else becomes `0.0`
///
/// # Errors
///
/// Only fails when the underlying deserializer itself fails.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_f64(&Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Decode a number or numeric string into `Option<f64>`
///
/// # Errors
///
/// Only fails when the underlying deserializer itself fails.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_f64(&Value::deserialize(deserializer)?))
}

/// Decode a non-negative count; negatives, fractions and junk collapse to `0`
///
/// # Errors
///
/// Only fails when the underlying deserializer itself fails.
pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_u64(&Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Decode an optional non-negative count
///
/// # Errors
///
/// Only fails when the underlying deserializer itself fails.
pub fn opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_u64(&Value::deserialize(deserializer)?))
}

/// Decode a boolean from `true`/`false`, `0`/`1` or `"true"`/`"false"`
///
/// # Errors
///
/// Only fails when the underlying deserializer itself fails.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    })
}

/// Decode a list of strings, dropping non-string entries; `null` becomes empty
///
/// # Errors
///
/// Only fails when the underlying deserializer itself fails.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().filter_map(value_to_string).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

/// Decode a list of records, skipping entries that do not decode; `null` or a
/// non-array becomes empty
///
/// # Errors
///
/// Only fails when the underlying deserializer itself fails.
pub fn rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Read a scalar as text
#[must_use]
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a number or numeric string; non-finite values are dropped
#[must_use]
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Read a non-negative integer or integer string
#[must_use]
pub fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
