/// Normalisation of the backend's nullable wire values.
///
/// The backend serialises SQL nullable columns either as bare JSON values or
/// as tagged wrappers such as `{"Int32": 10, "Valid": true}` and
/// `{"String": "disk full", "Valid": true}`. Every parser here fails closed:
/// anything it does not recognise becomes the safe default (`0` / `None`)
/// instead of an error.
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Keys the backend uses for the payload of a tagged integer wrapper.
const INT_KEYS: [&str; 2] = ["Int32", "Int64"];

/// Normalise a raw JSON value to a non-negative integer.
///
/// - bare non-negative numbers pass through (floats are truncated)
/// - `null`, negatives and non-numeric values become `0`
/// - `{"Int32": n, "Valid": true}` becomes `n`; `Valid: false` becomes `0`
pub fn int(value: &Value) -> u64 {
    match value {
        Value::Number(n) => number_to_u64(n),
        Value::Object(map) => {
            if matches!(map.get("Valid"), Some(Value::Bool(false))) {
                return 0;
            }
            INT_KEYS
                .iter()
                .find_map(|key| map.get(*key))
                .map(int)
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Normalise a raw JSON value to an optional string.
///
/// Empty strings are treated as absent.
pub fn text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => {
            if matches!(map.get("Valid"), Some(Value::Bool(false))) {
                return None;
            }
            map.get("String")?.as_str()?
        }
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}

fn number_to_u64(n: &serde_json::Number) -> u64 {
    if let Some(u) = n.as_u64() {
        u
    } else if let Some(f) = n.as_f64() {
        if f.is_finite() && f > 0.0 {
            f as u64
        } else {
            0
        }
    } else {
        0
    }
}

/// `#[serde(deserialize_with = ...)]` adapter for [`int`].
pub fn deserialize_int<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(int(&value))
}

/// `#[serde(deserialize_with = ...)]` adapter for [`text`].
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text(&value))
}
