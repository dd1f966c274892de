//! Field-level serde helpers for upstream payloads whose types drift.
//!
//! Each helper turns a value of the wrong type into `None` instead of failing
//! the enclosing struct. Use with `#[serde(default, deserialize_with = ...)]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A number, or `None` for anything else (strings included)
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?
        .as_f64()
        .filter(|v| v.is_finite()))
}

/// Unix seconds; fractional values are truncated
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    }))
}

/// A string; numbers and booleans are rendered as text
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Any deserializable shape, or `None` when the value does not fit it
pub fn shape<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "number")]
        n: Option<f64>,
        #[serde(default, deserialize_with = "timestamp")]
        t: Option<i64>,
        #[serde(default, deserialize_with = "text")]
        s: Option<String>,
        #[serde(default, deserialize_with = "shape")]
        list: Option<Vec<u8>>,
    }

    fn decode(v: serde_json::Value) -> Sample {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_well_typed_values_pass_through() {
        let p = decode(json!({ "n": 27.4, "t": 1_760_770_000, "s": "5.3", "list": [1, 2] }));
        assert_eq!(p.n, Some(27.4));
        assert_eq!(p.t, Some(1_760_770_000));
        assert_eq!(p.s.as_deref(), Some("5.3"));
        assert_eq!(p.list, Some(vec![1, 2]));
    }

    #[test]
    fn test_wrong_types_become_none() {
        let p = decode(json!({ "n": "n/a", "t": "yesterday", "s": { "x": 1 }, "list": "none" }));
        assert_eq!(p.n, None);
        assert_eq!(p.t, None);
        assert_eq!(p.s, None);
        assert_eq!(p.list, None);
    }

    #[test]
    fn test_coercions() {
        let p = decode(json!({ "t": 1_760_770_000.9, "s": 5.1 }));
        assert_eq!(p.t, Some(1_760_770_000));
        assert_eq!(p.s.as_deref(), Some("5.1"));
    }

    #[test]
    fn test_missing_and_null_are_none() {
        let p = decode(json!({ "n": null }));
        assert_eq!(p.n, None);
        assert_eq!(p.t, None);
        assert_eq!(p.s, None);
        assert_eq!(p.list, None);
    }
}
