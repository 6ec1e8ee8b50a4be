//! Lenient deserializers for model output.
//!
//! The model is asked for a fixed JSON shape but routinely drifts: numbers come
//! back as strings, lists contain nulls, objects are replaced by `null`. These
//! helpers are used with `#[serde(default, deserialize_with = "...")]` so a
//! drifting reply still lands in the fixed shape instead of failing the request.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Renders a scalar as a string. Objects, arrays and null yield `None`.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a number out of a number or a numeric-looking string ("5", "5.5", "5+ years").
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let end = trimmed
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-'))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    trimmed[..end].parse::<f64>().ok()
}

/// Keeps string and numeric entries of an array, stringified. Anything else is dropped.
pub fn value_to_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|v| v.is_string() || v.is_number())
            .filter_map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value).unwrap_or_default())
}

pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string_list(&value))
}

/// Integer fields. Floats are rounded, unparseable input becomes 0.
pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).map(|f| f.round() as i64).unwrap_or(0))
}

pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).filter(|f| f.is_finite()).unwrap_or(0.0))
}

pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    })
}

/// Nested objects. A value of the wrong shape falls back to `T::default()`.
pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Lists of objects. Entries that do not fit `T` are dropped.
pub fn object_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Inner {
        #[serde(default, deserialize_with = "string")]
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "string")]
        title: String,
        #[serde(default, deserialize_with = "int")]
        years: i64,
        #[serde(default, deserialize_with = "float")]
        score: f64,
        #[serde(default, deserialize_with = "boolean")]
        current: bool,
        #[serde(default, deserialize_with = "string_list")]
        skills: Vec<String>,
        #[serde(default, deserialize_with = "object")]
        inner: Inner,
        #[serde(default, deserialize_with = "object_list")]
        entries: Vec<Inner>,
    }

    #[test]
    fn test_well_formed_reply_passes_through() {
        let probe: Probe = serde_json::from_value(json!({
            "title": "Engineer",
            "years": 5,
            "score": 72.5,
            "current": true,
            "skills": ["Rust", "SQL"],
            "inner": {"name": "Acme"},
            "entries": [{"name": "a"}, {"name": "b"}]
        }))
        .unwrap();
        assert_eq!(probe.title, "Engineer");
        assert_eq!(probe.years, 5);
        assert!((probe.score - 72.5).abs() < f64::EPSILON);
        assert!(probe.current);
        assert_eq!(probe.skills, vec!["Rust", "SQL"]);
        assert_eq!(probe.inner.name, "Acme");
        assert_eq!(probe.entries.len(), 2);
    }

    #[test]
    fn test_drifting_reply_is_coerced() {
        let probe: Probe = serde_json::from_value(json!({
            "title": null,
            "years": "5+ years",
            "score": "81",
            "current": "true",
            "skills": ["Rust", null, 3, {"x": 1}, ""],
            "inner": "not an object",
            "entries": [{"name": "a"}, "junk", null]
        }))
        .unwrap();
        assert_eq!(probe.title, "");
        assert_eq!(probe.years, 5);
        assert!((probe.score - 81.0).abs() < f64::EPSILON);
        assert!(probe.current);
        assert_eq!(probe.skills, vec!["Rust", "3"]);
        assert_eq!(probe.inner.name, "");
        assert_eq!(probe.entries.len(), 1);
    }

    #[test]
    fn test_missing_fields_default() {
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(probe.years, 0);
        assert!(probe.skills.is_empty());
        assert!(!probe.current);
    }

    #[test]
    fn test_float_years_round() {
        assert_eq!(value_to_f64(&json!(4.6)).map(|f| f.round() as i64), Some(5));
        assert_eq!(value_to_f64(&json!("-2")), Some(-2.0));
        assert_eq!(value_to_f64(&json!("none")), None);
    }
}
