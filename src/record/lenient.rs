use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn raw<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text, with absent or non-scalar values read as the empty string
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw(deserializer)?
        .as_ref()
        .and_then(scalar_text)
        .unwrap_or_default())
}

/// Optional text; blank strings count as absent
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw(deserializer)?
        .as_ref()
        .and_then(scalar_text)
        .filter(|s| !s.trim().is_empty()))
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw(deserializer)?.as_ref().and_then(number))
}

pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw(deserializer)?
        .as_ref()
        .and_then(number)
        .filter(|n| n.fract() == 0.0)
        .map(|n| n as i64))
}

/// List of text values. A bare string becomes a one-element list.
pub fn opt_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match raw(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(scalar_text)
                .filter(|s| !s.trim().is_empty())
                .collect(),
        ),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(vec![s]),
        _ => None,
    })
}

/// Number from a JSON number or a numeric string ("1 200 000" is accepted)
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}
