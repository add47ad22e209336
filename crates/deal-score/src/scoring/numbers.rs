use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Keeps a value only when it is a finite number.
pub fn safe_number(value: Option<f64>) -> Option<f64> {
    value.filter(|number| number.is_finite())
}

/// Converts an arbitrary JSON value into a finite number, if it represents one.
///
/// Numeric strings (`"650000"`, `" 4.5 "`) are accepted because upstream reports
/// frequently quote figures. Everything else is treated as absent.
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => safe_number(number.as_f64()),
        Value::String(raw) => safe_number(raw.trim().parse::<f64>().ok()),
        _ => None,
    }
}

/// Tolerant deserializer for optional numeric fields.
///
/// Never fails: malformed values are mapped to `None` instead of rejecting the
/// whole payload.
pub fn deserialize_safe_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(number_from_value))
}

pub(crate) fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
