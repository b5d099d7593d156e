use serde_json::{Number, Value};

use crate::models::FieldType;

/// Convert a raw edit value to its declared type.
///
/// `None` stands for "unset" and `Some(Value::Null)` for an explicit null;
/// both pass through untouched whatever the declared type. Applying the
/// function to its own output returns the same value.
pub fn coerce(value: Option<Value>, declared: FieldType) -> Option<Value> {
    let value = match value {
        None => return None,
        Some(Value::Null) => return Some(Value::Null),
        Some(v) => v,
    };

    match declared {
        FieldType::String => Some(Value::String(match value {
            Value::String(s) => s,
            other => string_form(&other),
        })),
        FieldType::Number => to_number(&value).map(Value::Number),
        FieldType::Boolean => Some(Value::Bool(match value {
            Value::Bool(b) => b,
            Value::String(s) => s == "true" || s == "1",
            Value::Number(n) => n.as_f64() == Some(1.0),
            _ => false,
        })),
        FieldType::Array => Some(value),
    }
}

/// Textual rendering used by string coercion and by length/pattern checks.
pub fn string_form(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(string_form).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Numeric reading of a value, if it has one.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

fn to_number(value: &Value) -> Option<Number> {
    let parsed = match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => numeric_value(other),
    }?;
    normalize(parsed)
}

// Integral values are stored as integers so 5 and "5" and 5.0 compare equal.
fn normalize(f: f64) -> Option<Number> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else {
        Number::from_f64(f)
    }
}

/// Field-level inequality used by change detection.
///
/// Numbers compare by value so an integer baseline matches a float edit;
/// a field missing from the baseline counts as null.
pub fn values_differ(edited: &Value, current: Option<&Value>) -> bool {
    let current = current.unwrap_or(&Value::Null);
    match (edited, current) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() != b.as_f64(),
        (a, b) => a != b,
    }
}
