use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::{CourseId, FieldMap};

/// Unwrap one of the backend's response shapes into its payload.
///
/// - `{"status": "success", "data": ...}` yields `data`
/// - `{"success": false, "message": ...}` is an [`AppError::Api`]
/// - `{"success": true, "data": ...}` yields `data`
/// - anything else is a legacy body and is returned as-is
pub fn unwrap_envelope(body: Value) -> Result<Value, AppError> {
    let Value::Object(mut map) = body else {
        return Ok(body);
    };

    if let Some(success) = map.get("success").and_then(Value::as_bool) {
        if !success {
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Request was not successful")
                .to_string();
            return Err(AppError::Api(message));
        }
        return Ok(map.remove("data").unwrap_or(Value::Object(map)));
    }

    match map.get("status").and_then(Value::as_str) {
        Some("success") => Ok(map.remove("data").unwrap_or(Value::Null)),
        Some("error") | Some("fail") => {
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Request failed")
                .to_string();
            Err(AppError::Api(message))
        }
        _ => Ok(Value::Object(map)),
    }
}

/// Best-effort server message out of an error body.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Collections sometimes arrive wrapped as `{"items": [...]}` or `{"results": [...]}`.
pub fn into_list(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) => ["items", "results", "rows"]
            .iter()
            .find_map(|key| map.remove(*key).filter(Value::is_array))
            .unwrap_or(Value::Object(map)),
        Value::Null => Value::Array(Vec::new()),
        other => other,
    }
}

#[derive(Debug, Serialize)]
pub struct CreateSettingRequest<'a> {
    pub course_id: CourseId,
    #[serde(flatten)]
    pub fields: &'a FieldMap,
}
