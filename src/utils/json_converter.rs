use serde_json::Value;

/// Render a wire value as the opaque text shown in a table cell.
/// Scalars print bare, `null` is empty, containers fall back to compact JSON.
pub fn value_to_short_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
