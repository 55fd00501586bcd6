use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::models::{Field, FieldMapping, InstanceRecord, InstanceState};
use crate::utils::value_to_short_string;
use super::error::FetchError;

/// Turn a decoded payload into inventory records, keeping server order.
///
/// The body must be a JSON array of objects, each with a non-empty identity
/// that is unique within the list. Descriptive fields are opaque strings;
/// `null` or absent becomes "".
pub fn parse_inventory(payload: &Value, mapping: &FieldMapping) -> Result<Vec<InstanceRecord>, FetchError> {
    let arr = payload
        .as_array()
        .ok_or_else(|| FetchError::Payload("API returned non-array data.".into()))?;

    let mut seen = HashSet::with_capacity(arr.len());
    let mut records = Vec::with_capacity(arr.len());
    for (index, item) in arr.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| FetchError::Payload(format!("element {} is not an object", index)))?;
        let record = parse_record(obj, mapping)
            .ok_or_else(|| FetchError::Payload(format!("element {} has no instance id", index)))?;
        if !seen.insert(record.id.clone()) {
            return Err(FetchError::Payload(format!("duplicate instance id {}", record.id)));
        }
        records.push(record);
    }
    Ok(records)
}

fn parse_record(obj: &Map<String, Value>, mapping: &FieldMapping) -> Option<InstanceRecord> {
    let text = |field: Field| mapping.lookup(obj, field).map(value_to_short_string).unwrap_or_default();

    let id = text(Field::Id).trim().to_string();
    if id.is_empty() {
        return None;
    }

    let mut record = InstanceRecord::new_with_defaults(id);
    let name = text(Field::Name);
    if !name.trim().is_empty() {
        record.name = name;
    }
    record.state = InstanceState::parse(&text(Field::State));
    record.instance_type = text(Field::InstanceType);
    record.availability_zone = text(Field::AvailabilityZone);
    record.private_ip = text(Field::PrivateIp);
    record.project = text(Field::Project);
    record.tenant = text(Field::Tenant);
    record.owner = text(Field::Owner);
    record.cpu_history = mapping.lookup(obj, Field::CpuHistory).and_then(|v| parse_history(&record.id, v));
    Some(record)
}

// Non-numeric entries become NaN so the chart can drop them without shifting
// the dates of their neighbours.
fn parse_history(id: &str, value: &Value) -> Option<Vec<f64>> {
    match value {
        Value::Array(items) => Some(items.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect()),
        Value::Null => None,
        other => {
            tracing::warn!(instance_id = %id, value = %other, "CPU history is not an array; ignoring");
            None
        }
    }
}
