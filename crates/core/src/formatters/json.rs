//! JSON conversion for extracted records.

use crate::record::ProductRecord;

/// Converts one record to a JSON object.
///
/// Typed scalars keep their types; text fields stay strings.
pub fn record_to_json(record: &ProductRecord) -> serde_json::Value {
    serde_json::to_value(record).unwrap_or(serde_json::Value::Null)
}

/// Converts a batch of records to a JSON array.
pub fn records_to_json(records: &[ProductRecord]) -> serde_json::Value {
    serde_json::Value::Array(records.iter().map(record_to_json).collect())
}
