use crate::core::ScholarshipRecord;
use serde_json::Value;

pub const LIST_FIELDS: [&str; 3] = ["fields", "benefits", "requirements"];

/// Normalizes every decoded element, keeping length and order.
pub fn normalize_records(items: Vec<Value>) -> Vec<ScholarshipRecord> {
    items.into_iter().map(normalize_record).collect()
}

/// Turns any decoded value into a record whose list attributes are sequences.
///
/// Sequences pass through as-is, element types included. Anything else in
/// those slots (missing, null, scalar, object) becomes an empty sequence.
/// A non-object element yields a record with no other attributes.
pub fn normalize_record(item: Value) -> ScholarshipRecord {
    match item {
        Value::Object(map) => ScholarshipRecord::from_map(map),
        _ => ScholarshipRecord::default(),
    }
}
