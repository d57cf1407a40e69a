use serde_json::{Number, Value};
use crate::core::types::Document;
use crate::operation::model::Operation;

// int32 length prefix + trailing NUL
const DOCUMENT_OVERHEAD: usize = 5;

/// Estimated size in bytes of `doc` once encoded as BSON
pub fn calculate_object_size(doc: &Document) -> usize {
    DOCUMENT_OVERHEAD
        + doc.iter()
            .map(|(key, value)| element_size(key.len(), value))
            .sum::<usize>()
}

/// Estimated encoded size of the operation's wire statement
pub fn operation_size(operation: &Operation) -> usize {
    match operation {
        Operation::Insert(doc) => calculate_object_size(doc),
        other => calculate_object_size(&other.to_document()),
    }
}

fn array_size(values: &[Value]) -> usize {
    // Arrays are documents keyed "0", "1", ...
    DOCUMENT_OVERHEAD
        + values.iter()
            .enumerate()
            .map(|(i, value)| element_size(decimal_digits(i), value))
            .sum::<usize>()
}

// type byte + key cstring + value
fn element_size(key_len: usize, value: &Value) -> usize {
    1 + key_len + 1 + value_size(value)
}

fn value_size(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(n) => number_size(n),
        // int32 length + bytes + NUL
        Value::String(s) => 4 + s.len() + 1,
        Value::Array(values) => array_size(values),
        Value::Object(doc) => calculate_object_size(doc),
    }
}

fn number_size(n: &Number) -> usize {
    match n.as_i64() {
        Some(i) if i32::try_from(i).is_ok() => 4,
        _ => 8,
    }
}

/// Number of base-10 digits in `n`
pub fn decimal_digits(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}
