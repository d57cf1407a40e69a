use serde_json::Value;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Document, Hint};
use crate::operation::model::{DeleteStatement, Operation, UpdateStatement};
use crate::operation::validate::{validate_replacement, validate_update};

const SUPPORTED: &str = "insertOne, updateOne, updateMany, replaceOne, deleteOne, deleteMany";

fn invalid(context: String) -> Error {
    Error::new(ErrorKind::InvalidArgument, context)
}

/// Parse a pre-shaped descriptor such as `{"deleteOne": {"filter": {...}}}`
pub fn parse_raw(descriptor: &Value) -> Result<Operation> {
    let entries = descriptor
        .as_object()
        .filter(|entries| entries.len() == 1)
        .ok_or_else(|| invalid(format!("Raw operation must contain exactly one of {}", SUPPORTED)))?;

    let Some((name, body)) = entries.iter().next() else {
        return Err(invalid(format!("Raw operation must contain exactly one of {}", SUPPORTED)));
    };
    let body = body
        .as_object()
        .ok_or_else(|| invalid(format!("Raw operation {} must be a document", name)))?;

    // Wire-shaped statements bypass validation
    if name != "insertOne" && body.contains_key("q") {
        return Err(invalid("Raw operations are not allowed".to_string()));
    }

    match name.as_str() {
        "insertOne" => match body.get("document") {
            Some(Value::Object(doc)) => Ok(Operation::Insert(doc.clone())),
            Some(_) => Err(invalid("insertOne document must be a document".to_string())),
            // Legacy shape: the body is the document itself
            None => Ok(Operation::Insert(body.clone())),
        },
        "updateOne" | "updateMany" => {
            let update = body
                .get("update")
                .cloned()
                .ok_or_else(|| invalid(format!("{} requires an update", name)))?;
            let mut statement = UpdateStatement::new(
                required_document(body, "filter", name)?,
                validate_update(update)?,
                name == "updateMany",
            );
            statement.upsert = optional_bool(body, "upsert", name)?;
            statement.array_filters = optional_array_filters(body, name)?;
            statement.collation = optional_document(body, "collation", name)?;
            statement.hint = optional_hint(body, name)?;
            Ok(Operation::Update(statement))
        }
        "replaceOne" => {
            let mut statement = UpdateStatement::new(
                required_document(body, "filter", name)?,
                validate_replacement(required_document(body, "replacement", name)?)?,
                false,
            );
            statement.upsert = optional_bool(body, "upsert", name)?;
            statement.collation = optional_document(body, "collation", name)?;
            statement.hint = optional_hint(body, name)?;
            Ok(Operation::Update(statement))
        }
        "deleteOne" | "deleteMany" => {
            let limit = if name == "deleteOne" { 1 } else { 0 };
            let mut statement = DeleteStatement::new(required_document(body, "filter", name)?, limit);
            statement.collation = optional_document(body, "collation", name)?;
            statement.hint = optional_hint(body, name)?;
            Ok(Operation::Delete(statement))
        }
        other => Err(invalid(format!("Unsupported raw operation {}, expected one of {}", other, SUPPORTED))),
    }
}

fn required_document(body: &Document, field: &str, op: &str) -> Result<Document> {
    match body.get(field) {
        Some(Value::Object(doc)) => Ok(doc.clone()),
        Some(_) => Err(invalid(format!("{}.{} must be a document", op, field))),
        None => Err(invalid(format!("{} requires a {}", op, field))),
    }
}

fn optional_document(body: &Document, field: &str, op: &str) -> Result<Option<Document>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(doc)) => Ok(Some(doc.clone())),
        Some(_) => Err(invalid(format!("{}.{} must be a document", op, field))),
    }
}

fn optional_bool(body: &Document, field: &str, op: &str) -> Result<bool> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(invalid(format!("{}.{} must be a boolean", op, field))),
    }
}

fn optional_hint(body: &Document, op: &str) -> Result<Option<Hint>> {
    match body.get("hint") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Hint::from_value(value)
            .map(Some)
            .ok_or_else(|| invalid(format!("{}.hint must be an index name or key pattern", op))),
    }
}

fn optional_array_filters(body: &Document, op: &str) -> Result<Option<Vec<Document>>> {
    match body.get("arrayFilters") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(filters)) => filters
            .iter()
            .map(|filter| {
                filter
                    .as_object()
                    .cloned()
                    .ok_or_else(|| invalid(format!("{}.arrayFilters entries must be documents", op)))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(invalid(format!("{}.arrayFilters must be an array", op))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::operation::model::{BatchType, UpdateModification};

    #[test]
    fn insert_one_accepts_both_shapes() {
        let wrapped = parse_raw(&json!({"insertOne": {"document": {"a": 1}}})).unwrap();
        let legacy = parse_raw(&json!({"insertOne": {"a": 1}})).unwrap();
        assert_eq!(wrapped, legacy);
        assert_eq!(wrapped.batch_type(), BatchType::Insert);
    }

    #[test]
    fn update_many_sets_multi_and_options() {
        let op = parse_raw(&json!({"updateMany": {
            "filter": {"x": 1},
            "update": {"$set": {"y.$[e]": 2}},
            "upsert": true,
            "arrayFilters": [{"e": {"$gt": 1}}],
            "hint": {"x": 1}
        }}))
        .unwrap();

        let Operation::Update(statement) = op else { panic!("expected update") };
        assert!(statement.multi);
        assert!(statement.upsert);
        assert_eq!(statement.array_filters.as_ref().map(Vec::len), Some(1));
        assert!(matches!(statement.hint, Some(Hint::Keys(_))));
    }

    #[test]
    fn replace_one_is_single_and_validated() {
        let op = parse_raw(&json!({"replaceOne": {"filter": {}, "replacement": {"a": 2}}})).unwrap();
        let Operation::Update(statement) = op else { panic!("expected update") };
        assert!(!statement.multi);
        assert!(matches!(statement.update, UpdateModification::Replacement(_)));

        let err = parse_raw(&json!({"replaceOne": {"filter": {}, "replacement": {"$set": {"a": 2}}}})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUpdate);
    }

    #[test]
    fn delete_limits() {
        let one = parse_raw(&json!({"deleteOne": {"filter": {"a": 1}}})).unwrap();
        let many = parse_raw(&json!({"deleteMany": {"filter": {"a": 1}}})).unwrap();
        assert!(matches!(one, Operation::Delete(DeleteStatement { limit: 1, .. })));
        assert!(matches!(many, Operation::Delete(DeleteStatement { limit: 0, .. })));
    }

    #[test]
    fn malformed_descriptors_are_rejected() {
        for descriptor in [
            json!("insertOne"),
            json!({}),
            json!({"insertMany": {"documents": []}}),
            json!({"insertOne": {"document": {}}, "deleteOne": {"filter": {}}}),
            json!({"deleteOne": {}}),
            json!({"deleteOne": {"filter": 3}}),
            json!({"updateOne": {"filter": {}}}),
            json!({"updateOne": {"q": {}, "u": {"$set": {"a": 1}}}}),
            json!({"updateOne": {"filter": {}, "update": {"$set": {}}, "upsert": "yes"}}),
        ] {
            let err = parse_raw(&descriptor).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidArgument, "{}", descriptor);
        }
    }
}
