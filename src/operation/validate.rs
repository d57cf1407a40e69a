use serde_json::Value;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Document;
use crate::operation::model::UpdateModification;

fn is_operator(key: &str) -> bool {
    key.starts_with('$')
}

/// True when the document leads with an update operator such as `$set`
pub fn has_atomic_operators(doc: &Document) -> bool {
    doc.keys().next().is_some_and(|key| is_operator(key))
}

/// Accepts an operator document or an aggregation pipeline
pub fn validate_update(update: Value) -> Result<UpdateModification> {
    match update {
        Value::Object(doc) => {
            if !has_atomic_operators(&doc) {
                return Err(Error::new(
                    ErrorKind::InvalidUpdate,
                    "Update document requires atomic operators".to_string(),
                ));
            }
            if doc.keys().any(|key| !is_operator(key)) {
                return Err(Error::new(
                    ErrorKind::InvalidUpdate,
                    "Update document must not mix atomic operators with replacement fields".to_string(),
                ));
            }
            Ok(UpdateModification::Operators(doc))
        }
        Value::Array(stages) => {
            if stages.is_empty() {
                return Err(Error::new(
                    ErrorKind::InvalidUpdate,
                    "Update pipeline must contain at least one stage".to_string(),
                ));
            }
            let mut pipeline = Vec::with_capacity(stages.len());
            for stage in stages {
                match stage {
                    Value::Object(stage) if has_atomic_operators(&stage) => pipeline.push(stage),
                    _ => {
                        return Err(Error::new(
                            ErrorKind::InvalidUpdate,
                            "Update pipeline stages must be documents led by an operator".to_string(),
                        ));
                    }
                }
            }
            Ok(UpdateModification::Pipeline(pipeline))
        }
        other => Err(Error::new(
            ErrorKind::InvalidUpdate,
            format!("Update must be a document or a pipeline, got {}", other),
        )),
    }
}

/// Accepts a full replacement document without any operator keys
pub fn validate_replacement(replacement: Document) -> Result<UpdateModification> {
    if replacement.keys().any(|key| is_operator(key)) {
        return Err(Error::new(
            ErrorKind::InvalidUpdate,
            "Replacement document must not use atomic operators".to_string(),
        ));
    }
    Ok(UpdateModification::Replacement(replacement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn operator_documents_pass() {
        let update = validate_update(json!({"$set": {"a": 1}, "$inc": {"n": 1}})).unwrap();
        assert!(matches!(update, UpdateModification::Operators(_)));
    }

    #[test]
    fn plain_fields_are_rejected_as_update() {
        let err = validate_update(json!({"a": 1})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUpdate);

        let err = validate_update(json!({})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUpdate);
    }

    #[test]
    fn mixed_update_is_rejected() {
        let err = validate_update(json!({"$set": {"a": 1}, "b": 2})).unwrap_err();
        assert!(err.context.contains("mix"));
    }

    #[test]
    fn pipelines_need_operator_stages() {
        assert!(validate_update(json!([{"$set": {"a": 1}}])).is_ok());
        assert!(validate_update(json!([{"a": 1}])).is_err());
        assert!(validate_update(json!(7)).is_err());
    }

    #[test]
    fn empty_pipeline_is_rejected() {
        let err = validate_update(json!([])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUpdate);
    }

    #[test]
    fn replacement_rejects_operators_anywhere_at_top_level() {
        assert!(validate_replacement(doc(json!({"a": 1}))).is_ok());
        assert!(validate_replacement(doc(json!({"a": 1, "$set": {"b": 2}}))).is_err());
    }
}
