use serde_json::Value;
use crate::batch::batch::Batch;
use crate::core::types::{Document, Namespace, WriteConcern};
use crate::operation::model::{BatchType, Operation};

/// One batch rendered as an insert/update/delete command
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCommand {
    pub batch_type: BatchType,
    pub namespace: Namespace,
    pub payload: Vec<Document>,
    pub ordered: bool,
    pub write_concern: Option<WriteConcern>,
    pub bypass_document_validation: Option<bool>,
    pub comment: Option<Value>,
}

impl WriteCommand {
    pub fn for_batch(batch: &Batch, namespace: &Namespace, ordered: bool) -> Self {
        WriteCommand {
            batch_type: batch.batch_type,
            namespace: namespace.clone(),
            payload: batch.operations.iter().map(Operation::to_document).collect(),
            ordered,
            write_concern: None,
            bypass_document_validation: None,
            comment: None,
        }
    }

    pub fn with_write_concern(mut self, write_concern: Option<WriteConcern>) -> Self {
        self.write_concern = write_concern;
        self
    }

    pub fn with_bypass_document_validation(mut self, bypass: Option<bool>) -> Self {
        self.bypass_document_validation = bypass;
        self
    }

    pub fn with_comment(mut self, comment: Option<Value>) -> Self {
        self.comment = comment;
        self
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Command document, e.g. `{insert: "coll", documents: [...], ordered: true}`
    pub fn to_document(&self) -> Document {
        let mut command = Document::new();
        command.insert(
            self.batch_type.command_name().to_string(),
            Value::String(self.namespace.coll.clone()),
        );
        command.insert(
            self.batch_type.payload_field().to_string(),
            Value::Array(self.payload.iter().cloned().map(Value::Object).collect()),
        );
        command.insert("ordered".to_string(), Value::Bool(self.ordered));

        if let Some(write_concern) = &self.write_concern {
            if let Ok(value) = serde_json::to_value(write_concern) {
                command.insert("writeConcern".to_string(), value);
            }
        }

        // Deletes have no document validation to bypass
        if self.bypass_document_validation == Some(true) && self.batch_type != BatchType::Delete {
            command.insert("bypassDocumentValidation".to_string(), Value::Bool(true));
        }

        if let Some(comment) = &self.comment {
            command.insert("comment".to_string(), comment.clone());
        }

        command.insert("$db".to_string(), Value::String(self.namespace.db.clone()));
        command
    }
}
