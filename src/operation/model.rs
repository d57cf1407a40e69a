use serde::{Serialize, Deserialize};
use serde_json::Value;
use crate::core::types::{Document, Hint};

/// Kind of write a batch carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchType {
    Insert,
    Update,
    Delete,
}

impl BatchType {
    pub fn command_name(&self) -> &'static str {
        match self {
            BatchType::Insert => "insert",
            BatchType::Update => "update",
            BatchType::Delete => "delete",
        }
    }

    pub fn payload_field(&self) -> &'static str {
        match self {
            BatchType::Insert => "documents",
            BatchType::Update => "updates",
            BatchType::Delete => "deletes",
        }
    }
}

/// The `u` field of an update statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpdateModification {
    Operators(Document),
    Pipeline(Vec<Document>),
    Replacement(Document),
}

impl UpdateModification {
    pub fn is_replacement(&self) -> bool {
        matches!(self, UpdateModification::Replacement(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStatement {
    #[serde(rename = "q")]
    pub filter: Document,
    #[serde(rename = "u")]
    pub update: UpdateModification,
    pub multi: bool,
    pub upsert: bool,
    #[serde(rename = "arrayFilters", skip_serializing_if = "Option::is_none")]
    pub array_filters: Option<Vec<Document>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collation: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<Hint>,
}

impl UpdateStatement {
    pub fn new(filter: Document, update: UpdateModification, multi: bool) -> Self {
        UpdateStatement {
            filter,
            update,
            multi,
            upsert: false,
            array_filters: None,
            collation: None,
            hint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteStatement {
    #[serde(rename = "q")]
    pub filter: Document,
    // 1 removes the first match, 0 removes every match
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collation: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<Hint>,
}

impl DeleteStatement {
    pub fn new(filter: Document, limit: u32) -> Self {
        DeleteStatement {
            filter,
            limit,
            collation: None,
            hint: None,
        }
    }
}

/// A single write, immutable once appended to a bulk operation
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Insert(Document),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl Operation {
    pub fn batch_type(&self) -> BatchType {
        match self {
            Operation::Insert(_) => BatchType::Insert,
            Operation::Update(_) => BatchType::Update,
            Operation::Delete(_) => BatchType::Delete,
        }
    }

    /// Wire form of the operation as it appears inside a command payload
    pub fn to_document(&self) -> Document {
        match self {
            Operation::Insert(doc) => doc.clone(),
            Operation::Update(statement) => statement_document(statement),
            Operation::Delete(statement) => statement_document(statement),
        }
    }
}

fn statement_document<T: Serialize>(statement: &T) -> Document {
    match serde_json::to_value(statement) {
        Ok(Value::Object(doc)) => doc,
        _ => Document::new(),
    }
}
