use std::fmt;
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

/// In-memory document, keys kept in insertion order
pub type Document = Map<String, Value>;

/// Database + collection a bulk operation writes to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    pub db: String,
    pub coll: String,
}

impl Namespace {
    pub fn new(db: impl Into<String>, coll: impl Into<String>) -> Self {
        Namespace {
            db: db.into(),
            coll: coll.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.db, self.coll)
    }
}

/// The `w` component of a write concern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Acknowledgment {
    Nodes(u32),
    Tag(String),
}

impl Acknowledgment {
    pub fn majority() -> Self {
        Acknowledgment::Tag("majority".to_string())
    }
}

/// Acknowledgment level requested from the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteConcern {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<Acknowledgment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub j: Option<bool>,
    #[serde(rename = "wtimeout", skip_serializing_if = "Option::is_none")]
    pub w_timeout_ms: Option<u64>,
}

impl WriteConcern {
    pub fn w(nodes: u32) -> Self {
        WriteConcern {
            w: Some(Acknowledgment::Nodes(nodes)),
            ..Default::default()
        }
    }

    pub fn unacknowledged() -> Self {
        WriteConcern::w(0)
    }

    /// `w: 0` without journaling means the server sends nothing back worth merging
    pub fn is_acknowledged(&self) -> bool {
        !(self.w == Some(Acknowledgment::Nodes(0)) && self.j != Some(true))
    }
}

/// Index hint, either by name or by key pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hint {
    Name(String),
    Keys(Document),
}

impl Hint {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(Hint::Name(name.clone())),
            Value::Object(keys) => Some(Hint::Keys(keys.clone())),
            _ => None,
        }
    }
}
