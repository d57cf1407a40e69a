use serde::{Serialize, Deserialize};
use serde_json::Value;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::WriteConcern;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkConfig {
    pub ordered: bool,
    pub write_concern: Option<WriteConcern>,
    pub bypass_document_validation: Option<bool>,

    // Client-side encryption caps each batch at 2MiB
    pub auto_encryption: bool,

    // Leave `_id` generation to the server
    pub force_server_object_id: bool,
}

impl Default for BulkConfig {
    fn default() -> Self {
        BulkConfig {
            ordered: true,
            write_concern: None,
            bypass_document_validation: None,
            auto_encryption: false,
            force_server_object_id: false,
        }
    }
}

impl BulkConfig {
    pub fn ordered() -> Self {
        BulkConfig::default()
    }

    pub fn unordered() -> Self {
        BulkConfig {
            ordered: false,
            ..Default::default()
        }
    }

    /// Load from a JSON object, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::new(ErrorKind::InvalidArgument, format!("Invalid bulk config: {}", e)))
    }
}

/// Per-call overrides passed to `execute`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecuteOptions {
    pub write_concern: Option<WriteConcern>,
    pub bypass_document_validation: Option<bool>,
    pub comment: Option<Value>,
}

impl ExecuteOptions {
    pub fn with_write_concern(write_concern: WriteConcern) -> Self {
        ExecuteOptions {
            write_concern: Some(write_concern),
            ..Default::default()
        }
    }
}
