use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use thiserror::Error;
use crate::result::aggregate::{BulkResult, UpsertedId, WriteError};

/// Server code used when several write concern errors are reported as one
pub const WRITE_CONCERN_FAILED: i32 = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteConcernError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub errmsg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_info: Option<Value>,
}

impl WriteConcernError {
    pub fn new(code: i32, errmsg: impl Into<String>) -> Self {
        WriteConcernError {
            code,
            errmsg: errmsg.into(),
            err_info: None,
        }
    }
}

/// Read-only view over the final state of a bulk operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkWriteResult {
    #[serde(flatten)]
    result: BulkResult,
    pub ordered: bool,
    pub acknowledged: bool,
}

impl BulkWriteResult {
    pub fn new(result: BulkResult, ordered: bool, acknowledged: bool) -> Self {
        BulkWriteResult {
            result,
            ordered,
            acknowledged,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.ok
    }

    pub fn inserted_count(&self) -> u64 {
        self.result.n_inserted
    }

    pub fn matched_count(&self) -> u64 {
        self.result.n_matched
    }

    pub fn modified_count(&self) -> u64 {
        self.result.n_modified
    }

    pub fn deleted_count(&self) -> u64 {
        self.result.n_removed
    }

    pub fn upserted_count(&self) -> u64 {
        self.result.n_upserted
    }

    /// Original index → client-generated `_id`
    pub fn inserted_ids(&self) -> &BTreeMap<usize, Value> {
        &self.result.inserted_ids
    }

    /// Original index → server-generated `_id`
    pub fn upserted_ids(&self) -> BTreeMap<usize, Value> {
        self.result
            .upserted
            .iter()
            .map(|upserted| (upserted.index, upserted.id.clone()))
            .collect()
    }

    pub fn upserted_id_at(&self, position: usize) -> Option<&UpsertedId> {
        self.result.upserted.get(position)
    }

    pub fn has_write_errors(&self) -> bool {
        !self.result.write_errors.is_empty()
    }

    pub fn write_error_count(&self) -> usize {
        self.result.write_errors.len()
    }

    pub fn write_error_at(&self, position: usize) -> Option<&WriteError> {
        self.result.write_errors.get(position)
    }

    pub fn write_errors(&self) -> &[WriteError] {
        &self.result.write_errors
    }

    /// All write concern errors merged into one
    pub fn write_concern_error(&self) -> Option<WriteConcernError> {
        match self.result.write_concern_errors.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => {
                let errmsg = many
                    .iter()
                    .map(|err| err.errmsg.as_str())
                    .collect::<Vec<_>>()
                    .join(" and ");
                Some(WriteConcernError::new(WRITE_CONCERN_FAILED, errmsg))
            }
        }
    }

    pub fn raw(&self) -> &BulkResult {
        &self.result
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Ok when nothing failed, otherwise the composite error wrapping this result
    pub fn check_errors(self) -> Result<Self, BulkWriteError> {
        let write_concern_error = self.write_concern_error();

        if !self.result.write_errors.is_empty() {
            let first = &self.result.write_errors[0];
            let code = first.code;
            let message = if first.errmsg.is_empty() {
                "write operation failed".to_string()
            } else {
                first.errmsg.clone()
            };
            let write_errors = self.result.write_errors.clone();
            return Err(BulkWriteError {
                message,
                code,
                write_errors,
                write_concern_error,
                result: self,
            });
        }

        match write_concern_error {
            Some(err) => Err(BulkWriteError {
                message: err.errmsg.clone(),
                code: err.code,
                write_errors: Vec::new(),
                write_concern_error: Some(err),
                result: self,
            }),
            None => Ok(self),
        }
    }
}

impl fmt::Display for BulkWriteResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BulkWriteResult({})", self.to_json())
    }
}

/// Raised once all dispatch is over, carries everything that did succeed
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BulkWriteError {
    pub message: String,
    pub code: i32,
    pub write_errors: Vec<WriteError>,
    pub write_concern_error: Option<WriteConcernError>,
    pub result: BulkWriteResult,
}
