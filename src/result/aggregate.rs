use std::collections::BTreeMap;
use serde::Serialize;
use serde_json::Value;
use crate::core::types::Document;
use crate::result::write_result::WriteConcernError;

/// Upserted document, index is the original submission index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertedId {
    pub index: usize,
    #[serde(rename = "_id")]
    pub id: Value,
}

/// Failed operation, index is the original submission index
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteError {
    pub index: usize,
    pub code: i32,
    pub errmsg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<Document>,
}

/// Running totals for one bulk operation, folded batch by batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    pub ok: bool,  // false once a command failed outright
    pub n_inserted: u64,
    pub n_matched: u64,
    pub n_modified: u64,
    pub n_removed: u64,
    pub n_upserted: u64,
    pub inserted_ids: BTreeMap<usize, Value>,
    pub upserted: Vec<UpsertedId>,
    pub write_errors: Vec<WriteError>,
    pub write_concern_errors: Vec<WriteConcernError>,
}

impl Default for BulkResult {
    fn default() -> Self {
        BulkResult {
            ok: true,
            n_inserted: 0,
            n_matched: 0,
            n_modified: 0,
            n_removed: 0,
            n_upserted: 0,
            inserted_ids: BTreeMap::new(),
            upserted: Vec::new(),
            write_errors: Vec::new(),
            write_concern_errors: Vec::new(),
        }
    }
}

impl BulkResult {
    pub fn new() -> Self {
        BulkResult::default()
    }

    pub fn record_inserted_id(&mut self, original_index: usize, id: Value) {
        self.inserted_ids.insert(original_index, id);
    }

    pub fn has_errors(&self) -> bool {
        !self.write_errors.is_empty() || !self.write_concern_errors.is_empty()
    }
}
