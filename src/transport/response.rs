use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use crate::result::write_result::WriteConcernError;
use crate::transport::TransportError;

/// Upserted document reported by the server, index is relative to the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertedDocument {
    pub index: usize,
    #[serde(rename = "_id")]
    pub id: Value,
}

/// `upserted` arrives either as a list or, from older servers, as a bare id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Upserted {
    Many(Vec<UpsertedDocument>),
    One(Value),
}

impl Upserted {
    pub fn count(&self) -> u64 {
        match self {
            Upserted::Many(docs) => docs.len() as u64,
            Upserted::One(_) => 1,
        }
    }
}

/// Per-statement failure, index is relative to the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchWriteError {
    pub index: usize,
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub errmsg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_info: Option<Value>,
}

/// Reply to a single write command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResponse {
    #[serde(default = "default_ok")]
    pub ok: f64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub n: u64,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub n_modified: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upserted: Option<Upserted>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub write_errors: Vec<BatchWriteError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_concern_error: Option<WriteConcernError>,

    // Only set on command-level failure (`ok: 0`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errmsg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_info: Option<Value>,
}

fn default_ok() -> f64 {
    1.0
}

fn numeric_count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64))
}

// Non-numeric counts are treated as missing
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(numeric_count(&value))
}

fn count_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(lenient_count(deserializer)?.unwrap_or(0))
}

impl Default for WriteResponse {
    fn default() -> Self {
        WriteResponse::acknowledged(0)
    }
}

impl WriteResponse {
    pub fn acknowledged(n: u64) -> Self {
        WriteResponse {
            ok: 1.0,
            n,
            n_modified: None,
            upserted: None,
            write_errors: Vec::new(),
            write_concern_error: None,
            code: None,
            errmsg: None,
            err_info: None,
        }
    }

    /// `ok: 0` reply, the whole command was rejected
    pub fn command_failure(code: i32, errmsg: impl Into<String>) -> Self {
        WriteResponse {
            ok: 0.0,
            code: Some(code),
            errmsg: Some(errmsg.into()),
            ..WriteResponse::acknowledged(0)
        }
    }

    pub fn with_modified(mut self, n_modified: u64) -> Self {
        self.n_modified = Some(n_modified);
        self
    }

    pub fn with_upserted(mut self, upserted: Vec<(usize, Value)>) -> Self {
        self.upserted = Some(Upserted::Many(
            upserted
                .into_iter()
                .map(|(index, id)| UpsertedDocument { index, id })
                .collect(),
        ));
        self
    }

    pub fn with_write_error(mut self, index: usize, code: i32, errmsg: impl Into<String>) -> Self {
        self.write_errors.push(BatchWriteError {
            index,
            code,
            errmsg: errmsg.into(),
            err_info: None,
        });
        self
    }

    pub fn with_write_concern_error(mut self, code: i32, errmsg: impl Into<String>) -> Self {
        self.write_concern_error = Some(WriteConcernError::new(code, errmsg));
        self
    }

    pub fn is_ok(&self) -> bool {
        self.ok != 0.0
    }

    /// Decode a raw server reply
    pub fn from_value(reply: Value) -> Result<Self, TransportError> {
        serde_json::from_value(reply)
            .map_err(|e| TransportError::new(0, format!("Malformed write reply: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_reply() {
        let reply = WriteResponse::from_value(json!({
            "ok": 1,
            "n": 3,
            "nModified": 2,
            "upserted": [{"index": 1, "_id": "u1"}],
            "writeErrors": [{"index": 2, "code": 11000, "errmsg": "duplicate key"}],
            "writeConcernError": {"code": 64, "errmsg": "waiting for replication timed out"}
        }))
        .unwrap();

        assert!(reply.is_ok());
        assert_eq!(reply.n, 3);
        assert_eq!(reply.n_modified, Some(2));
        assert_eq!(reply.upserted.as_ref().map(Upserted::count), Some(1));
        assert_eq!(reply.write_errors[0].code, 11000);
        assert_eq!(reply.write_concern_error.unwrap().code, 64);
    }

    #[test]
    fn single_upserted_id_shape() {
        let reply = WriteResponse::from_value(json!({"ok": 1, "n": 1, "upserted": "abc"})).unwrap();
        assert_eq!(reply.upserted, Some(Upserted::One(json!("abc"))));
    }

    #[test]
    fn non_numeric_counts_are_lenient() {
        let reply = WriteResponse::from_value(json!({"ok": 1, "n": 2.0, "nModified": "lots"})).unwrap();
        assert_eq!(reply.n, 2);
        assert_eq!(reply.n_modified, None);
    }

    #[test]
    fn command_failure_is_not_ok() {
        let reply = WriteResponse::from_value(json!({"ok": 0, "code": 13, "errmsg": "unauthorized"})).unwrap();
        assert!(!reply.is_ok());
        assert_eq!(reply.code, Some(13));
        assert!(!WriteResponse::command_failure(13, "unauthorized").is_ok());
    }
}
