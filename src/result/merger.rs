use serde_json::Value;
use crate::batch::batch::Batch;
use crate::operation::model::{BatchType, Operation};
use crate::result::aggregate::{BulkResult, UpsertedId, WriteError};
use crate::transport::TransportError;
use crate::transport::response::{Upserted, WriteResponse};

/// Fold one batch's reply, or its transport failure, into `result`
pub fn merge_batch_result(
    result: &mut BulkResult,
    batch: &Batch,
    outcome: Result<WriteResponse, TransportError>,
) {
    let response = match outcome {
        Ok(response) if response.is_ok() => response,
        Ok(response) => {
            record_command_failure(
                result,
                batch,
                response.code.unwrap_or(0),
                response.errmsg.unwrap_or_default(),
                response.err_info,
            );
            return;
        }
        Err(err) => {
            record_command_failure(result, batch, err.code, err.message, err.err_info);
            return;
        }
    };

    // Nothing merges after a command failure
    if !result.ok {
        return;
    }

    let n_upserted = response.upserted.as_ref().map_or(0, Upserted::count);
    match batch.batch_type {
        BatchType::Insert => result.n_inserted += response.n,
        BatchType::Delete => result.n_removed += response.n,
        BatchType::Update => {
            result.n_upserted += n_upserted;
            result.n_matched += response.n.saturating_sub(n_upserted);
            result.n_modified += response.n_modified.unwrap_or(0);
        }
    }

    match response.upserted {
        Some(Upserted::Many(docs)) => {
            for doc in docs {
                result.upserted.push(UpsertedId {
                    index: batch.original_index(doc.index),
                    id: doc.id,
                });
            }
        }
        Some(Upserted::One(id)) => {
            result.upserted.push(UpsertedId {
                index: batch.original_index(0),
                id,
            });
        }
        None => {}
    }

    for err in response.write_errors {
        result.write_errors.push(WriteError {
            index: batch.original_index(err.index),
            code: err.code,
            errmsg: err.errmsg,
            err_info: err.err_info,
            op: batch.operations.get(err.index).map(Operation::to_document),
        });
    }

    if let Some(write_concern_error) = response.write_concern_error {
        result.write_concern_errors.push(write_concern_error);
    }
}

// The whole command failed: one synthetic error at index 0, then stop merging
fn record_command_failure(
    result: &mut BulkResult,
    batch: &Batch,
    code: i32,
    errmsg: String,
    err_info: Option<Value>,
) {
    if !result.ok {
        return;
    }
    result.ok = false;
    result.write_errors.push(WriteError {
        index: 0,
        code,
        errmsg,
        err_info,
        op: batch.operations.first().map(Operation::to_document),
    });
}
