pub mod command;
pub mod response;
pub mod mock;

use std::future::Future;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use thiserror::Error;
use crate::transport::command::WriteCommand;
use crate::transport::response::WriteResponse;

// Server error codes used for synthesized failures
pub const HOST_UNREACHABLE: i32 = 6;
pub const NETWORK_TIMEOUT: i32 = 89;

/// Limits advertised by the server handshake, absent fields fall back to defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerLimits {
    pub max_bson_object_size: Option<usize>,
    pub max_write_batch_size: Option<usize>,
    pub max_message_size_bytes: Option<usize>,
}

/// Failure to get any reply for a dispatched command
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (code {code})")]
pub struct TransportError {
    pub code: i32,
    pub message: String,
    pub err_info: Option<Value>,
}

impl TransportError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        TransportError {
            code,
            message: message.into(),
            err_info: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        TransportError::new(HOST_UNREACHABLE, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        TransportError::new(NETWORK_TIMEOUT, message)
    }
}

/// Connection to the server a bulk operation dispatches its batches through
pub trait Transport: Send + Sync {
    /// Queried once when a bulk operation is created
    fn server_limits(&self) -> ServerLimits;

    fn dispatch(&self, command: WriteCommand) -> impl Future<Output = Result<WriteResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn server_limits(&self) -> ServerLimits {
        (**self).server_limits()
    }

    fn dispatch(&self, command: WriteCommand) -> impl Future<Output = Result<WriteResponse, TransportError>> + Send {
        (**self).dispatch(command)
    }
}
