use thiserror::Error;
use crate::result::write_result::BulkWriteError;

/// Client-side validation failures, raised before anything is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyBulk,
    DocumentTooLarge,
    InvalidArgument,
    InvalidUpdate,
    BatchReExecution,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {context}")]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn empty_bulk() -> Self {
        Error::new(
            ErrorKind::EmptyBulk,
            "Invalid BulkOperation, Batch cannot be empty".to_string(),
        )
    }

    pub fn document_too_large(max_bson_object_size: usize) -> Self {
        Error::new(
            ErrorKind::DocumentTooLarge,
            format!("Document is larger than the maximum size {}", max_bson_object_size),
        )
    }

    pub fn re_execution() -> Self {
        Error::new(
            ErrorKind::BatchReExecution,
            "This batch has already been executed, create new batch to execute".to_string(),
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Everything `execute` can fail with
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Validation(#[from] Error),

    #[error(transparent)]
    BulkWrite(#[from] BulkWriteError),
}

impl ExecuteError {
    pub fn as_bulk_write(&self) -> Option<&BulkWriteError> {
        match self {
            ExecuteError::BulkWrite(err) => Some(err),
            ExecuteError::Validation(_) => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ExecuteError::Validation(err) => Some(err.kind),
            ExecuteError::BulkWrite(_) => None,
        }
    }
}
