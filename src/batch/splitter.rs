use crate::batch::batch::Batch;
use crate::batch::limits::BatchLimits;
use crate::core::error::{Error, Result};
use crate::operation::model::Operation;

/// Assigns appended operations to batches
pub trait BatchSplitter: Send {
    /// Place `operation` into the open batch for its type, closing that batch first if needed
    fn append(&mut self, operation: Operation, bson_size: usize, original_index: usize) -> Result<()>;

    /// Closed batches followed by the still-open ones, in dispatch order
    fn finish(&mut self) -> Vec<Batch>;

    /// Closed plus open batches
    fn batch_count(&self) -> usize;

    fn limits(&self) -> &BatchLimits;
}

/// Hard per-document ceiling, independent of batching
pub fn check_document_size(bson_size: usize, limits: &BatchLimits) -> Result<()> {
    if bson_size >= limits.max_bson_object_size {
        return Err(Error::document_too_large(limits.max_bson_object_size));
    }
    Ok(())
}

/// Count and byte ceilings for adding one more operation to `batch`
pub fn must_close(batch: &Batch, bson_size: usize, limits: &BatchLimits) -> bool {
    if batch.is_empty() {
        return false;
    }
    batch.size + 1 >= limits.max_write_batch_size
        || batch.size_bytes + limits.max_key_size + bson_size >= limits.max_batch_size_bytes
}
