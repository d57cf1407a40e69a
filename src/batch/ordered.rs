use crate::batch::batch::Batch;
use crate::batch::limits::BatchLimits;
use crate::batch::splitter::{check_document_size, must_close, BatchSplitter};
use crate::core::error::Result;
use crate::operation::model::Operation;

/// One open batch at a time; a type change always starts a new batch
pub struct OrderedSplitter {
    limits: BatchLimits,
    current: Option<Batch>,
    batches: Vec<Batch>,
}

impl OrderedSplitter {
    pub fn new(limits: BatchLimits) -> Self {
        OrderedSplitter {
            limits,
            current: None,
            batches: Vec::new(),
        }
    }
}

impl BatchSplitter for OrderedSplitter {
    fn append(&mut self, operation: Operation, bson_size: usize, original_index: usize) -> Result<()> {
        check_document_size(bson_size, &self.limits)?;

        let batch_type = operation.batch_type();
        let closes = self.current.as_ref().is_some_and(|batch| {
            batch.batch_type != batch_type || must_close(batch, bson_size, &self.limits)
        });
        if closes {
            if let Some(batch) = self.current.take() {
                self.batches.push(batch);
            }
        }

        self.current
            .get_or_insert_with(|| Batch::new(batch_type, original_index))
            .append(operation, original_index, bson_size, self.limits.max_key_size);

        Ok(())
    }

    fn finish(&mut self) -> Vec<Batch> {
        let mut batches = std::mem::take(&mut self.batches);
        if let Some(batch) = self.current.take() {
            batches.push(batch);
        }
        batches
    }

    fn batch_count(&self) -> usize {
        self.batches.len() + usize::from(self.current.is_some())
    }

    fn limits(&self) -> &BatchLimits {
        &self.limits
    }
}
