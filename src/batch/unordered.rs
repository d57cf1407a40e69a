use crate::batch::batch::Batch;
use crate::batch::limits::BatchLimits;
use crate::batch::splitter::{check_document_size, must_close, BatchSplitter};
use crate::core::error::Result;
use crate::operation::model::{BatchType, Operation};

/// One open batch per operation type, each filled independently
pub struct UnorderedSplitter {
    limits: BatchLimits,
    insert_batch: Option<Batch>,
    update_batch: Option<Batch>,
    delete_batch: Option<Batch>,
    batches: Vec<Batch>,
}

impl UnorderedSplitter {
    pub fn new(limits: BatchLimits) -> Self {
        UnorderedSplitter {
            limits,
            insert_batch: None,
            update_batch: None,
            delete_batch: None,
            batches: Vec::new(),
        }
    }

    fn open_batch(&mut self, batch_type: BatchType) -> &mut Option<Batch> {
        match batch_type {
            BatchType::Insert => &mut self.insert_batch,
            BatchType::Update => &mut self.update_batch,
            BatchType::Delete => &mut self.delete_batch,
        }
    }
}

impl BatchSplitter for UnorderedSplitter {
    fn append(&mut self, operation: Operation, bson_size: usize, original_index: usize) -> Result<()> {
        check_document_size(bson_size, &self.limits)?;

        let limits = self.limits;
        let batch_type = operation.batch_type();
        let slot = self.open_batch(batch_type);

        let closes = slot.as_ref().is_some_and(|batch| must_close(batch, bson_size, &limits));
        let closed = if closes { slot.take() } else { None };

        slot.get_or_insert_with(|| Batch::new(batch_type, original_index))
            .append(operation, original_index, bson_size, limits.max_key_size);

        if let Some(batch) = closed {
            self.batches.push(batch);
        }
        Ok(())
    }

    fn finish(&mut self) -> Vec<Batch> {
        let mut batches = std::mem::take(&mut self.batches);
        batches.extend(
            [self.insert_batch.take(), self.update_batch.take(), self.delete_batch.take()]
                .into_iter()
                .flatten(),
        );
        batches
    }

    fn batch_count(&self) -> usize {
        self.batches.len()
            + [&self.insert_batch, &self.update_batch, &self.delete_batch]
                .iter()
                .filter(|batch| batch.is_some())
                .count()
    }

    fn limits(&self) -> &BatchLimits {
        &self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Document;
    use crate::operation::model::{DeleteStatement, UpdateModification, UpdateStatement};

    fn insert() -> Operation {
        Operation::Insert(Document::new())
    }

    fn update() -> Operation {
        Operation::Update(UpdateStatement::new(
            Document::new(),
            UpdateModification::Replacement(Document::new()),
            false,
        ))
    }

    fn delete() -> Operation {
        Operation::Delete(DeleteStatement::new(Document::new(), 1))
    }

    #[test]
    fn interleaved_types_group_per_type() {
        let mut splitter = UnorderedSplitter::new(BatchLimits::default());
        let ops = [insert(), delete(), update(), insert(), delete(), insert()];
        for (i, op) in ops.into_iter().enumerate() {
            splitter.append(op, 10, i).unwrap();
        }
        assert_eq!(splitter.batch_count(), 3);

        let batches = splitter.finish();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].batch_type, BatchType::Insert);
        assert_eq!(batches[0].original_indexes, vec![0, 3, 5]);
        assert_eq!(batches[1].batch_type, BatchType::Update);
        assert_eq!(batches[1].original_indexes, vec![2]);
        assert_eq!(batches[2].batch_type, BatchType::Delete);
        assert_eq!(batches[2].original_indexes, vec![1, 4]);
    }

    #[test]
    fn closing_one_type_leaves_others_open() {
        let mut splitter = UnorderedSplitter::new(BatchLimits::new(1000, 2, 1000));
        splitter.append(delete(), 10, 0).unwrap();
        splitter.append(insert(), 10, 1).unwrap();
        splitter.append(insert(), 10, 2).unwrap();

        // first insert batch closed, delete still open
        assert_eq!(splitter.batches.len(), 1);
        assert!(splitter.delete_batch.is_some());

        let batches = splitter.finish();
        let indexes: Vec<_> = batches.iter().map(|b| b.original_indexes.clone()).collect();
        assert_eq!(indexes, vec![vec![1], vec![2], vec![0]]);
    }
}
