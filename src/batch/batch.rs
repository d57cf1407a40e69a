use crate::operation::model::{BatchType, Operation};

/// Homogeneous run of operations pending dispatch
#[derive(Debug, Clone)]
pub struct Batch {
    pub batch_type: BatchType,
    pub operations: Vec<Operation>,
    pub original_indexes: Vec<usize>,  // parallel to `operations`
    pub original_zero_index: usize,
    pub size: usize,
    pub size_bytes: usize,
}

impl Batch {
    pub fn new(batch_type: BatchType, original_zero_index: usize) -> Self {
        Batch {
            batch_type,
            operations: Vec::new(),
            original_indexes: Vec::new(),
            original_zero_index,
            size: 0,
            size_bytes: 0,
        }
    }

    /// Limits are checked by the splitter before this is called
    pub fn append(&mut self, operation: Operation, original_index: usize, bson_size: usize, key_size: usize) {
        debug_assert_eq!(operation.batch_type(), self.batch_type);

        self.operations.push(operation);
        self.original_indexes.push(original_index);
        self.size += 1;
        self.size_bytes += bson_size + key_size;
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Original submission index of the operation at `position` in this batch
    pub fn original_index(&self, position: usize) -> usize {
        self.original_indexes
            .get(position)
            .copied()
            .unwrap_or(self.original_zero_index + position)
    }
}
