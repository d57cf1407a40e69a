use serde_json::Value;
use crate::bulk::operation::BulkOperation;
use crate::core::error::Result;
use crate::core::types::{Document, Hint};
use crate::operation::model::{DeleteStatement, Operation, UpdateModification, UpdateStatement};
use crate::operation::validate::{validate_replacement, validate_update};
use crate::transport::Transport;

/// Builder returned by `BulkOperation::find`, consumed by one terminal call
pub struct FindOperators<'a, T> {
    bulk: &'a mut BulkOperation<T>,
    filter: Document,
    upsert: bool,
    collation: Option<Document>,
    array_filters: Option<Vec<Document>>,
    hint: Option<Hint>,
}

impl<'a, T: Transport> FindOperators<'a, T> {
    pub fn new(bulk: &'a mut BulkOperation<T>, filter: Document) -> Self {
        FindOperators {
            bulk,
            filter,
            upsert: false,
            collation: None,
            array_filters: None,
            hint: None,
        }
    }

    /// Insert when nothing matches (updates and replacements only)
    pub fn upsert(mut self) -> Self {
        self.upsert = true;
        self
    }

    pub fn collation(mut self, collation: Document) -> Self {
        self.collation = Some(collation);
        self
    }

    pub fn array_filters(mut self, array_filters: Vec<Document>) -> Self {
        self.array_filters = Some(array_filters);
        self
    }

    pub fn hint(mut self, hint: Hint) -> Self {
        self.hint = Some(hint);
        self
    }

    /// `update` is an operator document or a pipeline
    pub fn update_one(self, update: Value) -> Result<&'a mut BulkOperation<T>> {
        let update = validate_update(update)?;
        self.push_update(update, false)
    }

    pub fn update_many(self, update: Value) -> Result<&'a mut BulkOperation<T>> {
        let update = validate_update(update)?;
        self.push_update(update, true)
    }

    pub fn update(self, update: Value) -> Result<&'a mut BulkOperation<T>> {
        self.update_many(update)
    }

    pub fn replace_one(self, replacement: Document) -> Result<&'a mut BulkOperation<T>> {
        let replacement = validate_replacement(replacement)?;
        self.push_update(replacement, false)
    }

    pub fn delete_one(self) -> Result<&'a mut BulkOperation<T>> {
        self.push_delete(1)
    }

    pub fn delete_many(self) -> Result<&'a mut BulkOperation<T>> {
        self.push_delete(0)
    }

    pub fn delete(self) -> Result<&'a mut BulkOperation<T>> {
        self.delete_many()
    }

    fn push_update(self, update: UpdateModification, multi: bool) -> Result<&'a mut BulkOperation<T>> {
        // Array filters make no sense against a replacement
        let array_filters = if update.is_replacement() { None } else { self.array_filters };

        let statement = UpdateStatement {
            upsert: self.upsert,
            array_filters,
            collation: self.collation,
            hint: self.hint,
            ..UpdateStatement::new(self.filter, update, multi)
        };
        let bulk = self.bulk;
        bulk.add_operation(Operation::Update(statement))
    }

    fn push_delete(self, limit: u32) -> Result<&'a mut BulkOperation<T>> {
        let statement = DeleteStatement {
            collation: self.collation,
            hint: self.hint,
            ..DeleteStatement::new(self.filter, limit)
        };
        let bulk = self.bulk;
        bulk.add_operation(Operation::Delete(statement))
    }
}
