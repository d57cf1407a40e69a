use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;
use crate::batch::batch::Batch;
use crate::batch::limits::BatchLimits;
use crate::batch::ordered::OrderedSplitter;
use crate::batch::splitter::BatchSplitter;
use crate::batch::unordered::UnorderedSplitter;
use crate::bulk::find::FindOperators;
use crate::core::config::{BulkConfig, ExecuteOptions};
use crate::core::error::{Error, ExecuteError, Result};
use crate::core::types::{Document, Namespace, WriteConcern};
use crate::operation::model::Operation;
use crate::operation::raw::parse_raw;
use crate::operation::size::operation_size;
use crate::result::aggregate::BulkResult;
use crate::result::merger::merge_batch_result;
use crate::result::write_result::BulkWriteResult;
use crate::transport::Transport;
use crate::transport::command::WriteCommand;

/// Lifecycle of a bulk operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkState {
    Building,
    Executed,
    Succeeded,
    Failed,
}

/// Collects writes, splits them into batches and dispatches them on `execute`
pub struct BulkOperation<T> {
    pub namespace: Namespace,
    config: BulkConfig,
    transport: T,
    splitter: Box<dyn BatchSplitter>,
    result: BulkResult,
    current_index: usize,  // original index of the next appended operation
    state: BulkState,
    dispatched: usize,
}

impl<T> fmt::Debug for BulkOperation<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BulkOperation")
            .field("namespace", &self.namespace)
            .field("ordered", &self.config.ordered)
            .field("operations", &self.current_index)
            .field("batches", &self.splitter.batch_count())
            .field("state", &self.state)
            .finish()
    }
}

impl<T: Transport> BulkOperation<T> {
    pub fn new(transport: T, namespace: Namespace, config: BulkConfig) -> Self {
        let limits = BatchLimits::from_server(&transport.server_limits(), config.auto_encryption);
        let splitter: Box<dyn BatchSplitter> = if config.ordered {
            Box::new(OrderedSplitter::new(limits))
        } else {
            Box::new(UnorderedSplitter::new(limits))
        };

        BulkOperation {
            namespace,
            config,
            transport,
            splitter,
            result: BulkResult::new(),
            current_index: 0,
            state: BulkState::Building,
            dispatched: 0,
        }
    }

    pub fn ordered(transport: T, namespace: Namespace) -> Self {
        BulkOperation::new(transport, namespace, BulkConfig::ordered())
    }

    pub fn unordered(transport: T, namespace: Namespace) -> Self {
        BulkOperation::new(transport, namespace, BulkConfig::unordered())
    }

    pub fn insert(&mut self, document: Document) -> Result<&mut Self> {
        self.add_operation(Operation::Insert(document))
    }

    /// Start an update/replace/delete against documents matching `filter`
    pub fn find(&mut self, filter: Document) -> FindOperators<'_, T> {
        FindOperators::new(self, filter)
    }

    /// Append a descriptor such as `{"updateOne": {"filter": {...}, "update": {...}}}`
    pub fn raw(&mut self, descriptor: &Value) -> Result<&mut Self> {
        self.check_building()?;
        let operation = parse_raw(descriptor)?;
        self.add_operation(operation)
    }

    pub fn add_operation(&mut self, operation: Operation) -> Result<&mut Self> {
        self.check_building()?;

        let operation = match operation {
            Operation::Insert(doc) => Operation::Insert(self.assign_id(doc)),
            other => other,
        };
        let inserted_id = match &operation {
            Operation::Insert(doc) => doc.get("_id").cloned(),
            _ => None,
        };

        let index = self.current_index;
        let bson_size = operation_size(&operation);
        self.splitter.append(operation, bson_size, index)?;

        // Client-generated ids are known before anything is sent
        if let Some(id) = inserted_id {
            self.result.record_inserted_id(index, id);
        }
        self.current_index += 1;

        Ok(self)
    }

    // `_id` goes first, as the server would store it
    fn assign_id(&self, doc: Document) -> Document {
        let has_id = doc.get("_id").is_some_and(|id| !id.is_null());
        if has_id || self.config.force_server_object_id {
            return doc;
        }

        let mut with_id = Document::new();
        with_id.insert("_id".to_string(), Value::String(Uuid::new_v4().to_string()));
        with_id.extend(doc.into_iter().filter(|(key, _)| key != "_id"));
        with_id
    }

    fn check_building(&self) -> Result<()> {
        if self.state != BulkState::Building {
            return Err(Error::re_execution());
        }
        Ok(())
    }

    /// Operations appended so far
    pub fn len(&self) -> usize {
        self.current_index
    }

    pub fn is_empty(&self) -> bool {
        self.current_index == 0
    }

    pub fn batch_count(&self) -> usize {
        self.splitter.batch_count()
    }

    pub fn limits(&self) -> &BatchLimits {
        self.splitter.limits()
    }

    pub fn config(&self) -> &BulkConfig {
        &self.config
    }

    pub fn is_ordered(&self) -> bool {
        self.config.ordered
    }

    pub fn state(&self) -> BulkState {
        self.state
    }

    /// Batches handed to the transport by `execute`
    pub fn dispatched_batches(&self) -> usize {
        self.dispatched
    }

    pub fn inserted_ids(&self) -> &BTreeMap<usize, Value> {
        &self.result.inserted_ids
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Dispatch every batch; may only be called once
    pub async fn execute(&mut self, options: ExecuteOptions) -> std::result::Result<BulkWriteResult, ExecuteError> {
        self.check_building()?;

        // An empty bulk stays open for appends
        if self.current_index == 0 {
            return Err(Error::empty_bulk().into());
        }
        let batches = self.splitter.finish();
        self.state = BulkState::Executed;

        let write_concern = options.write_concern.or_else(|| self.config.write_concern.clone());
        let acknowledged = write_concern.as_ref().is_none_or(WriteConcern::is_acknowledged);
        let bypass_document_validation = options
            .bypass_document_validation
            .or(self.config.bypass_document_validation);

        debug!(
            namespace = %self.namespace,
            ordered = self.config.ordered,
            operations = self.current_index,
            batches = batches.len(),
            "executing bulk write"
        );

        let mut pending: VecDeque<Batch> = batches.into();
        while let Some(batch) = pending.pop_front() {
            let command = WriteCommand::for_batch(&batch, &self.namespace, self.config.ordered)
                .with_write_concern(write_concern.clone())
                .with_bypass_document_validation(bypass_document_validation)
                .with_comment(options.comment.clone());

            debug!(
                command = batch.batch_type.command_name(),
                operations = batch.size,
                bytes = batch.size_bytes,
                first_index = batch.original_zero_index,
                "dispatching batch"
            );
            let outcome = self.transport.dispatch(command).await;
            self.dispatched += 1;

            if let Err(err) = &outcome {
                warn!(code = err.code, error = %err, "batch dispatch failed");
            }
            // Replies to unacknowledged writes are dropped, transport failures are not
            if !acknowledged && outcome.is_ok() {
                continue;
            }

            merge_batch_result(&mut self.result, &batch, outcome);

            if self.should_halt() {
                if !pending.is_empty() {
                    warn!(skipped = pending.len(), "halting bulk write, remaining batches not sent");
                }
                break;
            }
        }

        let result = BulkWriteResult::new(
            std::mem::take(&mut self.result),
            self.config.ordered,
            acknowledged,
        );
        if !acknowledged && result.is_ok() {
            self.state = BulkState::Succeeded;
            return Ok(result);
        }

        match result.check_errors() {
            Ok(result) => {
                info!(
                    inserted = result.inserted_count(),
                    matched = result.matched_count(),
                    modified = result.modified_count(),
                    deleted = result.deleted_count(),
                    upserted = result.upserted_count(),
                    "bulk write complete"
                );
                self.state = BulkState::Succeeded;
                Ok(result)
            }
            Err(err) => {
                warn!(
                    code = err.code,
                    write_errors = err.write_errors.len(),
                    error = %err,
                    "bulk write failed"
                );
                self.state = BulkState::Failed;
                Err(err.into())
            }
        }
    }

    // A command failure stops both modes; write errors only stop ordered ones
    fn should_halt(&self) -> bool {
        if !self.result.ok {
            return true;
        }
        self.config.ordered && self.result.has_errors()
    }
}
