pub mod core;
pub mod operation;
pub mod batch;
pub mod result;
pub mod transport;
pub mod bulk;

pub use crate::bulk::operation::{BulkOperation, BulkState};
pub use crate::core::config::{BulkConfig, ExecuteOptions};
pub use crate::core::error::{Error, ErrorKind, ExecuteError, Result};
pub use crate::core::types::{Document, Namespace, WriteConcern};
pub use crate::result::write_result::{BulkWriteError, BulkWriteResult};
pub use crate::transport::Transport;

/*
┌──────────────────────────────────── BULKWRITE FLOW ─────────────────────────────────────┐
│                                                                                          │
│  caller                                                                                  │
│    │ insert() / find(f).update_one() / raw({...})                                        │
│    ▼                                                                                     │
│  ┌──────────────────────────────┐   original index (monotonic counter)                   │
│  │ BulkOperation<T: Transport>  │──────────────────────────────┐                         │
│  │  result: BulkResult          │                              ▼                         │
│  │  splitter: Box<dyn Splitter> │──▶ OrderedSplitter   one open Batch, type change       │
│  │  state: BulkState            │    UnorderedSplitter one open Batch per BatchType      │
│  └──────────────┬───────────────┘        │                                               │
│                 │ execute()              ▼ finish()                                      │
│                 │                 VecDeque<Batch>                                        │
│                 ▼                        │ pop_front                                     │
│          WriteCommand ──▶ Transport::dispatch ──▶ WriteResponse | TransportError          │
│                                                       │                                  │
│                                                       ▼                                  │
│                               merge_batch_result(&mut BulkResult, &Batch, outcome)       │
│                                                       │                                  │
│                               halt? (ordered: any error, both: command failure)          │
│                                                       ▼                                  │
│                         BulkWriteResult ──check_errors()──▶ Ok | BulkWriteError           │
│                                                                                          │
└──────────────────────────────────────────────────────────────────────────────────────────┘
*/
