//! Keyflow - composable, deferred key-value store commands
//!
//! Keyflow sits between application code and a key-value store client. A
//! unit of work (one command, an ordered sequence, or an atomic batch) is
//! built as an inert [`Action`] value, post-processing is attached lazily,
//! and the whole tree is triggered later under a blocking or an async
//! runtime.
//!
//! # Quick Start
//!
//! ```ignore
//! use keyflow::{Adaptor, Client, Driver, MemoryStore, Value};
//!
//! let adaptor = Adaptor::new(Client::sync(MemoryStore::new()));
//! let strings = adaptor.strings();
//!
//! // Two increments, one pipeline round trip
//! let counts = adaptor
//!     .transaction(vec![strings.incr("hits"), strings.incr("hits")])
//!     .run_sync()?;
//! assert_eq!(counts, Value::Array(vec![Value::Int(1), Value::Int(2)]));
//! ```
//!
//! # Architecture
//!
//! - `keyflow-core`: values, the typed command set, the store client contract
//! - `keyflow-memory`: an in-process store implementing that contract
//! - `keyflow-action`: the Action engine, the adaptor, drivers and sessions

pub use keyflow_action::*;
pub use keyflow_core::{
    AsyncClient, AsyncPipeline, BitOperation, Client, Command, Config, Error, ExecutionMode,
    Result, RuntimeMode, StoreError, StoreResult, SyncClient, SyncPipeline, Value,
    CONFIG_FILE_NAME,
};
pub use keyflow_memory::{AsyncMemoryStore, MemoryStore, StoreStats};
