//! In-process key-value store for keyflow
//!
//! Implements both client contracts from `keyflow-core` over one
//! mutex-guarded keyspace:
//! - [`MemoryStore`]: blocking [`SyncClient`](keyflow_core::SyncClient)
//! - [`AsyncMemoryStore`]: suspend-based [`AsyncClient`](keyflow_core::AsyncClient)
//!
//! Supports strings, hashes, lists, sets, sorted sets, bitmaps and
//! HyperLogLogs, with lazy TTL expiry.
//! Used as the embedded backend in tests and as a reference transport.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod keyspace;
mod store;

pub use store::{AsyncMemoryStore, MemoryPipeline, MemoryStore, StoreStats};
