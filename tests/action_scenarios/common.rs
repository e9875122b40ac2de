//! Shared helpers for the scenario suites.

#![allow(dead_code)]

use keyflow::{Adaptor, Client, MemoryStore};
use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Blocking adaptor over a fresh store; the store is returned for inspection.
pub fn sync_adaptor() -> (MemoryStore, Adaptor) {
    init_tracing();
    let store = MemoryStore::new();
    let adaptor = Adaptor::new(Client::sync(store.clone()));
    (store, adaptor)
}

/// Async adaptor over a fresh store, plus a blocking view of the same keyspace.
pub fn async_adaptor() -> (MemoryStore, Adaptor) {
    init_tracing();
    let store = MemoryStore::new();
    let adaptor = Adaptor::new(Client::asynchronous(store.to_async()));
    (store, adaptor)
}
