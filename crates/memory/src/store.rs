//! In-process store clients.
//!
//! [`MemoryStore`] (blocking) and [`AsyncMemoryStore`] (suspend-based) share
//! the same keyspace type and can be built over the same data with
//! [`MemoryStore::to_async`].
//!
//! # Pipelines
//!
//! Both clients hand out pipelines that queue [`Command`]s and apply them on
//! `execute`:
//! - atomic: the whole batch runs under one lock acquisition, so no other
//!   client observes a partially applied batch
//! - non-atomic: the lock is taken per command
//!
//! The first failing command stops the batch and its error is returned.
//! Commands applied before it are not rolled back.

use async_trait::async_trait;
use keyflow_core::{
    AsyncClient, AsyncPipeline, Command, StoreError, StoreResult, SyncClient, SyncPipeline, Value,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{trace, warn};

use crate::keyspace::Keyspace;

/// Operation counters for one store.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Single command calls issued
    pub commands: u64,
    /// Pipeline executions issued
    pub pipelines: u64,
    /// Commands applied through pipelines
    pub pipelined_commands: u64,
}

#[derive(Debug, Default)]
struct Counters {
    commands: AtomicU64,
    pipelines: AtomicU64,
    pipelined_commands: AtomicU64,
}

#[derive(Debug, Default)]
struct Shared {
    keyspace: Mutex<Keyspace>,
    counters: Counters,
    injected: Mutex<Option<StoreError>>,
}

impl Shared {
    fn take_injected(&self) -> StoreResult<()> {
        match self.injected.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn call(&self, command: &Command) -> StoreResult<Value> {
        self.counters.commands.fetch_add(1, Ordering::Relaxed);
        self.take_injected()?;
        trace!(command = command.name(), key = ?command.key(), "memory store call");
        self.keyspace.lock().apply(command)
    }

    fn execute_batch(&self, queued: &[Command], atomic: bool) -> StoreResult<Vec<Value>> {
        self.counters.pipelines.fetch_add(1, Ordering::Relaxed);
        self.counters
            .pipelined_commands
            .fetch_add(queued.len() as u64, Ordering::Relaxed);
        self.take_injected()?;
        trace!(len = queued.len(), atomic, "memory store pipeline execute");

        let result: StoreResult<Vec<Value>> = if atomic {
            let mut keyspace = self.keyspace.lock();
            queued.iter().map(|c| keyspace.apply(c)).collect()
        } else {
            queued
                .iter()
                .map(|c| self.keyspace.lock().apply(c))
                .collect()
        };
        if let Err(e) = &result {
            warn!(error = %e, "memory store pipeline stopped on error");
        }
        result
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            commands: self.counters.commands.load(Ordering::Relaxed),
            pipelines: self.counters.pipelines.load(Ordering::Relaxed),
            pipelined_commands: self.counters.pipelined_commands.load(Ordering::Relaxed),
        }
    }
}

/// Blocking in-memory store.
///
/// Cloning shares the keyspace.
///
/// # Example
///
/// ```ignore
/// use keyflow_core::{Command, SyncClient, Value};
/// use keyflow_memory::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.call(&Command::Set { key: "k".into(), value: Value::from("v") })?;
/// assert_eq!(store.call(&Command::Get { key: "k".into() })?, Value::from("v"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// A suspend-based client over the same keyspace and counters.
    pub fn to_async(&self) -> AsyncMemoryStore {
        AsyncMemoryStore {
            shared: self.shared.clone(),
        }
    }

    /// Operation counters
    pub fn stats(&self) -> StoreStats {
        self.shared.stats()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.shared.keyspace.lock().len()
    }

    /// Whether the keyspace holds no live keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail the next call or pipeline execution with `error`.
    ///
    /// One-shot: the store behaves normally afterwards.
    pub fn fail_next(&self, error: StoreError) {
        *self.shared.injected.lock() = Some(error);
    }
}

impl SyncClient for MemoryStore {
    fn call(&self, command: &Command) -> StoreResult<Value> {
        self.shared.call(command)
    }

    fn pipeline(&self, atomic: bool) -> StoreResult<Box<dyn SyncPipeline>> {
        Ok(Box::new(MemoryPipeline {
            shared: self.shared.clone(),
            atomic,
            queued: Vec::new(),
        }))
    }
}

/// Pipeline handed out by [`MemoryStore`] and [`AsyncMemoryStore`].
#[derive(Debug)]
pub struct MemoryPipeline {
    shared: Arc<Shared>,
    atomic: bool,
    queued: Vec<Command>,
}

impl MemoryPipeline {
    /// Whether this pipeline executes as one isolated batch
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Run the queue. The queue is emptied whether or not it succeeds.
    fn flush(&mut self) -> StoreResult<Vec<Value>> {
        let queued = std::mem::take(&mut self.queued);
        self.shared.execute_batch(&queued, self.atomic)
    }
}

impl SyncPipeline for MemoryPipeline {
    fn queue(&mut self, command: Command) {
        self.queued.push(command);
    }

    fn len(&self) -> usize {
        self.queued.len()
    }

    fn execute(&mut self) -> StoreResult<Vec<Value>> {
        self.flush()
    }
}

#[async_trait]
impl AsyncPipeline for MemoryPipeline {
    fn queue(&mut self, command: Command) {
        self.queued.push(command);
    }

    fn len(&self) -> usize {
        self.queued.len()
    }

    async fn execute(&mut self) -> StoreResult<Vec<Value>> {
        tokio::task::yield_now().await;
        self.flush()
    }
}

/// Suspend-based in-memory store.
///
/// Every call yields to the scheduler before touching the keyspace, so a
/// triggered Action tree really suspends at each transport call.
#[derive(Debug, Clone, Default)]
pub struct AsyncMemoryStore {
    shared: Arc<Shared>,
}

impl AsyncMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// A blocking client over the same keyspace and counters.
    pub fn to_sync(&self) -> MemoryStore {
        MemoryStore {
            shared: self.shared.clone(),
        }
    }

    /// Operation counters
    pub fn stats(&self) -> StoreStats {
        self.shared.stats()
    }

    /// Fail the next call or pipeline execution with `error`.
    pub fn fail_next(&self, error: StoreError) {
        *self.shared.injected.lock() = Some(error);
    }
}

#[async_trait]
impl AsyncClient for AsyncMemoryStore {
    async fn call(&self, command: &Command) -> StoreResult<Value> {
        tokio::task::yield_now().await;
        self.shared.call(command)
    }

    async fn pipeline(&self, atomic: bool) -> StoreResult<Box<dyn AsyncPipeline>> {
        Ok(Box::new(MemoryPipeline {
            shared: self.shared.clone(),
            atomic,
            queued: Vec::new(),
        }))
    }
}
