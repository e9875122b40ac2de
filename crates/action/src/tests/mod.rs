//! Test modules for the action crate.
//!
//! [`Recorder`] wraps a [`MemoryStore`] and logs every call, pipeline and
//! queued command, so tests can assert how many round trips an Action tree
//! issued and in what order.

pub mod async_exec;
pub mod drivers;
pub mod single;

use async_trait::async_trait;
use keyflow_core::{
    AsyncClient, AsyncPipeline, Client, Command, StoreError, StoreResult, SyncClient, SyncPipeline,
    Value,
};
use keyflow_memory::MemoryStore;
use parking_lot::Mutex;
use std::sync::Arc;

/// What a [`Recorder`] has seen.
#[derive(Debug, Default, Clone)]
pub struct Log {
    /// Names of single calls, in order
    pub calls: Vec<String>,
    /// Atomic flag of every pipeline opened
    pub pipelines: Vec<bool>,
    /// Names of queued commands, in order
    pub queued: Vec<String>,
    /// Number of pipeline `execute` calls
    pub executes: usize,
}

/// Logging client over an in-memory store.
#[derive(Clone, Default)]
pub struct Recorder {
    pub store: MemoryStore,
    log: Arc<Mutex<Log>>,
    drop_last_result: Arc<Mutex<bool>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync_client(&self) -> Client {
        Client::sync(self.clone())
    }

    pub fn async_client(&self) -> Client {
        Client::asynchronous(self.clone())
    }

    pub fn log(&self) -> Log {
        self.log.lock().clone()
    }

    /// Make pipelines return one result fewer than queued
    pub fn drop_last_result(&self) {
        *self.drop_last_result.lock() = true;
    }

    fn record_call(&self, command: &Command) -> StoreResult<Value> {
        self.log.lock().calls.push(command.name().to_string());
        self.store.call(command)
    }

    fn open(&self, atomic: bool) -> RecordingPipeline {
        self.log.lock().pipelines.push(atomic);
        RecordingPipeline {
            recorder: self.clone(),
            atomic,
            queued: Vec::new(),
        }
    }
}

impl SyncClient for Recorder {
    fn call(&self, command: &Command) -> StoreResult<Value> {
        self.record_call(command)
    }

    fn pipeline(&self, atomic: bool) -> StoreResult<Box<dyn SyncPipeline>> {
        Ok(Box::new(self.open(atomic)))
    }
}

#[async_trait]
impl AsyncClient for Recorder {
    async fn call(&self, command: &Command) -> StoreResult<Value> {
        tokio::task::yield_now().await;
        self.record_call(command)
    }

    async fn pipeline(&self, atomic: bool) -> StoreResult<Box<dyn AsyncPipeline>> {
        Ok(Box::new(self.open(atomic)))
    }
}

pub struct RecordingPipeline {
    recorder: Recorder,
    atomic: bool,
    queued: Vec<Command>,
}

impl RecordingPipeline {
    fn push(&mut self, command: Command) {
        self.recorder
            .log
            .lock()
            .queued
            .push(command.name().to_string());
        self.queued.push(command);
    }

    fn run(&mut self) -> StoreResult<Vec<Value>> {
        self.recorder.log.lock().executes += 1;
        let mut inner = self.recorder.store.pipeline(self.atomic)?;
        for command in self.queued.drain(..) {
            inner.queue(command);
        }
        let mut results = inner.execute()?;
        if *self.recorder.drop_last_result.lock() {
            results.pop();
        }
        Ok(results)
    }
}

impl SyncPipeline for RecordingPipeline {
    fn queue(&mut self, command: Command) {
        self.push(command);
    }

    fn len(&self) -> usize {
        self.queued.len()
    }

    fn execute(&mut self) -> StoreResult<Vec<Value>> {
        self.run()
    }
}

#[async_trait]
impl AsyncPipeline for RecordingPipeline {
    fn queue(&mut self, command: Command) {
        self.push(command);
    }

    fn len(&self) -> usize {
        self.queued.len()
    }

    async fn execute(&mut self) -> StoreResult<Vec<Value>> {
        tokio::task::yield_now().await;
        self.run()
    }
}

/// A transport failure for propagation tests.
pub fn connection_reset() -> StoreError {
    StoreError::Connection {
        reason: "connection reset by peer".into(),
    }
}
