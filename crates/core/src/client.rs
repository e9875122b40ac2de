//! Store client contract.
//!
//! An Action never talks to the network itself. It hands [`Command`]s to a
//! client implementing one of the two traits below:
//!
//! - [`SyncClient`] / [`SyncPipeline`]: blocking transports
//! - [`AsyncClient`] / [`AsyncPipeline`]: suspend-based transports
//!
//! A pipeline queues commands without executing them; its `execute` issues
//! the whole queue as one round trip and returns one raw result per queued
//! command, in queue order.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::command::Command;
use crate::error::StoreResult;
use crate::mode::RuntimeMode;
use crate::value::Value;

/// Blocking store client.
pub trait SyncClient: Send + Sync {
    /// Execute one command and return its raw reply.
    fn call(&self, command: &Command) -> StoreResult<Value>;

    /// Open a pipeline. With `atomic` set, the queued batch executes as one
    /// isolated unit (MULTI/EXEC semantics).
    fn pipeline(&self, atomic: bool) -> StoreResult<Box<dyn SyncPipeline>>;
}

/// Blocking pipeline handle.
pub trait SyncPipeline: Send {
    /// Queue a command. Nothing is sent until [`execute`](Self::execute).
    fn queue(&mut self, command: Command);

    /// Number of queued commands
    fn len(&self) -> usize;

    /// Whether nothing is queued
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dispatch every queued command as one round trip.
    fn execute(&mut self) -> StoreResult<Vec<Value>>;
}

/// Suspend-based store client.
#[async_trait]
pub trait AsyncClient: Send + Sync {
    /// Execute one command and return its raw reply.
    async fn call(&self, command: &Command) -> StoreResult<Value>;

    /// Open a pipeline. See [`SyncClient::pipeline`].
    async fn pipeline(&self, atomic: bool) -> StoreResult<Box<dyn AsyncPipeline>>;
}

/// Suspend-based pipeline handle.
#[async_trait]
pub trait AsyncPipeline: Send {
    /// Queue a command. Nothing is sent until [`execute`](Self::execute).
    fn queue(&mut self, command: Command);

    /// Number of queued commands
    fn len(&self) -> usize;

    /// Whether nothing is queued
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dispatch every queued command as one round trip.
    async fn execute(&mut self) -> StoreResult<Vec<Value>>;
}

/// Shared handle to a store transport.
///
/// Cloning copies the reference, never connection state: every Action in a
/// tree, and every clone of it, talks to the same transport.
#[derive(Clone)]
pub enum Client {
    /// Blocking transport
    Sync(Arc<dyn SyncClient>),
    /// Suspend-based transport
    Async(Arc<dyn AsyncClient>),
}

impl Client {
    /// Wrap a blocking transport
    pub fn sync<C: SyncClient + 'static>(client: C) -> Self {
        Client::Sync(Arc::new(client))
    }

    /// Wrap a suspend-based transport
    pub fn asynchronous<C: AsyncClient + 'static>(client: C) -> Self {
        Client::Async(Arc::new(client))
    }

    /// The scheduling model this transport belongs to
    pub fn runtime_mode(&self) -> RuntimeMode {
        match self {
            Client::Sync(_) => RuntimeMode::Sync,
            Client::Async(_) => RuntimeMode::Async,
        }
    }

    /// The blocking transport, if this is one
    pub fn as_sync(&self) -> Option<&Arc<dyn SyncClient>> {
        match self {
            Client::Sync(c) => Some(c),
            Client::Async(_) => None,
        }
    }

    /// The suspend-based transport, if this is one
    pub fn as_async(&self) -> Option<&Arc<dyn AsyncClient>> {
        match self {
            Client::Async(c) => Some(c),
            Client::Sync(_) => None,
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Client::Sync(c) => write!(f, "Client::Sync({:p})", Arc::as_ptr(c)),
            Client::Async(c) => write!(f, "Client::Async({:p})", Arc::as_ptr(c)),
        }
    }
}

impl From<Arc<dyn SyncClient>> for Client {
    fn from(c: Arc<dyn SyncClient>) -> Self {
        Client::Sync(c)
    }
}

impl From<Arc<dyn AsyncClient>> for Client {
    fn from(c: Arc<dyn AsyncClient>) -> Self {
        Client::Async(c)
    }
}
