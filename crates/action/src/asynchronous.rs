//! Suspend-based execution path.
//!
//! The tree is walked as one boxed future: every transport call and every
//! `Step::Suspend` is an await point. Sub-actions still run strictly in
//! order; nothing inside one tree runs concurrently.

use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;

use keyflow_core::{AsyncClient, Client, Error, ExecutionMode, Result, RuntimeMode, Value};
use tracing::{debug, trace, warn};

use crate::action::{Action, Work};
use crate::step::Step;

fn async_client(client: Option<&Client>) -> Result<&Arc<dyn AsyncClient>> {
    match client {
        Some(Client::Async(c)) => Ok(c),
        Some(Client::Sync(_)) => Err(Error::mode_mismatch(
            "blocking client bound to an action run through run_async",
        )),
        None => Err(Error::NoClient),
    }
}

impl Action {
    /// Run this Action as a future.
    ///
    /// The returned future owns a clone of the Action. Awaiting the Action
    /// directly does the same.
    ///
    /// # Errors
    ///
    /// Same as [`run_sync`](Self::run_sync), with `Error::RuntimeModeMismatch`
    /// raised for sync Actions and blocking clients.
    pub fn run_async(&self) -> BoxFuture<'static, Result<Value>> {
        self.clone().into_future()
    }

    /// Trigger through the entry point matching this Action's runtime mode.
    pub fn execute(&self) -> Execution {
        match self.runtime_mode {
            RuntimeMode::Sync => Execution::Ready(self.run_sync()),
            RuntimeMode::Async => Execution::Pending(self.run_async()),
        }
    }

    fn resolve_async(self, inherited: Option<Client>) -> BoxFuture<'static, Result<Value>> {
        async move {
            self.ensure_mode(RuntimeMode::Async)?;
            let client = self.resolve_client().or(inherited);

            let value = match self.execution_mode {
                ExecutionMode::Single => {
                    let step = match &self.work {
                        Work::Nothing => Step::Value(Value::Null),
                        Work::Command(command) => {
                            trace!(command = command.name(), key = ?command.key(), "call");
                            Step::Value(async_client(client.as_ref())?.call(command).await?)
                        }
                        Work::Executor(executor) => executor(client.clone())?,
                    };
                    settle_async(step, client.clone()).await?
                }
                ExecutionMode::Sequence => self.sequence_async(client.clone()).await?,
                ExecutionMode::Transaction => self.transaction_async(client.clone()).await?,
            };
            self.handle_async(value, client).await
        }
        .boxed()
    }

    async fn handle_async(&self, value: Value, client: Option<Client>) -> Result<Value> {
        match &self.handler {
            Some(handler) => settle_async(handler(value)?, client).await,
            None => Ok(value),
        }
    }

    async fn sequence_async(&self, client: Option<Client>) -> Result<Value> {
        self.ensure_sub_actions()?;
        let mut results = Vec::with_capacity(self.sub_actions.len());
        for (index, sub) in self.sub_actions.iter().enumerate() {
            trace!(index, execution_mode = %sub.execution_mode, "sequence step");
            match sub.clone().resolve_async(client.clone()).await {
                Ok(value) => results.push(value),
                Err(e) => {
                    warn!(index, error = %e, "sequence step failed");
                    return Err(e);
                }
            }
        }
        Ok(self.select_result(results))
    }

    async fn transaction_async(&self, client: Option<Client>) -> Result<Value> {
        let commands = self.transaction_commands()?;
        let queued = commands.len();

        let mut pipeline = async_client(client.as_ref())?.pipeline(self.atomic).await?;
        for command in commands {
            trace!(command = command.name(), key = ?command.key(), "queue");
            pipeline.queue(command);
        }
        let raw = match pipeline.execute().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(queued, error = %e, "pipeline execute failed");
                return Err(e.into());
            }
        };
        if raw.len() != queued {
            return Err(Error::PipelineResultMismatch {
                queued,
                returned: raw.len(),
            });
        }

        let mut results = Vec::with_capacity(queued);
        for (sub, value) in self.sub_actions.iter().zip(raw) {
            results.push(sub.handle_async(value, client.clone()).await?);
        }
        Ok(self.select_result(results))
    }
}

/// Drive a step to a value, awaiting suspensions and continuations.
fn settle_async(step: Step, client: Option<Client>) -> BoxFuture<'static, Result<Value>> {
    async move {
        let mut step = step;
        loop {
            match step {
                Step::Value(value) => return Ok(value),
                Step::Continue(action) => {
                    trace!(execution_mode = %action.execution_mode, "continuation");
                    return action.resolve_async(client).await;
                }
                Step::Suspend(future) => step = future.await?,
            }
        }
    }
    .boxed()
}

impl IntoFuture for Action {
    type Output = Result<Value>;
    type IntoFuture = BoxFuture<'static, Result<Value>>;

    fn into_future(self) -> Self::IntoFuture {
        async move {
            self.ensure_mode(RuntimeMode::Async)?;
            debug!(
                execution_mode = %self.execution_mode,
                runtime_mode = %self.runtime_mode,
                "run_async"
            );
            self.resolve_async(None).await
        }
        .boxed()
    }
}

/// Result of [`Action::execute`].
///
/// Sync Actions have already run and hold their result; async Actions hand
/// back a future that has not been polled yet. Either way the value can be
/// awaited.
pub enum Execution {
    /// Finished on the calling thread
    Ready(Result<Value>),
    /// Still to be awaited
    Pending(BoxFuture<'static, Result<Value>>),
}

impl Execution {
    /// Whether the result is already available
    pub fn is_ready(&self) -> bool {
        matches!(self, Execution::Ready(_))
    }

    /// The result of a sync Action.
    ///
    /// # Errors
    ///
    /// `Error::RuntimeModeMismatch` if this is a pending async execution,
    /// which would need a runtime to finish.
    pub fn wait(self) -> Result<Value> {
        match self {
            Execution::Ready(result) => result,
            Execution::Pending(_) => Err(Error::mode_mismatch(
                "async execution must be awaited, not waited on",
            )),
        }
    }
}

impl IntoFuture for Execution {
    type Output = Result<Value>;
    type IntoFuture = BoxFuture<'static, Result<Value>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Execution::Ready(result) => future::ready(result).boxed(),
            Execution::Pending(future) => future,
        }
    }
}

impl fmt::Debug for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Execution::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Execution::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
