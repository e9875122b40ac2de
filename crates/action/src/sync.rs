//! Blocking execution path.
//!
//! Walks an Action tree on the calling thread. There are no suspension
//! points: a `Step::Suspend` from an executor or handler, or an async
//! client anywhere in the tree, fails with `Error::RuntimeModeMismatch`
//! instead of blocking.

use std::sync::Arc;

use keyflow_core::{Client, Error, ExecutionMode, Result, RuntimeMode, SyncClient, Value};
use tracing::{debug, trace, warn};

use crate::action::{Action, Work};
use crate::step::Step;

fn sync_client(client: Option<&Client>) -> Result<&Arc<dyn SyncClient>> {
    match client {
        Some(Client::Sync(c)) => Ok(c),
        Some(Client::Async(_)) => Err(Error::mode_mismatch(
            "async client bound to an action run through run_sync",
        )),
        None => Err(Error::NoClient),
    }
}

impl Action {
    /// Run this Action on the calling thread.
    ///
    /// # Errors
    ///
    /// - `Error::RuntimeModeMismatch` if this is an async Action, or if any
    ///   part of the tree tries to suspend
    /// - `Error::NoClient` if a command needs a client and none resolves
    /// - `Error::Transport` for store failures, unchanged
    pub fn run_sync(&self) -> Result<Value> {
        self.ensure_mode(RuntimeMode::Sync)?;
        debug!(
            execution_mode = %self.execution_mode,
            runtime_mode = %self.runtime_mode,
            "run_sync"
        );
        self.resolve_sync(None)
    }

    /// Resolve this Action, falling back to `inherited` when it has no client
    /// of its own.
    fn resolve_sync(&self, inherited: Option<&Client>) -> Result<Value> {
        self.ensure_mode(RuntimeMode::Sync)?;
        let client = self.resolve_client().or_else(|| inherited.cloned());
        let client = client.as_ref();

        let value = match self.execution_mode {
            ExecutionMode::Single => {
                let step = match &self.work {
                    Work::Nothing => Step::Value(Value::Null),
                    Work::Command(command) => {
                        trace!(command = command.name(), key = ?command.key(), "call");
                        Step::Value(sync_client(client)?.call(command)?)
                    }
                    Work::Executor(executor) => executor(client.cloned())?,
                };
                settle_sync(step, client)?
            }
            ExecutionMode::Sequence => self.sequence_sync(client)?,
            ExecutionMode::Transaction => self.transaction_sync(client)?,
        };
        self.handle_sync(value, client)
    }

    /// Apply this Action's handler to an already resolved value.
    fn handle_sync(&self, value: Value, client: Option<&Client>) -> Result<Value> {
        match &self.handler {
            Some(handler) => settle_sync(handler(value)?, client),
            None => Ok(value),
        }
    }

    fn sequence_sync(&self, client: Option<&Client>) -> Result<Value> {
        self.ensure_sub_actions()?;
        let mut results = Vec::with_capacity(self.sub_actions.len());
        for (index, sub) in self.sub_actions.iter().enumerate() {
            trace!(index, execution_mode = %sub.execution_mode, "sequence step");
            let value = sub.resolve_sync(client).map_err(|e| {
                warn!(index, error = %e, "sequence step failed");
                e
            })?;
            results.push(value);
        }
        Ok(self.select_result(results))
    }

    fn transaction_sync(&self, client: Option<&Client>) -> Result<Value> {
        let commands = self.transaction_commands()?;
        let queued = commands.len();

        let mut pipeline = sync_client(client)?.pipeline(self.atomic)?;
        for command in commands {
            trace!(command = command.name(), key = ?command.key(), "queue");
            pipeline.queue(command);
        }
        let raw = pipeline.execute().map_err(|e| {
            warn!(queued, error = %e, "pipeline execute failed");
            e
        })?;
        if raw.len() != queued {
            return Err(Error::PipelineResultMismatch {
                queued,
                returned: raw.len(),
            });
        }

        let results = self
            .sub_actions
            .iter()
            .zip(raw)
            .map(|(sub, value)| sub.handle_sync(value, client))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.select_result(results))
    }
}

/// Drive a step to a value without suspending.
fn settle_sync(step: Step, client: Option<&Client>) -> Result<Value> {
    match step {
        Step::Value(value) => Ok(value),
        Step::Continue(action) => {
            trace!(execution_mode = %action.execution_mode, "continuation");
            action.resolve_sync(client)
        }
        Step::Suspend(_) => Err(Error::mode_mismatch(
            "suspension produced while running through run_sync",
        )),
    }
}
