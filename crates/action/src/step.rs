//! Handler and executor outcomes.
//!
//! Every executor and handler reports what it produced as a [`Step`]. The
//! engine inspects it exhaustively, so whether a step needs another store
//! round trip, or a suspension, is always explicit.

use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use keyflow_core::{Client, Result, Value};

use crate::action::Action;

/// Outcome of an executor or handler.
pub enum Step {
    /// A finished value
    Value(Value),
    /// Resolve this Action next, through the same runtime as the caller
    Continue(Action),
    /// Await this future, then continue with the step it yields.
    ///
    /// Only valid on the async path; the blocking path rejects it with
    /// `Error::RuntimeModeMismatch`.
    Suspend(BoxFuture<'static, Result<Step>>),
}

impl Step {
    /// A finished value
    pub fn value(value: impl Into<Value>) -> Self {
        Step::Value(value.into())
    }

    /// Wrap a future as a suspension point
    pub fn suspend<F>(future: F) -> Self
    where
        F: Future<Output = Result<Step>> + Send + 'static,
    {
        Step::Suspend(Box::pin(future))
    }

    /// Short variant name, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Value(_) => "value",
            Step::Continue(_) => "continue",
            Step::Suspend(_) => "suspend",
        }
    }

    /// Feed the eventual value of this step into `handler`.
    ///
    /// Values are handed over immediately. A continuation gets `handler`
    /// attached as its outermost handler, and a suspension is mapped so the
    /// handler runs once the future resolves. Nothing is executed here.
    pub(crate) fn bind(self, handler: Handler) -> Result<Step> {
        match self {
            Step::Value(value) => handler(value),
            Step::Continue(action) => Ok(Step::Continue(action.push_handler(handler))),
            Step::Suspend(future) => Ok(Step::suspend(async move { future.await?.bind(handler) })),
        }
    }
}

impl From<Value> for Step {
    fn from(value: Value) -> Self {
        Step::Value(value)
    }
}

impl From<Action> for Step {
    fn from(action: Action) -> Self {
        Step::Continue(action)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Step::Continue(a) => f.debug_tuple("Continue").field(a).finish(),
            Step::Suspend(_) => f.write_str("Suspend(..)"),
        }
    }
}

/// Post-processing attached to an Action.
pub(crate) type Handler = Arc<dyn Fn(Value) -> Result<Step> + Send + Sync>;

/// Opaque single-mode work: gets the bound client, if any.
pub(crate) type Executor = Arc<dyn Fn(Option<Client>) -> Result<Step> + Send + Sync>;

/// `outer ∘ inner`; with no inner handler, just `outer`.
pub(crate) fn compose(inner: Option<&Handler>, outer: Handler) -> Handler {
    match inner {
        None => outer,
        Some(inner) => {
            let inner = inner.clone();
            Arc::new(move |value: Value| inner(value)?.bind(outer.clone()))
        }
    }
}
