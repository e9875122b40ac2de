//! The Action value: construction, composition and introspection.
//!
//! An [`Action`] is inert. Building one, cloning it or attaching handlers
//! never touches the store; only the triggers (`run_sync`, `run_async`,
//! `execute`) do. Every composition method takes `&self` and returns a new
//! Action with one field replaced.

use std::fmt;
use std::sync::Arc;

use keyflow_core::{Client, Command, Error, ExecutionMode, Result, RuntimeMode, Value};

use crate::adaptor::Adaptor;
use crate::step::{compose, Executor, Handler, Step};

/// The single-mode work descriptor.
#[derive(Clone, Default)]
pub(crate) enum Work {
    /// Evaluates to `Value::Null`
    #[default]
    Nothing,
    /// A store command, replayable inside a transaction
    Command(Command),
    /// An opaque callable; not transaction-eligible
    Executor(Executor),
}

/// A deferred, composable unit of store work.
///
/// # Example
///
/// ```ignore
/// use keyflow_action::Action;
/// use keyflow_core::{Client, Command, RuntimeMode};
///
/// let get = Action::command(RuntimeMode::Sync, Command::Get { key: "k".into() })
///     .with_client(client)
///     .then(|v| v.as_str().map(str::len).unwrap_or(0).into());
///
/// let len = get.run_sync()?;
/// ```
#[derive(Clone)]
pub struct Action {
    pub(crate) runtime_mode: RuntimeMode,
    pub(crate) execution_mode: ExecutionMode,
    pub(crate) work: Work,
    pub(crate) sub_actions: Arc<[Action]>,
    pub(crate) handler: Option<Handler>,
    pub(crate) result_from_index: Option<usize>,
    pub(crate) client: Option<Client>,
    pub(crate) adaptor: Option<Adaptor>,
    pub(crate) atomic: bool,
}

impl Action {
    fn bare(runtime_mode: RuntimeMode, execution_mode: ExecutionMode) -> Self {
        Self {
            runtime_mode,
            execution_mode,
            work: Work::Nothing,
            sub_actions: Arc::from(Vec::new()),
            handler: None,
            result_from_index: None,
            client: None,
            adaptor: None,
            atomic: true,
        }
    }

    /// A single-mode Action with no work. Evaluates to `Value::Null`.
    pub fn empty(runtime_mode: RuntimeMode) -> Self {
        Self::bare(runtime_mode, ExecutionMode::Single)
    }

    /// A single-mode Action issuing one store command
    pub fn command(runtime_mode: RuntimeMode, command: Command) -> Self {
        Self {
            work: Work::Command(command),
            ..Self::empty(runtime_mode)
        }
    }

    /// A single-mode Action from a command name and positional arguments.
    ///
    /// # Errors
    ///
    /// `Error::UnknownCommand` or `Error::InvalidArguments` when the name
    /// and arguments do not resolve to a supported command.
    pub fn named(runtime_mode: RuntimeMode, name: &str, args: Vec<Value>) -> Result<Self> {
        Ok(Self::command(runtime_mode, Command::parse(name, args)?))
    }

    /// A single-mode Action running an opaque callable.
    ///
    /// The callable receives the bound client. Such Actions cannot be part
    /// of a transaction.
    pub fn from_executor<F>(runtime_mode: RuntimeMode, executor: F) -> Self
    where
        F: Fn(Option<Client>) -> Result<Step> + Send + Sync + 'static,
    {
        Self {
            work: Work::Executor(Arc::new(executor)),
            ..Self::empty(runtime_mode)
        }
    }

    /// Run `actions` one after another, collecting their results.
    pub fn sequence(runtime_mode: RuntimeMode, actions: Vec<Action>) -> Self {
        Self {
            sub_actions: Arc::from(actions),
            ..Self::bare(runtime_mode, ExecutionMode::Sequence)
        }
    }

    /// Queue the commands of `actions` on one pipeline and execute it once.
    pub fn transaction(runtime_mode: RuntimeMode, actions: Vec<Action>) -> Self {
        Self {
            sub_actions: Arc::from(actions),
            ..Self::bare(runtime_mode, ExecutionMode::Transaction)
        }
    }

    /// Start building an Action field by field.
    pub fn builder(runtime_mode: RuntimeMode) -> ActionBuilder {
        ActionBuilder {
            action: Self::empty(runtime_mode),
        }
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Attach `f` after the current handler.
    pub fn then<F>(&self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.push_handler(Arc::new(move |v: Value| -> Result<Step> { Ok(Step::Value(f(v))) }))
    }

    /// Attach a fallible `f` after the current handler.
    pub fn try_then<F>(&self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.push_handler(Arc::new(move |v: Value| f(v).map(Step::Value)))
    }

    /// Attach `f`, which may continue with another Action or suspend.
    pub fn and_then<F>(&self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Step> + Send + Sync + 'static,
    {
        self.push_handler(Arc::new(f))
    }

    pub(crate) fn push_handler(&self, handler: Handler) -> Self {
        Self {
            handler: Some(compose(self.handler.as_ref(), handler)),
            ..self.clone()
        }
    }

    /// Select one element of a Sequence/Transaction aggregate.
    ///
    /// Out-of-range indexes fall back to the full list at run time.
    pub fn select(&self, index: usize) -> Self {
        Self {
            result_from_index: Some(index),
            ..self.clone()
        }
    }

    /// Bind a transport
    pub fn with_client(&self, client: Client) -> Self {
        Self {
            client: Some(client),
            ..self.clone()
        }
    }

    /// Bind a fallback context; its proxy is used when no client is bound.
    pub fn with_adaptor(&self, adaptor: Adaptor) -> Self {
        Self {
            adaptor: Some(adaptor),
            ..self.clone()
        }
    }

    /// Set whether a Transaction opens an atomic pipeline
    pub fn with_atomic(&self, atomic: bool) -> Self {
        Self {
            atomic,
            ..self.clone()
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Scheduling model, fixed at construction
    pub fn runtime_mode(&self) -> RuntimeMode {
        self.runtime_mode
    }

    /// Structure of this Action's work
    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    /// The store command, for command-based single Actions
    pub fn command_ref(&self) -> Option<&Command> {
        match &self.work {
            Work::Command(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this single Action runs an opaque callable
    pub fn is_executor(&self) -> bool {
        matches!(self.work, Work::Executor(_))
    }

    /// Sub-actions of a Sequence/Transaction
    pub fn sub_actions(&self) -> &[Action] {
        &self.sub_actions
    }

    /// Aggregate selection index
    pub fn result_from_index(&self) -> Option<usize> {
        self.result_from_index
    }

    /// Whether any handler is attached
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Explicitly bound transport
    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    /// Fallback context
    pub fn adaptor(&self) -> Option<&Adaptor> {
        self.adaptor.as_ref()
    }

    /// Atomic flag passed to the pipeline factory
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    // =========================================================================
    // Shared by both runtimes
    // =========================================================================

    /// Bound client, else the adaptor's proxy.
    pub(crate) fn resolve_client(&self) -> Option<Client> {
        self.client
            .clone()
            .or_else(|| self.adaptor.as_ref().map(|a| a.proxy().clone()))
    }

    pub(crate) fn ensure_mode(&self, expected: RuntimeMode) -> Result<()> {
        if self.runtime_mode == expected {
            Ok(())
        } else {
            Err(Error::mode_mismatch(format!(
                "{} action triggered through the {} entry point",
                self.runtime_mode, expected
            )))
        }
    }

    /// Sequences and transactions need at least one sub-action to run.
    pub(crate) fn ensure_sub_actions(&self) -> Result<()> {
        if self.sub_actions.is_empty() {
            return Err(Error::configuration(format!(
                "{} action has no sub-actions",
                self.execution_mode
            )));
        }
        Ok(())
    }

    /// The commands a Transaction replays, in order.
    pub(crate) fn transaction_commands(&self) -> Result<Vec<Command>> {
        self.ensure_sub_actions()?;
        self.sub_actions
            .iter()
            .enumerate()
            .map(|(index, sub)| {
                if sub.runtime_mode != self.runtime_mode {
                    return Err(Error::mode_mismatch(format!(
                        "transaction sub-action {} is {} inside a {} transaction",
                        index, sub.runtime_mode, self.runtime_mode
                    )));
                }
                match (&sub.execution_mode, &sub.work) {
                    (ExecutionMode::Single, Work::Command(cmd)) => Ok(cmd.clone()),
                    (ExecutionMode::Single, Work::Executor(_)) => Err(Error::TransactionComposition {
                        index,
                        reason: "executor-based actions cannot be replayed on a pipeline".into(),
                    }),
                    (ExecutionMode::Single, Work::Nothing) => Err(Error::TransactionComposition {
                        index,
                        reason: "action carries no command".into(),
                    }),
                    (mode, _) => Err(Error::TransactionComposition {
                        index,
                        reason: format!("{} actions cannot be nested in a transaction", mode),
                    }),
                }
            })
            .collect()
    }

    /// Apply `result_from_index` to an aggregate.
    pub(crate) fn select_result(&self, mut results: Vec<Value>) -> Value {
        match self.result_from_index {
            Some(index) if index < results.len() => results.swap_remove(index),
            _ => Value::Array(results),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Action");
        s.field("runtime_mode", &self.runtime_mode)
            .field("execution_mode", &self.execution_mode);
        match &self.work {
            Work::Nothing => {}
            Work::Command(c) => {
                s.field("command", c);
            }
            Work::Executor(_) => {
                s.field("executor", &"..");
            }
        }
        if !self.sub_actions.is_empty() {
            s.field("sub_actions", &self.sub_actions);
        }
        if self.execution_mode == ExecutionMode::Transaction {
            s.field("atomic", &self.atomic);
        }
        s.field("has_handler", &self.handler.is_some())
            .field("result_from_index", &self.result_from_index)
            .field("client", &self.client)
            .field("adaptor", &self.adaptor)
            .finish()
    }
}

/// Field-by-field Action construction.
///
/// Created by [`Action::builder`].
#[derive(Debug)]
pub struct ActionBuilder {
    action: Action,
}

impl ActionBuilder {
    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.action.execution_mode = mode;
        self
    }

    /// Set the execution mode from its name.
    ///
    /// # Errors
    ///
    /// `Error::Configuration` for anything but `single`, `sequence` or
    /// `transaction`.
    pub fn execution_mode_str(self, mode: &str) -> Result<Self> {
        Ok(self.execution_mode(mode.parse()?))
    }

    /// Set the sub-actions of a Sequence/Transaction
    pub fn sub_actions(mut self, actions: Vec<Action>) -> Self {
        self.action.sub_actions = Arc::from(actions);
        self
    }

    /// Set the store command
    pub fn command(mut self, command: Command) -> Self {
        self.action.work = Work::Command(command);
        self
    }

    /// Set an opaque callable as the work
    pub fn executor<F>(mut self, executor: F) -> Self
    where
        F: Fn(Option<Client>) -> Result<Step> + Send + Sync + 'static,
    {
        self.action.work = Work::Executor(Arc::new(executor));
        self
    }

    /// Attach a handler; composes with any handler already set
    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Step> + Send + Sync + 'static,
    {
        self.action = self.action.and_then(f);
        self
    }

    /// Set the aggregate selection index
    pub fn result_from_index(mut self, index: Option<usize>) -> Self {
        self.action.result_from_index = index;
        self
    }

    /// Bind a transport
    pub fn client(mut self, client: Client) -> Self {
        self.action.client = Some(client);
        self
    }

    /// Bind a fallback context
    pub fn adaptor(mut self, adaptor: Adaptor) -> Self {
        self.action.adaptor = Some(adaptor);
        self
    }

    /// Set the Transaction atomic flag
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.action.atomic = atomic;
        self
    }

    /// Finish the Action.
    ///
    /// # Errors
    ///
    /// `Error::Configuration` when a Sequence or Transaction has no
    /// sub-actions.
    pub fn build(self) -> Result<Action> {
        let action = self.action;
        if action.execution_mode.is_composite() && action.sub_actions.is_empty() {
            return Err(Error::configuration(format!(
                "{} action requires at least one sub-action",
                action.execution_mode
            )));
        }
        Ok(action)
    }
}
