//! Unit of work.
//!
//! A [`Session`] collects Actions as an application stages changes, then
//! turns them into one Action on [`commit`](Session::commit):
//!
//! | Pending | Committed as |
//! |---------|--------------|
//! | none | `None` |
//! | one | that Action, unchanged |
//! | several | a Transaction over all of them, full result list |
//!
//! Committing only builds the Action; the caller triggers it.
//!
//! # Transactions
//!
//! Outside [`begin`](Session::begin), [`delete`](Session::delete) and
//! [`expire`](Session::expire) hand their Action straight back. Between
//! `begin` and `commit` (or [`rollback`](Session::rollback)) they are staged
//! with everything else and return `None`. Committing ends the transaction.

use tracing::debug;

use crate::action::Action;
use crate::adaptor::Adaptor;
use crate::driver::Driver;

/// Pending Actions staged against one adaptor.
#[derive(Debug, Clone)]
pub struct Session {
    adaptor: Adaptor,
    pending: Vec<Action>,
    in_transaction: bool,
}

impl Session {
    /// Create an empty session.
    pub fn new(adaptor: Adaptor) -> Self {
        Self {
            adaptor,
            pending: Vec::new(),
            in_transaction: false,
        }
    }

    /// Stage one Action.
    pub fn add(&mut self, action: Action) {
        self.pending.push(action);
    }

    /// Stage several Actions, in order.
    pub fn add_all(&mut self, actions: impl IntoIterator<Item = Action>) {
        self.pending.extend(actions);
    }

    /// Number of staged Actions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything staged.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Whether `delete` and `expire` are currently staged.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Start a transaction, discarding anything staged so far.
    pub fn begin(&mut self) -> &mut Self {
        debug!(discarded = self.pending.len(), "session begin");
        self.pending.clear();
        self.in_transaction = true;
        self
    }

    /// Leave the transaction and drop everything staged.
    pub fn rollback(&mut self) {
        debug!(discarded = self.pending.len(), "session rollback");
        self.in_transaction = false;
        self.pending.clear();
    }

    /// DEL `key`: staged inside a transaction, returned otherwise.
    pub fn delete(&mut self, key: &str) -> Option<Action> {
        let action = self.adaptor.keys().delete(key);
        self.stage_or_return(action)
    }

    /// EXPIRE `key`: staged inside a transaction, returned otherwise.
    pub fn expire(&mut self, key: &str, seconds: i64) -> Option<Action> {
        let action = self.adaptor.keys().expire(key, seconds);
        self.stage_or_return(action)
    }

    /// TTL of `key`. Reads are never staged.
    pub fn ttl(&self, key: &str) -> Action {
        self.adaptor.keys().ttl(key)
    }

    fn stage_or_return(&mut self, action: Action) -> Option<Action> {
        if self.in_transaction {
            self.pending.push(action);
            None
        } else {
            Some(action)
        }
    }

    /// Drain the staged Actions into one Action and end any transaction.
    pub fn commit(&mut self) -> Option<Action> {
        let mut pending = std::mem::take(&mut self.pending);
        self.in_transaction = false;
        debug!(pending = pending.len(), "session commit");
        match pending.len() {
            0 => None,
            1 => pending.pop(),
            _ => Some(self.adaptor.transaction(pending)),
        }
    }
}
