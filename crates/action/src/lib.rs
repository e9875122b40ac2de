//! # Keyflow Action
//!
//! Deferred, composable units of key-value store work.
//!
//! An [`Action`] describes one store command, an ordered [sequence] of
//! Actions, or a [transaction] whose commands are queued on one pipeline and
//! executed in a single round trip. Post-processing is attached lazily with
//! [`Action::then`] and friends; nothing touches the store until a trigger:
//!
//! | Trigger | Runtime mode |
//! |---------|--------------|
//! | [`Action::run_sync`] | Sync |
//! | [`Action::run_async`], `action.await` | Async |
//! | [`Action::execute`] | either, returns an [`Execution`] |
//!
//! Triggering through the wrong entry point fails with
//! `Error::RuntimeModeMismatch`.
//!
//! ## Quick Start
//!
//! ```text
//! use keyflow_action::{Adaptor, Driver};
//! use keyflow_core::Client;
//! use keyflow_memory::MemoryStore;
//!
//! let adaptor = Adaptor::new(Client::sync(MemoryStore::new()));
//! let strings = adaptor.strings();
//!
//! let counter = adaptor
//!     .transaction(vec![strings.incr("c"), strings.incr("c")])
//!     .run_sync()?;            // [1, 2], one pipeline round trip
//!
//! let value = adaptor
//!     .sequence(vec![strings.set("k", "v"), strings.get("k")])
//!     .select(1)
//!     .run_sync()?;            // "v"
//! ```
//!
//! [sequence]: Action::sequence
//! [transaction]: Action::transaction

#![warn(clippy::all)]

mod action;
mod adaptor;
mod asynchronous;
pub mod driver;
mod session;
mod step;
mod sync;

// Test modules
#[cfg(test)]
mod tests;

pub use action::{Action, ActionBuilder};
pub use adaptor::{Adaptor, AnyDriver, DataType};
pub use asynchronous::Execution;
pub use driver::{
    BitmapDriver, Driver, HashDriver, HyperLogLogDriver, KeyDriver, ListDriver, SetDriver,
    SortedSetDriver, StringDriver,
};
pub use session::Session;
pub use step::Step;
