//! Action Scenario Tests
//!
//! End-to-end behaviour of the public API against the in-memory store:
//! - leaf, sequence and transaction triggers on both runtimes
//! - handler chaining and continuations
//! - configuration-driven adaptors
//! - error propagation
//! - store edge cases under generated arguments

mod common;

mod configuration;
mod properties;
mod scenarios_async;
mod scenarios_sync;
mod units_of_work;
