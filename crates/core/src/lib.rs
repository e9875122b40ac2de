//! Core types and traits for keyflow
//!
//! This crate defines the foundational types shared by the engine and the
//! transports:
//! - Value: dynamic argument/reply type
//! - Command: the typed instruction set an Action carries
//! - RuntimeMode / ExecutionMode: how an Action tree is scheduled and structured
//! - SyncClient / AsyncClient: the store client contract, and the `Client` handle
//! - Error / StoreError: engine and transport error types
//! - Config: `keyflow.toml` settings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod mode;
pub mod value;

pub use client::{AsyncClient, AsyncPipeline, Client, SyncClient, SyncPipeline};
pub use command::{BitOperation, Command};
pub use config::{Config, CONFIG_FILE_NAME};
pub use error::{Error, Result, StoreError, StoreResult};
pub use mode::{ExecutionMode, RuntimeMode};
pub use value::Value;
