//! Runtime and execution modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Scheduling model an Action tree is triggered under.
///
/// Fixed when an Action is constructed; clones inherit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Blocking: one call stack, no suspension points
    Sync,
    /// Suspend-based: one logical task per triggered tree
    Async,
}

impl RuntimeMode {
    /// Lower-case name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeMode::Sync => "sync",
            RuntimeMode::Async => "async",
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sync" => Ok(RuntimeMode::Sync),
            "async" => Ok(RuntimeMode::Async),
            other => Err(Error::configuration(format!(
                "runtime mode must be 'sync' or 'async', got '{}'",
                other
            ))),
        }
    }
}

/// How an Action's sub-work is structured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One command or executor
    #[default]
    Single,
    /// Sub-actions run one after another, each to completion
    Sequence,
    /// Sub-actions replayed into one atomic pipeline
    Transaction,
}

impl ExecutionMode {
    /// Lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Single => "single",
            ExecutionMode::Sequence => "sequence",
            ExecutionMode::Transaction => "transaction",
        }
    }

    /// Whether this mode aggregates sub-actions
    pub fn is_composite(&self) -> bool {
        !matches!(self, ExecutionMode::Single)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(ExecutionMode::Single),
            "sequence" => Ok(ExecutionMode::Sequence),
            "transaction" => Ok(ExecutionMode::Transaction),
            other => Err(Error::configuration(format!(
                "execution mode must be 'single', 'sequence' or 'transaction', got '{}'",
                other
            ))),
        }
    }
}
