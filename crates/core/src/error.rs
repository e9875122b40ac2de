//! Error types for keyflow
//!
//! Two layers:
//! - [`StoreError`]: failures reported by a store transport. Opaque to the
//!   engine and passed through untouched.
//! - [`Error`]: what an Action trigger returns. Engine-specific variants
//!   only describe misuse of the composition API; data-layer failures
//!   arrive as [`Error::Transport`].
//!
//! We use `thiserror` for `Display` and `Error` implementations.

use thiserror::Error;

/// Result type alias for keyflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for store transport operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures raised by a store transport (single call or pipeline execution).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Operation against a key holding the wrong kind of value
    #[error("WRONGTYPE operation against key '{key}' holding the wrong kind of value")]
    WrongType {
        /// Offending key
        key: String,
    },

    /// Stored value is not an integer (or a float, for float commands)
    #[error("value at '{key}' is not a number or out of range")]
    NotANumber {
        /// Offending key
        key: String,
    },

    /// Arithmetic overflow
    #[error("increment or decrement would overflow at '{key}'")]
    Overflow {
        /// Offending key
        key: String,
    },

    /// Argument rejected by the transport
    #[error("invalid argument for {command}: {reason}")]
    InvalidArgument {
        /// Command name
        command: String,
        /// What was wrong
        reason: String,
    },

    /// Batch was discarded by the transport
    #[error("batch aborted: {reason}")]
    Aborted {
        /// Reason reported by the transport
        reason: String,
    },

    /// Connection-level failure (closed, reset, cancelled)
    #[error("connection error: {reason}")]
    Connection {
        /// Reason reported by the transport
        reason: String,
    },
}

/// Errors returned when triggering an Action.
///
/// # Categories
///
/// | Category | Variants |
/// |----------|----------|
/// | Construction | `Configuration`, `UnknownCommand`, `InvalidArguments` |
/// | Composition | `RuntimeModeMismatch`, `TransactionComposition`, `NoClient` |
/// | Transport | `Transport`, `PipelineResultMismatch` |
/// | User code | `Handler` |
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Unresolvable mode string or invalid configuration value
    #[error("configuration error: {reason}")]
    Configuration {
        /// What was wrong
        reason: String,
    },

    /// Action triggered through the wrong entry point, or a blocking run
    /// produced a suspension-capable value
    #[error("runtime mode mismatch: {reason}")]
    RuntimeModeMismatch {
        /// What was mismatched
        reason: String,
    },

    /// Transaction sub-action without a replayable command
    #[error("transaction sub-action {index} is not replayable: {reason}")]
    TransactionComposition {
        /// Position of the offending sub-action
        index: usize,
        /// Why it was rejected
        reason: String,
    },

    /// Neither a client nor an adaptor was available at trigger time
    #[error("no client bound: attach one with with_client() or with_adaptor()")]
    NoClient,

    /// Command name not known to the dispatch table
    #[error("unknown command: {name}")]
    UnknownCommand {
        /// Name as given
        name: String,
    },

    /// Wrong arity or argument types for a named command
    #[error("invalid arguments for {command}: {reason}")]
    InvalidArguments {
        /// Command name
        command: String,
        /// What was wrong
        reason: String,
    },

    /// Pipeline returned a different number of results than were queued
    #[error("pipeline returned {returned} results for {queued} queued commands")]
    PipelineResultMismatch {
        /// Commands queued
        queued: usize,
        /// Results returned
        returned: usize,
    },

    /// A user handler reported a failure
    #[error("handler failed: {reason}")]
    Handler {
        /// Message from the handler
        reason: String,
    },

    /// Failure raised by the store transport, passed through unchanged
    #[error(transparent)]
    Transport(#[from] StoreError),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Error::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a runtime mode mismatch error
    pub fn mode_mismatch(reason: impl Into<String>) -> Self {
        Error::RuntimeModeMismatch {
            reason: reason.into(),
        }
    }

    /// Create a handler error
    pub fn handler(reason: impl Into<String>) -> Self {
        Error::Handler {
            reason: reason.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(command: &str, reason: impl Into<String>) -> Self {
        Error::InvalidArguments {
            command: command.to_string(),
            reason: reason.into(),
        }
    }

    /// The transport error, if this failure came from the store
    pub fn as_transport(&self) -> Option<&StoreError> {
        match self {
            Error::Transport(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_transport_error_is_transparent() {
        let inner = StoreError::WrongType { key: "k".into() };
        let err = Error::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.as_transport(), Some(&inner));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_error_display() {
        let err = Error::TransactionComposition {
            index: 2,
            reason: "executor-based action".into(),
        };
        assert!(err.to_string().contains("sub-action 2"));

        let err = Error::PipelineResultMismatch {
            queued: 3,
            returned: 2,
        };
        assert!(err.to_string().contains("2 results for 3"));
    }

    #[test]
    fn test_engine_errors_are_not_transport() {
        assert!(Error::NoClient.as_transport().is_none());
        assert!(Error::configuration("x").as_transport().is_none());
    }
}
