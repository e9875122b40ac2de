//! Configuration via `keyflow.toml`
//!
//! Holds the settings an adaptor is built from: which runtime mode the
//! application runs Action trees under, and whether transactions open
//! atomic (MULTI/EXEC) pipelines.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::mode::RuntimeMode;

/// Config file name used by [`Config::write_default_if_missing`] callers.
pub const CONFIG_FILE_NAME: &str = "keyflow.toml";

/// Keyflow configuration.
///
/// # Example
///
/// ```toml
/// # Runtime mode: "sync" (default) or "async"
/// runtime_mode = "sync"
///
/// # Open transaction pipelines as MULTI/EXEC blocks (default: true)
/// atomic_transactions = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Runtime mode of every Action built through the adaptor.
    #[serde(default = "default_runtime_mode")]
    pub runtime_mode: RuntimeMode,
    /// Whether transaction pipelines are opened with the atomic flag.
    #[serde(default = "default_atomic")]
    pub atomic_transactions: bool,
}

fn default_runtime_mode() -> RuntimeMode {
    RuntimeMode::Sync
}

fn default_atomic() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime_mode: default_runtime_mode(),
            atomic_transactions: default_atomic(),
        }
    }
}

impl Config {
    /// Config for the given runtime mode, other settings at their defaults.
    pub fn with_runtime_mode(runtime_mode: RuntimeMode) -> Self {
        Self {
            runtime_mode,
            ..Self::default()
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Keyflow configuration
#
# Runtime mode: "sync" (default) or "async"
#   "sync"  = actions run on the calling thread via run_sync()
#   "async" = actions are awaited
runtime_mode = "sync"

# Open transaction pipelines as MULTI/EXEC blocks (default: true)
atomic_transactions = true
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for malformed TOML, unknown keys or
    /// an invalid runtime mode.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| {
            Error::configuration(format!("In config file '{}': {}", path.display(), e))
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::configuration(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}
