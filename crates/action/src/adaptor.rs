//! The Adaptor: explicit context object for building Actions.
//!
//! An [`Adaptor`] pairs one transport with the settings every Action built
//! through it shares (runtime mode, transaction atomicity). It is fixed at
//! construction and cheap to clone; Actions hold it as a fallback for
//! client resolution.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use keyflow_core::{Client, Command, Config, Error, Result, RuntimeMode};
use tracing::info;

use crate::action::Action;
use crate::driver::{
    BitmapDriver, HashDriver, HyperLogLogDriver, KeyDriver, ListDriver, SetDriver,
    SortedSetDriver, StringDriver,
};
use crate::session::Session;

struct Inner {
    client: Client,
    atomic_transactions: bool,
}

/// Shared context: the default client and the runtime mode of every Action
/// built through it.
#[derive(Clone)]
pub struct Adaptor {
    inner: Arc<Inner>,
}

impl Adaptor {
    /// Context over `client`, runtime mode taken from the client.
    pub fn new(client: Client) -> Self {
        Self::from_parts(client, true)
    }

    /// Context over `client` with settings from `config`.
    ///
    /// # Errors
    ///
    /// `Error::RuntimeModeMismatch` when the configured runtime mode does
    /// not match the client's.
    pub fn from_config(config: &Config, client: Client) -> Result<Self> {
        if config.runtime_mode != client.runtime_mode() {
            return Err(Error::mode_mismatch(format!(
                "configured runtime mode is {} but the client is {}",
                config.runtime_mode,
                client.runtime_mode()
            )));
        }
        Ok(Self::from_parts(client, config.atomic_transactions))
    }

    fn from_parts(client: Client, atomic_transactions: bool) -> Self {
        info!(
            runtime_mode = %client.runtime_mode(),
            atomic_transactions,
            "adaptor created"
        );
        Self {
            inner: Arc::new(Inner {
                client,
                atomic_transactions,
            }),
        }
    }

    /// Default client for Actions that have none bound
    pub fn proxy(&self) -> &Client {
        &self.inner.client
    }

    /// Runtime mode of every Action built here
    pub fn runtime_mode(&self) -> RuntimeMode {
        self.inner.client.runtime_mode()
    }

    /// Whether transactions open atomic pipelines
    pub fn atomic_transactions(&self) -> bool {
        self.inner.atomic_transactions
    }

    /// Leaf Action for `command`
    pub fn action(&self, command: Command) -> Action {
        Action::command(self.runtime_mode(), command).with_adaptor(self.clone())
    }

    /// Sequence over `actions`
    pub fn sequence(&self, actions: Vec<Action>) -> Action {
        Action::sequence(self.runtime_mode(), actions).with_adaptor(self.clone())
    }

    /// Transaction over `actions`, atomic per configuration
    pub fn transaction(&self, actions: Vec<Action>) -> Action {
        Action::transaction(self.runtime_mode(), actions)
            .with_adaptor(self.clone())
            .with_atomic(self.atomic_transactions())
    }

    /// A fresh unit of work
    pub fn session(&self) -> Session {
        Session::new(self.clone())
    }

    /// Generic key operations
    pub fn keys(&self) -> KeyDriver {
        KeyDriver::new(self.clone())
    }

    /// String commands
    pub fn strings(&self) -> StringDriver {
        StringDriver::new(self.clone())
    }

    /// Hash commands
    pub fn hashes(&self) -> HashDriver {
        HashDriver::new(self.clone())
    }

    /// List commands
    pub fn lists(&self) -> ListDriver {
        ListDriver::new(self.clone())
    }

    /// Set commands
    pub fn sets(&self) -> SetDriver {
        SetDriver::new(self.clone())
    }

    /// Sorted set commands
    pub fn sorted_sets(&self) -> SortedSetDriver {
        SortedSetDriver::new(self.clone())
    }

    /// Bitmap commands
    pub fn bitmaps(&self) -> BitmapDriver {
        BitmapDriver::new(self.clone())
    }

    /// HyperLogLog commands
    pub fn hyperloglogs(&self) -> HyperLogLogDriver {
        HyperLogLogDriver::new(self.clone())
    }

    /// Driver for a family looked up by [`DataType`]
    pub fn driver(&self, data_type: DataType) -> AnyDriver {
        match data_type {
            DataType::Generic => AnyDriver::Keys(self.keys()),
            DataType::String => AnyDriver::String(self.strings()),
            DataType::Hash => AnyDriver::Hash(self.hashes()),
            DataType::List => AnyDriver::List(self.lists()),
            DataType::Set => AnyDriver::Set(self.sets()),
            DataType::SortedSet => AnyDriver::SortedSet(self.sorted_sets()),
            DataType::Bitmap => AnyDriver::Bitmap(self.bitmaps()),
            DataType::HyperLogLog => AnyDriver::HyperLogLog(self.hyperloglogs()),
        }
    }
}

impl fmt::Debug for Adaptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adaptor")
            .field("client", &self.inner.client)
            .field("atomic_transactions", &self.inner.atomic_transactions)
            .finish()
    }
}

/// Data-structure family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Type-agnostic key operations
    Generic,
    /// Strings and counters
    String,
    /// Hashes
    Hash,
    /// Lists
    List,
    /// Sets
    Set,
    /// Sorted sets
    SortedSet,
    /// Bitmaps
    Bitmap,
    /// HyperLogLog cardinality counters
    HyperLogLog,
}

impl DataType {
    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Generic => "generic",
            DataType::String => "string",
            DataType::Hash => "hash",
            DataType::List => "list",
            DataType::Set => "set",
            DataType::SortedSet => "zset",
            DataType::Bitmap => "bitmap",
            DataType::HyperLogLog => "hyper_log_log",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "generic" | "key" | "keys" => Ok(DataType::Generic),
            "string" | "str" => Ok(DataType::String),
            "hash" => Ok(DataType::Hash),
            "list" => Ok(DataType::List),
            "set" => Ok(DataType::Set),
            "zset" | "sorted_set" | "sortedset" => Ok(DataType::SortedSet),
            "bitmap" => Ok(DataType::Bitmap),
            "hyper_log_log" | "hyperloglog" | "hll" => Ok(DataType::HyperLogLog),
            other => Err(Error::configuration(format!(
                "unknown data type '{}'",
                other
            ))),
        }
    }
}

/// A driver selected at run time through [`Adaptor::driver`].
#[derive(Debug, Clone)]
pub enum AnyDriver {
    /// Generic key operations
    Keys(KeyDriver),
    /// String commands
    String(StringDriver),
    /// Hash commands
    Hash(HashDriver),
    /// List commands
    List(ListDriver),
    /// Set commands
    Set(SetDriver),
    /// Sorted set commands
    SortedSet(SortedSetDriver),
    /// Bitmap commands
    Bitmap(BitmapDriver),
    /// HyperLogLog commands
    HyperLogLog(HyperLogLogDriver),
}

impl AnyDriver {
    /// The family this driver serves
    pub fn data_type(&self) -> DataType {
        match self {
            AnyDriver::Keys(_) => DataType::Generic,
            AnyDriver::String(_) => DataType::String,
            AnyDriver::Hash(_) => DataType::Hash,
            AnyDriver::List(_) => DataType::List,
            AnyDriver::Set(_) => DataType::Set,
            AnyDriver::SortedSet(_) => DataType::SortedSet,
            AnyDriver::Bitmap(_) => DataType::Bitmap,
            AnyDriver::HyperLogLog(_) => DataType::HyperLogLog,
        }
    }

    /// Type-erased access to the shared key operations
    pub fn as_driver(&self) -> &dyn crate::driver::Driver {
        match self {
            AnyDriver::Keys(d) => d,
            AnyDriver::String(d) => d,
            AnyDriver::Hash(d) => d,
            AnyDriver::List(d) => d,
            AnyDriver::Set(d) => d,
            AnyDriver::SortedSet(d) => d,
            AnyDriver::Bitmap(d) => d,
            AnyDriver::HyperLogLog(d) => d,
        }
    }
}
