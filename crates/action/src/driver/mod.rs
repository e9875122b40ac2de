//! Per-family command factories.
//!
//! Each method builds exactly one leaf [`Action`] carrying the store
//! command it names, bound to the driver's adaptor. Nothing runs until the
//! Action is triggered, so driver calls can be freely combined into
//! sequences and transactions.

/// Implements the constructor and [`Driver`] for a family driver.
macro_rules! family_driver {
    ($name:ident) => {
        impl $name {
            pub(crate) fn new(adaptor: $crate::adaptor::Adaptor) -> Self {
                Self { adaptor }
            }
        }

        impl $crate::driver::Driver for $name {
            fn adaptor(&self) -> &$crate::adaptor::Adaptor {
                &self.adaptor
            }
        }
    };
}
pub(crate) use family_driver;

mod bitmap;
mod hash;
mod hyperloglog;
mod keys;
mod list;
mod set;
mod string;
mod zset;

pub use bitmap::BitmapDriver;
pub use hash::HashDriver;
pub use hyperloglog::HyperLogLogDriver;
pub use keys::KeyDriver;
pub use list::ListDriver;
pub use set::SetDriver;
pub use string::StringDriver;
pub use zset::SortedSetDriver;

use keyflow_core::{Command, Value};

use crate::action::Action;
use crate::adaptor::Adaptor;

/// Operations every family shares.
pub trait Driver {
    /// The context Actions are built against
    fn adaptor(&self) -> &Adaptor;

    /// Leaf Action for `command`
    fn action(&self, command: Command) -> Action {
        self.adaptor().action(command)
    }

    /// Store `value` at `key` (SET)
    fn commit(&self, key: &str, value: Value) -> Action {
        self.action(Command::Set {
            key: key.to_string(),
            value,
        })
    }

    /// Read the string at `key` (GET)
    fn get(&self, key: &str) -> Action {
        self.action(Command::Get {
            key: key.to_string(),
        })
    }

    /// Remove `key` (DEL)
    fn delete(&self, key: &str) -> Action {
        self.action(Command::Del {
            keys: vec![key.to_string()],
        })
    }

    /// Expire `key` after `seconds` (EXPIRE)
    fn expire(&self, key: &str, seconds: i64) -> Action {
        self.action(Command::Expire {
            key: key.to_string(),
            seconds,
        })
    }

    /// Count of `key` present (EXISTS)
    fn exists(&self, key: &str) -> Action {
        self.action(Command::Exists {
            keys: vec![key.to_string()],
        })
    }

    /// Remaining lifetime of `key` in seconds (TTL)
    fn ttl(&self, key: &str) -> Action {
        self.action(Command::Ttl {
            key: key.to_string(),
        })
    }

    /// Drop the expiry of `key` (PERSIST)
    fn persist(&self, key: &str) -> Action {
        self.action(Command::Persist {
            key: key.to_string(),
        })
    }
}
