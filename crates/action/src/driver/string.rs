use keyflow_core::{Command, Value};

use super::family_driver;
use crate::action::Action;
use crate::adaptor::Adaptor;

/// String and counter commands.
#[derive(Debug, Clone)]
pub struct StringDriver {
    adaptor: Adaptor,
}

family_driver!(StringDriver);

impl StringDriver {
    /// SET
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Action {
        self.adaptor.action(Command::Set {
            key: key.to_string(),
            value: value.into(),
        })
    }

    /// INCRBY 1
    pub fn incr(&self, key: &str) -> Action {
        self.incr_by(key, 1)
    }

    /// INCRBY
    pub fn incr_by(&self, key: &str, delta: i64) -> Action {
        self.adaptor.action(Command::IncrBy {
            key: key.to_string(),
            delta,
        })
    }

    /// DECRBY 1
    pub fn decr(&self, key: &str) -> Action {
        self.decr_by(key, 1)
    }

    /// DECRBY
    pub fn decr_by(&self, key: &str, delta: i64) -> Action {
        self.adaptor.action(Command::DecrBy {
            key: key.to_string(),
            delta,
        })
    }

    /// APPEND; evaluates to the new length
    pub fn append(&self, key: &str, value: &str) -> Action {
        self.adaptor.action(Command::Append {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// GETRANGE with inclusive, possibly negative, byte offsets
    pub fn get_range(&self, key: &str, start: i64, end: i64) -> Action {
        self.adaptor.action(Command::GetRange {
            key: key.to_string(),
            start,
            end,
        })
    }

    /// SETRANGE
    pub fn set_range(&self, key: &str, offset: usize, value: &str) -> Action {
        self.adaptor.action(Command::SetRange {
            key: key.to_string(),
            offset,
            value: value.to_string(),
        })
    }
}
