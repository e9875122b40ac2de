use keyflow_core::{Command, Value};

use super::family_driver;
use crate::action::Action;
use crate::adaptor::Adaptor;

/// List commands.
#[derive(Debug, Clone)]
pub struct ListDriver {
    adaptor: Adaptor,
}

family_driver!(ListDriver);

impl ListDriver {
    /// LPUSH; the last value ends up at the head
    pub fn lpush(&self, key: &str, values: Vec<Value>) -> Action {
        self.adaptor.action(Command::LPush {
            key: key.to_string(),
            values,
        })
    }

    /// RPUSH
    pub fn rpush(&self, key: &str, values: Vec<Value>) -> Action {
        self.adaptor.action(Command::RPush {
            key: key.to_string(),
            values,
        })
    }

    pub fn lpop(&self, key: &str) -> Action {
        self.adaptor.action(Command::LPop {
            key: key.to_string(),
        })
    }

    pub fn rpop(&self, key: &str) -> Action {
        self.adaptor.action(Command::RPop {
            key: key.to_string(),
        })
    }

    /// LRANGE with inclusive, possibly negative, bounds
    pub fn lrange(&self, key: &str, start: i64, stop: i64) -> Action {
        self.adaptor.action(Command::LRange {
            key: key.to_string(),
            start,
            stop,
        })
    }

    pub fn llen(&self, key: &str) -> Action {
        self.adaptor.action(Command::LLen {
            key: key.to_string(),
        })
    }

    pub fn lindex(&self, key: &str, index: i64) -> Action {
        self.adaptor.action(Command::LIndex {
            key: key.to_string(),
            index,
        })
    }

    /// LREM: `count > 0` from the head, `< 0` from the tail, `0` all
    pub fn lrem(&self, key: &str, count: i64, value: impl Into<Value>) -> Action {
        self.adaptor.action(Command::LRem {
            key: key.to_string(),
            count,
            value: value.into(),
        })
    }
}
