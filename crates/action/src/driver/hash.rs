use keyflow_core::{Command, Value};

use super::family_driver;
use crate::action::Action;
use crate::adaptor::Adaptor;

/// Hash commands.
#[derive(Debug, Clone)]
pub struct HashDriver {
    adaptor: Adaptor,
}

family_driver!(HashDriver);

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

impl HashDriver {
    /// HSET of one field
    pub fn hset(&self, key: &str, field: &str, value: impl Into<Value>) -> Action {
        self.hset_many(key, vec![(field.to_string(), value.into())])
    }

    /// HSET of several fields at once; evaluates to the number of new fields
    pub fn hset_many(&self, key: &str, fields: Vec<(String, Value)>) -> Action {
        self.adaptor.action(Command::HSet {
            key: key.to_string(),
            fields,
        })
    }

    pub fn hget(&self, key: &str, field: &str) -> Action {
        self.adaptor.action(Command::HGet {
            key: key.to_string(),
            field: field.to_string(),
        })
    }

    pub fn hmget(&self, key: &str, fields: &[&str]) -> Action {
        self.adaptor.action(Command::HMGet {
            key: key.to_string(),
            fields: owned(fields),
        })
    }

    pub fn hdel(&self, key: &str, fields: &[&str]) -> Action {
        self.adaptor.action(Command::HDel {
            key: key.to_string(),
            fields: owned(fields),
        })
    }

    /// HGETALL; evaluates to an object
    pub fn hgetall(&self, key: &str) -> Action {
        self.adaptor.action(Command::HGetAll {
            key: key.to_string(),
        })
    }

    pub fn hexists(&self, key: &str, field: &str) -> Action {
        self.adaptor.action(Command::HExists {
            key: key.to_string(),
            field: field.to_string(),
        })
    }

    pub fn hkeys(&self, key: &str) -> Action {
        self.adaptor.action(Command::HKeys {
            key: key.to_string(),
        })
    }

    pub fn hvals(&self, key: &str) -> Action {
        self.adaptor.action(Command::HVals {
            key: key.to_string(),
        })
    }

    pub fn hlen(&self, key: &str) -> Action {
        self.adaptor.action(Command::HLen {
            key: key.to_string(),
        })
    }
}
