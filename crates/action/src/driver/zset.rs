use keyflow_core::Command;

use super::family_driver;
use crate::action::Action;
use crate::adaptor::Adaptor;

/// Sorted set commands.
#[derive(Debug, Clone)]
pub struct SortedSetDriver {
    adaptor: Adaptor,
}

family_driver!(SortedSetDriver);

impl SortedSetDriver {
    /// ZADD of `(score, member)` pairs; evaluates to the number added
    pub fn zadd(&self, key: &str, members: Vec<(f64, String)>) -> Action {
        self.adaptor.action(Command::ZAdd {
            key: key.to_string(),
            members,
        })
    }

    pub fn zrem(&self, key: &str, members: &[&str]) -> Action {
        self.adaptor.action(Command::ZRem {
            key: key.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        })
    }

    pub fn zscore(&self, key: &str, member: &str) -> Action {
        self.adaptor.action(Command::ZScore {
            key: key.to_string(),
            member: member.to_string(),
        })
    }

    /// ZRANGE by rank, lowest score first
    pub fn zrange(&self, key: &str, start: i64, stop: i64, with_scores: bool) -> Action {
        self.adaptor.action(Command::ZRange {
            key: key.to_string(),
            start,
            stop,
            with_scores,
        })
    }

    /// ZREVRANGE by rank, highest score first
    pub fn zrevrange(&self, key: &str, start: i64, stop: i64, with_scores: bool) -> Action {
        self.adaptor.action(Command::ZRevRange {
            key: key.to_string(),
            start,
            stop,
            with_scores,
        })
    }

    /// ZINCRBY; evaluates to the new score
    pub fn zincrby(&self, key: &str, delta: f64, member: &str) -> Action {
        self.adaptor.action(Command::ZIncrBy {
            key: key.to_string(),
            delta,
            member: member.to_string(),
        })
    }

    pub fn zrank(&self, key: &str, member: &str) -> Action {
        self.adaptor.action(Command::ZRank {
            key: key.to_string(),
            member: member.to_string(),
        })
    }

    pub fn zcard(&self, key: &str) -> Action {
        self.adaptor.action(Command::ZCard {
            key: key.to_string(),
        })
    }
}
