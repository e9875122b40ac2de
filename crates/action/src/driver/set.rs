use keyflow_core::Command;

use super::family_driver;
use crate::action::Action;
use crate::adaptor::Adaptor;

/// Set commands.
#[derive(Debug, Clone)]
pub struct SetDriver {
    adaptor: Adaptor,
}

family_driver!(SetDriver);

fn owned(members: &[&str]) -> Vec<String> {
    members.iter().map(|m| m.to_string()).collect()
}

impl SetDriver {
    /// SADD; evaluates to the number of members added
    pub fn sadd(&self, key: &str, members: &[&str]) -> Action {
        self.adaptor.action(Command::SAdd {
            key: key.to_string(),
            members: owned(members),
        })
    }

    pub fn srem(&self, key: &str, members: &[&str]) -> Action {
        self.adaptor.action(Command::SRem {
            key: key.to_string(),
            members: owned(members),
        })
    }

    /// SMEMBERS, in lexicographic order
    pub fn smembers(&self, key: &str) -> Action {
        self.adaptor.action(Command::SMembers {
            key: key.to_string(),
        })
    }

    pub fn sismember(&self, key: &str, member: &str) -> Action {
        self.adaptor.action(Command::SIsMember {
            key: key.to_string(),
            member: member.to_string(),
        })
    }

    pub fn scard(&self, key: &str) -> Action {
        self.adaptor.action(Command::SCard {
            key: key.to_string(),
        })
    }
}
