//! Type-agnostic key operations.

use keyflow_core::Command;

use super::family_driver;
use crate::action::Action;
use crate::adaptor::Adaptor;

/// Generic key driver; adds multi-key forms of DEL and EXISTS.
#[derive(Debug, Clone)]
pub struct KeyDriver {
    adaptor: Adaptor,
}

family_driver!(KeyDriver);

impl KeyDriver {
    /// Remove every key in `keys`; evaluates to the number removed.
    pub fn delete_many<I, S>(&self, keys: I) -> Action
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.adaptor.action(Command::Del {
            keys: keys.into_iter().map(Into::into).collect(),
        })
    }

    /// Count how many of `keys` exist. Repeated keys count repeatedly.
    pub fn exists_many<I, S>(&self, keys: I) -> Action
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.adaptor.action(Command::Exists {
            keys: keys.into_iter().map(Into::into).collect(),
        })
    }
}
