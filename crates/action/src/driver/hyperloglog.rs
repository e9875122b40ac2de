use keyflow_core::Command;

use super::family_driver;
use crate::action::Action;
use crate::adaptor::Adaptor;

/// HyperLogLog commands.
#[derive(Debug, Clone)]
pub struct HyperLogLogDriver {
    adaptor: Adaptor,
}

family_driver!(HyperLogLogDriver);

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|i| i.to_string()).collect()
}

impl HyperLogLogDriver {
    /// PFADD; evaluates to whether the cardinality changed
    pub fn pfadd(&self, key: &str, elements: &[&str]) -> Action {
        self.adaptor.action(Command::PfAdd {
            key: key.to_string(),
            elements: owned(elements),
        })
    }

    pub fn pfcount(&self, key: &str) -> Action {
        self.adaptor.action(Command::PfCount {
            keys: vec![key.to_string()],
        })
    }

    /// PFMERGE `sources` into `dest`
    pub fn pfmerge(&self, dest: &str, sources: &[&str]) -> Action {
        self.adaptor.action(Command::PfMerge {
            dest: dest.to_string(),
            sources: owned(sources),
        })
    }
}
