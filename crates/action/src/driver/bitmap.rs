use keyflow_core::{BitOperation, Command};

use super::family_driver;
use crate::action::Action;
use crate::adaptor::Adaptor;

/// Bitmap commands.
///
/// Offsets count bits from the most significant bit of the first byte.
#[derive(Debug, Clone)]
pub struct BitmapDriver {
    adaptor: Adaptor,
}

family_driver!(BitmapDriver);

impl BitmapDriver {
    /// SETBIT; evaluates to the previous bit
    pub fn setbit(&self, key: &str, offset: usize, bit: bool) -> Action {
        self.adaptor.action(Command::SetBit {
            key: key.to_string(),
            offset,
            bit,
        })
    }

    pub fn getbit(&self, key: &str, offset: usize) -> Action {
        self.adaptor.action(Command::GetBit {
            key: key.to_string(),
            offset,
        })
    }

    pub fn bitcount(&self, key: &str) -> Action {
        self.adaptor.action(Command::BitCount {
            key: key.to_string(),
        })
    }

    /// BITOP into `dest`; evaluates to the length of `dest` in bytes
    pub fn bitop(&self, op: BitOperation, dest: &str, keys: &[&str]) -> Action {
        self.adaptor.action(Command::BitOp {
            op,
            dest: dest.to_string(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        })
    }
}
