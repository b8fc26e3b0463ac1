//! The single privileged-caller slot guarding supply changes.

use crate::error::TokenError;
use serde::{Deserialize, Serialize};
use tcr_types::Address;

/// Holder of a privileged capability, changeable only by the current holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    holder: Address,
}

impl Authority {
    pub fn new(holder: Address) -> Self {
        Self { holder }
    }

    pub fn holder(&self) -> &Address {
        &self.holder
    }

    /// Fail with `NotOracle` unless `caller` holds the slot.
    pub fn ensure(&self, caller: &Address) -> Result<(), TokenError> {
        if *caller != self.holder {
            return Err(TokenError::NotOracle {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    /// Hand the slot to `new_holder`. Only the current holder may do this.
    pub fn reassign(&mut self, caller: &Address, new_holder: Address) -> Result<(), TokenError> {
        self.ensure(caller)?;
        self.holder = new_holder;
        Ok(())
    }
}
