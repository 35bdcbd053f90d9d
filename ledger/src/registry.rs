//! # Application Address Registry
//!
//! A rollup application does not know its own base-layer address until
//! the relay contract sends it in, once, as a special deposit. Until
//! then no withdrawal voucher can be built: the native voucher is
//! addressed *to* the application contract, and the token vouchers pass
//! the application address as the transfer source.
//!
//! The registry holds that single optional address and the configured
//! policy for repeated relay messages.

use tracing::{info, warn};

use crate::address::Address;
use crate::config::RelayPolicy;
use crate::error::LedgerError;

/// Holder of the relayed application address.
#[derive(Clone, Debug, Default)]
pub struct ApplicationAddressRegistry {
    address: Option<Address>,
    policy: RelayPolicy,
}

impl ApplicationAddressRegistry {
    /// Creates an empty registry with the given repeat policy.
    pub fn new(policy: RelayPolicy) -> Self {
        Self {
            address: None,
            policy,
        }
    }

    /// Records the relayed application address.
    ///
    /// Under [`RelayPolicy::Overwrite`] a repeat replaces the stored
    /// value. Under [`RelayPolicy::RejectRepeated`] a repeat fails with
    /// [`LedgerError::RelayAlreadySet`] and the stored value is kept.
    pub fn set(&mut self, address: Address) -> Result<(), LedgerError> {
        if let Some(current) = self.address {
            match self.policy {
                RelayPolicy::Overwrite => {
                    warn!(old = %current, new = %address, "application address overwritten by repeated relay");
                }
                RelayPolicy::RejectRepeated => {
                    return Err(LedgerError::RelayAlreadySet { current });
                }
            }
        } else {
            info!(address = %address, "application address received from relay");
        }
        self.address = Some(address);
        Ok(())
    }

    /// The stored address, if the relay has delivered one.
    pub fn get(&self) -> Option<Address> {
        self.address
    }

    /// The stored address, or [`LedgerError::RelayNotReceived`].
    ///
    /// The withdrawal path calls this before touching any balance, so a
    /// premature withdrawal fails with no state change.
    pub fn get_or_fail(&self) -> Result<Address, LedgerError> {
        self.address.ok_or(LedgerError::RelayNotReceived)
    }
}
