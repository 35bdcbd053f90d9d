//! The relay deposit: no value, just the application's own base-layer
//! address, delivered once so withdrawal vouchers have somewhere to
//! point.

use crate::deposit::parse_relay_payload;
use crate::error::LedgerError;
use crate::registry::ApplicationAddressRegistry;

/// Decodes the relayed application address and stores it.
///
/// Whether a repeat overwrites or fails is the registry's configured
/// [`RelayPolicy`](crate::config::RelayPolicy).
pub fn handle(
    registry: &mut ApplicationAddressRegistry,
    payload: &[u8],
) -> Result<(), LedgerError> {
    let address = parse_relay_payload(payload)?;
    registry.set(address)
}
