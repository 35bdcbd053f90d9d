//! # Ledger Configuration
//!
//! The six addresses the dispatcher routes on (five asset portals and
//! the address relay) are deployment facts, not logic, so they arrive
//! here as configuration. The defaults are the deterministic deployment
//! addresses of the reference portal contracts, identical on every
//! supported chain; a deployment against different portals constructs a
//! [`PortalConfig`] of its own.
//!
//! Two behavioral knobs ride along: which historical fungible-deposit
//! payload layout the portal emits, and what a repeated relay message
//! does to the application address.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::deposit::FungibleDepositLayout;

// ---------------------------------------------------------------------------
// Default portal deployment
// ---------------------------------------------------------------------------

/// Native-currency portal: `0xFfdbe43d4c855BF7e0f105c400A50857f53AB044`.
pub const DEFAULT_NATIVE_PORTAL: Address = Address::new([
    0xff, 0xdb, 0xe4, 0x3d, 0x4c, 0x85, 0x5b, 0xf7, 0xe0, 0xf1, 0x05, 0xc4, 0x00, 0xa5,
    0x08, 0x57, 0xf5, 0x3a, 0xb0, 0x44,
]);

/// Fungible-token portal: `0x9C21AEb2093C32DDbC53eEF24B873BDCd1aDa1DB`.
pub const DEFAULT_FUNGIBLE_PORTAL: Address = Address::new([
    0x9c, 0x21, 0xae, 0xb2, 0x09, 0x3c, 0x32, 0xdd, 0xbc, 0x53, 0xee, 0xf2, 0x4b, 0x87,
    0x3b, 0xdc, 0xd1, 0xad, 0xa1, 0xdb,
]);

/// Non-fungible-token portal: `0x237F8DD094C0e47f4236f12b4Fa01d6Dae89fb87`.
pub const DEFAULT_NON_FUNGIBLE_PORTAL: Address = Address::new([
    0x23, 0x7f, 0x8d, 0xd0, 0x94, 0xc0, 0xe4, 0x7f, 0x42, 0x36, 0xf1, 0x2b, 0x4f, 0xa0,
    0x1d, 0x6d, 0xae, 0x89, 0xfb, 0x87,
]);

/// Single-id semi-fungible portal: `0x7CFB0193Ca87eB6e48056885E026552c3A941FC4`.
pub const DEFAULT_SEMI_FUNGIBLE_PORTAL: Address = Address::new([
    0x7c, 0xfb, 0x01, 0x93, 0xca, 0x87, 0xeb, 0x6e, 0x48, 0x05, 0x68, 0x85, 0xe0, 0x26,
    0x55, 0x2c, 0x3a, 0x94, 0x1f, 0xc4,
]);

/// Batch semi-fungible portal: `0xedB53860A6B52bbb7561Ad596416ee9965B055Aa`.
pub const DEFAULT_SEMI_FUNGIBLE_BATCH_PORTAL: Address = Address::new([
    0xed, 0xb5, 0x38, 0x60, 0xa6, 0xb5, 0x2b, 0xbb, 0x75, 0x61, 0xad, 0x59, 0x64, 0x16,
    0xee, 0x99, 0x65, 0xb0, 0x55, 0xaa,
]);

/// Application address relay: `0xF5DE34d6BbC0446E2a45719E718efEbaaE179daE`.
pub const DEFAULT_ADDRESS_RELAY: Address = Address::new([
    0xf5, 0xde, 0x34, 0xd6, 0xbb, 0xc0, 0x44, 0x6e, 0x2a, 0x45, 0x71, 0x9e, 0x71, 0x8e,
    0xfe, 0xba, 0xae, 0x17, 0x9d, 0xae,
]);

// ---------------------------------------------------------------------------
// Relay policy
// ---------------------------------------------------------------------------

/// What a second relay message does to an already-set application address.
///
/// The portal protocol does not pin this down, so it is a deployment
/// decision rather than a fixed contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelayPolicy {
    /// A later relay replaces the stored address.
    #[default]
    Overwrite,
    /// A later relay is a protocol violation; the advance request carrying
    /// it is rejected and the stored address is kept.
    RejectRepeated,
}

// ---------------------------------------------------------------------------
// PortalConfig
// ---------------------------------------------------------------------------

/// Everything the ledger needs to know about its deployment environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Declared sender of native-currency deposits.
    pub native_portal: Address,
    /// Declared sender of fungible-token deposits.
    pub fungible_portal: Address,
    /// Declared sender of non-fungible-token deposits.
    pub non_fungible_portal: Address,
    /// Declared sender of single-id semi-fungible deposits.
    pub semi_fungible_portal: Address,
    /// Declared sender of batch semi-fungible deposits.
    pub semi_fungible_batch_portal: Address,
    /// Declared sender of the application-address relay message.
    pub address_relay: Address,
    /// Which fungible-deposit payload layout the portal emits.
    pub fungible_layout: FungibleDepositLayout,
    /// Behavior on repeated relay messages.
    pub relay_policy: RelayPolicy,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            native_portal: DEFAULT_NATIVE_PORTAL,
            fungible_portal: DEFAULT_FUNGIBLE_PORTAL,
            non_fungible_portal: DEFAULT_NON_FUNGIBLE_PORTAL,
            semi_fungible_portal: DEFAULT_SEMI_FUNGIBLE_PORTAL,
            semi_fungible_batch_portal: DEFAULT_SEMI_FUNGIBLE_BATCH_PORTAL,
            address_relay: DEFAULT_ADDRESS_RELAY,
            fungible_layout: FungibleDepositLayout::default(),
            relay_policy: RelayPolicy::default(),
        }
    }
}
