//! # Ledger Error Taxonomy
//!
//! Every fallible ledger operation returns a [`LedgerError`]. The decoder
//! has its own [`DecodeError`](crate::deposit::DecodeError), folded in
//! transparently, so callers match on one enum.
//!
//! Nothing here is recovered inside the ledger itself. The single
//! conversion point is the deposit dispatcher, which turns any error
//! raised during a deposit's credit step into a rejected advance request.
//! Errors from transfers and withdrawals invoked directly by application
//! code surface to the caller uncaught.

use std::fmt;

use primitive_types::U256;
use thiserror::Error;

use crate::address::Address;
use crate::deposit::DecodeError;

// ---------------------------------------------------------------------------
// AssetKey
// ---------------------------------------------------------------------------

/// Identifies the exact asset a failed operation was touching.
///
/// Carried inside error variants so a rejected debit names not just the
/// owner but the token contract and, where it applies, the token id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKey {
    /// The rollup's native currency.
    Native,
    /// A fungible token balance under `token`.
    Fungible(Address),
    /// One non-fungible token: contract and token id.
    NonFungible(Address, U256),
    /// One semi-fungible position: contract and token id.
    SemiFungible(Address, U256),
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKey::Native => write!(f, "native"),
            AssetKey::Fungible(token) => write!(f, "fungible {token}"),
            AssetKey::NonFungible(token, id) => {
                write!(f, "non-fungible {token} id {id}")
            }
            AssetKey::SemiFungible(token, id) => {
                write!(f, "semi-fungible {token} id {id}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LedgerError
// ---------------------------------------------------------------------------

/// Errors raised by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A deposit payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A debit exceeds the owner's holdings.
    ///
    /// For non-fungible assets, `available` is `1` when the owner holds
    /// the token id and `0` when it does not, with `requested` fixed at
    /// `1`. Ownership is binary.
    #[error("insufficient balance: {owner} holds {available} of {asset}, requested {requested}")]
    InsufficientBalance {
        /// Owner whose balance was checked.
        owner: Address,
        /// The asset being debited.
        asset: AssetKey,
        /// Balance at validation time.
        available: U256,
        /// Amount the debit asked for.
        requested: U256,
    },

    /// A credit would push a balance past `U256::MAX`.
    ///
    /// Clamping would silently mint or destroy value, so the operation
    /// fails instead.
    #[error("balance overflow crediting {asset} to {owner}")]
    BalanceOverflow {
        /// Owner being credited.
        owner: Address,
        /// The asset being credited.
        asset: AssetKey,
    },

    /// Parallel batch arrays have different lengths.
    #[error("{first} and {second} must have the same length")]
    ArrayLengthMismatch {
        /// Name of the first array argument.
        first: &'static str,
        /// Name of the second array argument.
        second: &'static str,
    },

    /// A batch operation was given empty arrays.
    #[error("{name} must not be empty")]
    EmptyArray {
        /// Name of the offending argument.
        name: &'static str,
    },

    /// A signed amount below zero reached the ledger.
    ///
    /// Amounts are `U256` end to end, so this cannot be constructed from
    /// safe code; the variant documents the contract for bindings whose
    /// amount types are signed.
    #[error("negative amount")]
    NegativeAmount,

    /// A withdrawal was attempted before the relay delivered the
    /// application's own address.
    #[error("application has not received its address from the relay")]
    RelayNotReceived,

    /// A second relay message arrived while the registry is configured to
    /// treat repeats as protocol violations.
    #[error("application address already set to {current}")]
    RelayAlreadySet {
        /// The address the registry already holds.
        current: Address,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[test]
    fn insufficient_balance_message_names_the_asset() {
        let err = LedgerError::InsufficientBalance {
            owner: addr(0x11),
            asset: AssetKey::Fungible(addr(0x22)),
            available: U256::from(5u64),
            requested: U256::from(9u64),
        };
        let msg = err.to_string();
        assert!(msg.contains("holds 5"));
        assert!(msg.contains("requested 9"));
        assert!(msg.contains("fungible"));
    }

    #[test]
    fn asset_key_display_variants() {
        assert_eq!(AssetKey::Native.to_string(), "native");
        let nft = AssetKey::NonFungible(addr(0x33), U256::from(7u64));
        assert!(nft.to_string().ends_with("id 7"));
    }

    #[test]
    fn negative_amount_contract_message() {
        // Unreachable through the U256 API, still part of the caller
        // contract for signed bindings.
        assert_eq!(LedgerError::NegativeAmount.to_string(), "negative amount");
    }

    #[test]
    fn decode_error_folds_in_transparently() {
        let decode = DecodeError::PayloadTooShort {
            expected: 52,
            got: 4,
        };
        let err = LedgerError::from(decode);
        assert!(err.to_string().contains("52"));
    }
}
