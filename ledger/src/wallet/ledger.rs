//! # The Asset Ledger Store
//!
//! [`AssetLedger`] owns every wallet, keyed by canonical [`Address`].
//! It knows nothing about deposits, portals, or vouchers. It is the
//! storage seam the operation modules mutate through and everything
//! else queries through.
//!
//! Queries are pure: asking about an owner the ledger has never seen
//! answers zero/false and materializes nothing.

use std::collections::HashMap;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::wallet::account::Wallet;

/// Owner-keyed wallet store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssetLedger {
    wallets: HashMap<Address, Wallet>,
}

impl AssetLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The wallet for `owner`, materializing an empty one on first access.
    ///
    /// Never fails; a zero-valued wallet is a valid wallet.
    pub fn get_or_create(&mut self, owner: Address) -> &mut Wallet {
        self.wallets.entry(owner).or_default()
    }

    /// The stored wallet for `owner`, if one has been materialized.
    pub fn wallet(&self, owner: &Address) -> Option<&Wallet> {
        self.wallets.get(owner)
    }

    /// A working copy of `owner`'s wallet (empty if never materialized).
    ///
    /// Operations validate and mutate the copy, then land it with
    /// [`replace`](Self::replace). Nothing is observable in between.
    pub fn snapshot(&self, owner: &Address) -> Wallet {
        self.wallets.get(owner).cloned().unwrap_or_default()
    }

    /// Overwrites `owner`'s wallet wholesale.
    ///
    /// Idempotent; this is how every multi-field mutation lands.
    pub fn replace(&mut self, owner: Address, wallet: Wallet) {
        self.wallets.insert(owner, wallet);
    }

    /// Number of materialized wallets.
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Whether no wallet has been materialized yet.
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    // -----------------------------------------------------------------------
    // Pure balance queries
    // -----------------------------------------------------------------------

    /// Native balance of `owner`; zero for unknown owners.
    pub fn native_balance(&self, owner: &Address) -> U256 {
        self.wallets.get(owner).map_or_else(U256::zero, Wallet::native)
    }

    /// Fungible balance of `owner` under `token`; zero for unknown owners.
    pub fn fungible_balance(&self, token: &Address, owner: &Address) -> U256 {
        self.wallets
            .get(owner)
            .map_or_else(U256::zero, |w| w.fungible_balance(token))
    }

    /// Whether `owner` holds `token_id` of the non-fungible `token`.
    pub fn owns_non_fungible(
        &self,
        token: &Address,
        token_id: &U256,
        owner: &Address,
    ) -> bool {
        self.wallets
            .get(owner)
            .is_some_and(|w| w.owns_non_fungible(token, token_id))
    }

    /// Number of ids `owner` holds of the non-fungible `token`.
    pub fn non_fungible_count(&self, token: &Address, owner: &Address) -> usize {
        self.wallets
            .get(owner)
            .map_or(0, |w| w.non_fungible_count(token))
    }

    /// Semi-fungible balance of `owner` for one (token, id) position.
    pub fn semi_fungible_balance(
        &self,
        token: &Address,
        token_id: &U256,
        owner: &Address,
    ) -> U256 {
        self.wallets
            .get(owner)
            .map_or_else(U256::zero, |w| w.semi_fungible_balance(token, token_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[test]
    fn queries_on_unknown_owner_answer_zero_without_materializing() {
        let ledger = AssetLedger::new();
        let owner = addr(0xAA);
        let token = addr(0x11);

        assert!(ledger.native_balance(&owner).is_zero());
        assert!(ledger.fungible_balance(&token, &owner).is_zero());
        assert!(!ledger.owns_non_fungible(&token, &U256::one(), &owner));
        assert!(ledger
            .semi_fungible_balance(&token, &U256::one(), &owner)
            .is_zero());
        assert!(ledger.is_empty());
    }

    #[test]
    fn get_or_create_materializes_once() {
        let mut ledger = AssetLedger::new();
        let owner = addr(0xAA);

        ledger.get_or_create(owner);
        assert_eq!(ledger.len(), 1);
        ledger.get_or_create(owner);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.wallet(&owner).is_some());
    }

    #[test]
    fn snapshot_then_replace_lands_the_mutation() {
        let mut ledger = AssetLedger::new();
        let owner = addr(0xAA);

        let mut copy = ledger.snapshot(&owner);
        copy.native = U256::from(42u64);
        // Until replace, the store is untouched.
        assert!(ledger.native_balance(&owner).is_zero());

        ledger.replace(owner, copy);
        assert_eq!(ledger.native_balance(&owner), U256::from(42u64));
    }

    #[test]
    fn replace_is_idempotent() {
        let mut ledger = AssetLedger::new();
        let owner = addr(0xAA);

        let mut copy = ledger.snapshot(&owner);
        copy.native = U256::from(7u64);
        ledger.replace(owner, copy.clone());
        ledger.replace(owner, copy);
        assert_eq!(ledger.native_balance(&owner), U256::from(7u64));
        assert_eq!(ledger.len(), 1);
    }
}
