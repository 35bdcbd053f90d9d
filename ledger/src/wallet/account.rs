//! # Per-Owner Wallet
//!
//! A [`Wallet`] is one owner's complete position: a native balance, a
//! balance per fungible token, an ownership set per non-fungible token,
//! and a quantity per (token, id) pair for semi-fungible tokens. Absent
//! entries mean zero everywhere: a freshly created wallet and a wallet
//! that was drained to zero are indistinguishable through the accessors.
//!
//! Inner collections are ordered (`BTreeSet`/`BTreeMap`) so iteration
//! and serialization are deterministic; a replayed ledger must produce
//! bit-identical outputs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;

/// One owner's holdings across all asset kinds.
///
/// Wallets are created lazily on first reference and never deleted.
/// Fields are crate-private; operations in [`crate::ops`] mutate them
/// through snapshots, everyone else reads through the accessors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Native-currency balance.
    pub(crate) native: U256,
    /// Fungible balances keyed by token contract.
    pub(crate) fungible: HashMap<Address, U256>,
    /// Non-fungible ownership sets keyed by token contract.
    pub(crate) non_fungible: HashMap<Address, BTreeSet<U256>>,
    /// Semi-fungible quantities keyed by token contract, then token id.
    pub(crate) semi_fungible: HashMap<Address, BTreeMap<U256, U256>>,
}

impl Wallet {
    /// Creates an empty wallet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Native-currency balance.
    pub fn native(&self) -> U256 {
        self.native
    }

    /// Balance of one fungible token; zero when the token was never held.
    pub fn fungible_balance(&self, token: &Address) -> U256 {
        self.fungible.get(token).copied().unwrap_or_default()
    }

    /// Whether this wallet holds `token_id` of the non-fungible `token`.
    pub fn owns_non_fungible(&self, token: &Address, token_id: &U256) -> bool {
        self.non_fungible
            .get(token)
            .is_some_and(|set| set.contains(token_id))
    }

    /// Number of ids held for the non-fungible `token`.
    pub fn non_fungible_count(&self, token: &Address) -> usize {
        self.non_fungible.get(token).map_or(0, BTreeSet::len)
    }

    /// Quantity held of one semi-fungible (token, id) position.
    pub fn semi_fungible_balance(&self, token: &Address, token_id: &U256) -> U256 {
        self.semi_fungible
            .get(token)
            .and_then(|ids| ids.get(token_id))
            .copied()
            .unwrap_or_default()
    }

    /// Whether every balance and set in this wallet is zero/empty.
    pub fn is_empty(&self) -> bool {
        self.native.is_zero()
            && self.fungible.values().all(U256::is_zero)
            && self.non_fungible.values().all(BTreeSet::is_empty)
            && self
                .semi_fungible
                .values()
                .all(|ids| ids.values().all(U256::is_zero))
    }
}
