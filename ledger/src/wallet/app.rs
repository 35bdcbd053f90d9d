//! # The Assembled Wallet App
//!
//! [`WalletApp`] owns the three moving parts (the [`AssetLedger`]
//! store, the [`ApplicationAddressRegistry`], and the
//! [`DepositDispatcher`]) and exposes the operation surface an
//! application actually programs against: feed advance requests in,
//! query balances, move value, mint withdrawal vouchers.
//!
//! Everything is per-instance. Build two apps with two configs and they
//! share nothing.

use primitive_types::U256;

use crate::address::Address;
use crate::config::PortalConfig;
use crate::dispatch::{AdvanceRequest, DepositDispatcher, DispatchOutcome};
use crate::error::LedgerError;
use crate::ops;
use crate::registry::ApplicationAddressRegistry;
use crate::voucher::Voucher;
use crate::wallet::ledger::AssetLedger;

/// The assembled ledger: store, registry, and dispatcher behind one API.
#[derive(Clone, Debug)]
pub struct WalletApp {
    ledger: AssetLedger,
    registry: ApplicationAddressRegistry,
    dispatcher: DepositDispatcher,
}

impl WalletApp {
    /// Builds an app against the default portal deployment.
    pub fn new() -> Self {
        Self::with_config(PortalConfig::default())
    }

    /// Builds an app against an explicit deployment config.
    pub fn with_config(config: PortalConfig) -> Self {
        Self {
            ledger: AssetLedger::new(),
            registry: ApplicationAddressRegistry::new(config.relay_policy),
            dispatcher: DepositDispatcher::new(&config),
        }
    }

    /// Read access to the underlying store.
    pub fn ledger(&self) -> &AssetLedger {
        &self.ledger
    }

    /// The relayed application address, if received.
    pub fn application_address(&self) -> Option<Address> {
        self.registry.get()
    }

    // -----------------------------------------------------------------------
    // Advance requests
    // -----------------------------------------------------------------------

    /// Routes one advance request through the deposit dispatcher.
    pub fn handle_advance(&mut self, request: &AdvanceRequest) -> DispatchOutcome {
        self.dispatcher
            .dispatch(&mut self.ledger, &mut self.registry, request)
    }

    // -----------------------------------------------------------------------
    // Balance queries
    // -----------------------------------------------------------------------

    /// Native balance of `owner`.
    pub fn native_balance(&self, owner: &Address) -> U256 {
        self.ledger.native_balance(owner)
    }

    /// Fungible balance of `owner` under `token`.
    pub fn fungible_balance(&self, token: &Address, owner: &Address) -> U256 {
        self.ledger.fungible_balance(token, owner)
    }

    /// Whether `owner` holds `token_id` of the non-fungible `token`.
    pub fn owns_non_fungible(
        &self,
        token: &Address,
        token_id: &U256,
        owner: &Address,
    ) -> bool {
        self.ledger.owns_non_fungible(token, token_id, owner)
    }

    /// Number of ids `owner` holds of the non-fungible `token`.
    pub fn non_fungible_count(&self, token: &Address, owner: &Address) -> usize {
        self.ledger.non_fungible_count(token, owner)
    }

    /// Semi-fungible balance of `owner` for one (token, id) position.
    pub fn semi_fungible_balance(
        &self,
        token: &Address,
        token_id: &U256,
        owner: &Address,
    ) -> U256 {
        self.ledger.semi_fungible_balance(token, token_id, owner)
    }

    /// Semi-fungible balances for parallel (token, token_id) pairs.
    pub fn semi_fungible_balances(
        &self,
        tokens: &[Address],
        token_ids: &[U256],
        owner: &Address,
    ) -> Result<Vec<U256>, LedgerError> {
        ops::semi_fungible_batch::balances(&self.ledger, tokens, token_ids, owner)
    }

    // -----------------------------------------------------------------------
    // Transfers
    // -----------------------------------------------------------------------

    /// Moves native currency between two owners.
    pub fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        ops::native::transfer(&mut self.ledger, from, to, amount)
    }

    /// Moves fungible tokens between two owners.
    pub fn transfer_fungible(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        ops::fungible::transfer(&mut self.ledger, token, from, to, amount)
    }

    /// Moves one non-fungible token between two owners.
    pub fn transfer_non_fungible(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<(), LedgerError> {
        ops::non_fungible::transfer(&mut self.ledger, token, from, to, token_id)
    }

    /// Moves quantity of one semi-fungible position between two owners.
    pub fn transfer_semi_fungible(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        token_id: U256,
        value: U256,
    ) -> Result<(), LedgerError> {
        ops::semi_fungible::transfer(&mut self.ledger, token, from, to, token_id, value)
    }

    /// Moves a batch of semi-fungible positions, all or nothing.
    pub fn transfer_semi_fungible_batch(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        token_ids: &[U256],
        values: &[U256],
    ) -> Result<(), LedgerError> {
        ops::semi_fungible_batch::transfer(
            &mut self.ledger,
            token,
            from,
            to,
            token_ids,
            values,
        )
    }

    // -----------------------------------------------------------------------
    // Withdrawals
    // -----------------------------------------------------------------------

    /// Debits native currency and issues the payout voucher.
    pub fn withdraw_native(
        &mut self,
        owner: Address,
        amount: U256,
    ) -> Result<Voucher, LedgerError> {
        ops::native::withdraw(&mut self.ledger, &self.registry, owner, amount)
    }

    /// Debits fungible tokens and issues the payout voucher.
    pub fn withdraw_fungible(
        &mut self,
        token: Address,
        owner: Address,
        amount: U256,
    ) -> Result<Voucher, LedgerError> {
        ops::fungible::withdraw(&mut self.ledger, &self.registry, token, owner, amount)
    }

    /// Removes one non-fungible token and issues the payout voucher.
    pub fn withdraw_non_fungible(
        &mut self,
        token: Address,
        owner: Address,
        token_id: U256,
    ) -> Result<Voucher, LedgerError> {
        ops::non_fungible::withdraw(&mut self.ledger, &self.registry, token, owner, token_id)
    }

    /// Debits one semi-fungible position and issues the payout voucher.
    pub fn withdraw_semi_fungible(
        &mut self,
        token: Address,
        owner: Address,
        token_id: U256,
        value: U256,
    ) -> Result<Voucher, LedgerError> {
        ops::semi_fungible::withdraw(
            &mut self.ledger,
            &self.registry,
            token,
            owner,
            token_id,
            value,
        )
    }

    /// Debits a batch of semi-fungible positions and issues the payout
    /// voucher, all or nothing.
    pub fn withdraw_semi_fungible_batch(
        &mut self,
        token: Address,
        owner: Address,
        token_ids: &[U256],
        values: &[U256],
    ) -> Result<Voucher, LedgerError> {
        ops::semi_fungible_batch::withdraw(
            &mut self.ledger,
            &self.registry,
            token,
            owner,
            token_ids,
            values,
        )
    }
}

impl Default for WalletApp {
    fn default() -> Self {
        Self::new()
    }
}
