//! Non-fungible-token operations. Ownership is binary per token id:
//! the ledger tracks membership in a per-token set, not a quantity.

use primitive_types::U256;

use crate::address::Address;
use crate::deposit::parse_non_fungible_deposit;
use crate::error::{AssetKey, LedgerError};
use crate::registry::ApplicationAddressRegistry;
use crate::voucher::{non_fungible_safe_transfer_call, Voucher};
use crate::wallet::AssetLedger;

fn not_owned(owner: Address, token: Address, token_id: U256) -> LedgerError {
    LedgerError::InsufficientBalance {
        owner,
        asset: AssetKey::NonFungible(token, token_id),
        available: U256::zero(),
        requested: U256::one(),
    }
}

/// Records a decoded non-fungible deposit in the sender's ownership set.
pub fn deposit(ledger: &mut AssetLedger, payload: &[u8]) -> Result<(), LedgerError> {
    let record = parse_non_fungible_deposit(payload)?;

    let mut wallet = ledger.snapshot(&record.sender);
    wallet
        .non_fungible
        .entry(record.token)
        .or_default()
        .insert(record.token_id);
    ledger.replace(record.sender, wallet);
    Ok(())
}

/// Moves ownership of `token_id` from `from` to `to`.
pub fn transfer(
    ledger: &mut AssetLedger,
    token: Address,
    from: Address,
    to: Address,
    token_id: U256,
) -> Result<(), LedgerError> {
    let mut from_wallet = ledger.snapshot(&from);
    if !from_wallet.owns_non_fungible(&token, &token_id) {
        return Err(not_owned(from, token, token_id));
    }
    if from == to {
        return Ok(());
    }

    let mut to_wallet = ledger.snapshot(&to);
    if let Some(set) = from_wallet.non_fungible.get_mut(&token) {
        set.remove(&token_id);
    }
    to_wallet
        .non_fungible
        .entry(token)
        .or_default()
        .insert(token_id);

    ledger.replace(from, from_wallet);
    ledger.replace(to, to_wallet);
    Ok(())
}

/// Removes `token_id` from `owner` and issues a voucher calling the
/// token contract's safe transfer, application → owner.
pub fn withdraw(
    ledger: &mut AssetLedger,
    registry: &ApplicationAddressRegistry,
    token: Address,
    owner: Address,
    token_id: U256,
) -> Result<Voucher, LedgerError> {
    let application = registry.get_or_fail()?;

    let mut wallet = ledger.snapshot(&owner);
    if !wallet.owns_non_fungible(&token, &token_id) {
        return Err(not_owned(owner, token, token_id));
    }
    if let Some(set) = wallet.non_fungible.get_mut(&token) {
        set.remove(&token_id);
    }
    ledger.replace(owner, wallet);

    Ok(Voucher::new(
        token,
        non_fungible_safe_transfer_call(&application, &owner, &token_id),
    ))
}
