//! Single-id semi-fungible operations: a quantity per (token, id) pair.

use primitive_types::U256;

use crate::address::Address;
use crate::deposit::parse_semi_fungible_single_deposit;
use crate::error::{AssetKey, LedgerError};
use crate::registry::ApplicationAddressRegistry;
use crate::voucher::{semi_fungible_safe_transfer_call, Voucher};
use crate::wallet::AssetLedger;

/// Credits a decoded single-id semi-fungible deposit to its sender.
pub fn deposit(ledger: &mut AssetLedger, payload: &[u8]) -> Result<(), LedgerError> {
    let record = parse_semi_fungible_single_deposit(payload)?;

    let mut wallet = ledger.snapshot(&record.sender);
    let balance = wallet.semi_fungible_balance(&record.token, &record.token_id);
    let credited = balance
        .checked_add(record.value)
        .ok_or(LedgerError::BalanceOverflow {
            owner: record.sender,
            asset: AssetKey::SemiFungible(record.token, record.token_id),
        })?;
    wallet
        .semi_fungible
        .entry(record.token)
        .or_default()
        .insert(record.token_id, credited);
    ledger.replace(record.sender, wallet);
    Ok(())
}

/// Moves `value` of one (token, id) position from `from` to `to`.
pub fn transfer(
    ledger: &mut AssetLedger,
    token: Address,
    from: Address,
    to: Address,
    token_id: U256,
    value: U256,
) -> Result<(), LedgerError> {
    let mut from_wallet = ledger.snapshot(&from);
    let available = from_wallet.semi_fungible_balance(&token, &token_id);
    if available < value {
        return Err(LedgerError::InsufficientBalance {
            owner: from,
            asset: AssetKey::SemiFungible(token, token_id),
            available,
            requested: value,
        });
    }
    if from == to {
        return Ok(());
    }

    let mut to_wallet = ledger.snapshot(&to);
    let credited = to_wallet
        .semi_fungible_balance(&token, &token_id)
        .checked_add(value)
        .ok_or(LedgerError::BalanceOverflow {
            owner: to,
            asset: AssetKey::SemiFungible(token, token_id),
        })?;
    from_wallet
        .semi_fungible
        .entry(token)
        .or_default()
        .insert(token_id, available - value);
    to_wallet
        .semi_fungible
        .entry(token)
        .or_default()
        .insert(token_id, credited);

    ledger.replace(from, from_wallet);
    ledger.replace(to, to_wallet);
    Ok(())
}

/// Debits `value` of one (token, id) position from `owner` and issues a
/// voucher calling the token contract's safe transfer, application →
/// owner, with empty extra data.
pub fn withdraw(
    ledger: &mut AssetLedger,
    registry: &ApplicationAddressRegistry,
    token: Address,
    owner: Address,
    token_id: U256,
    value: U256,
) -> Result<Voucher, LedgerError> {
    let application = registry.get_or_fail()?;

    let mut wallet = ledger.snapshot(&owner);
    let available = wallet.semi_fungible_balance(&token, &token_id);
    if available < value {
        return Err(LedgerError::InsufficientBalance {
            owner,
            asset: AssetKey::SemiFungible(token, token_id),
            available,
            requested: value,
        });
    }
    wallet
        .semi_fungible
        .entry(token)
        .or_default()
        .insert(token_id, available - value);
    ledger.replace(owner, wallet);

    Ok(Voucher::new(
        token,
        semi_fungible_safe_transfer_call(&application, &owner, &token_id, &value),
    ))
}
