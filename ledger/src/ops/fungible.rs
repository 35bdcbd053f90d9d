//! Fungible-token operations.
//!
//! The deposit path carries the portal's success flag: a failed
//! base-layer transfer still produces a notification, which the ledger
//! accepts without crediting anything. The dispatcher reports such an
//! advance request as accepted, since the notification itself was valid.

use primitive_types::U256;

use crate::address::Address;
use crate::deposit::{parse_fungible_deposit, FungibleDepositLayout};
use crate::error::{AssetKey, LedgerError};
use crate::registry::ApplicationAddressRegistry;
use crate::voucher::{fungible_transfer_call, Voucher};
use crate::wallet::AssetLedger;

/// Credits a decoded fungible deposit to its sender.
///
/// A record with `success == false` decodes fine and credits nothing.
pub fn deposit(
    ledger: &mut AssetLedger,
    payload: &[u8],
    layout: FungibleDepositLayout,
) -> Result<(), LedgerError> {
    let record = parse_fungible_deposit(payload, layout)?;
    if !record.success {
        return Ok(());
    }

    let mut wallet = ledger.snapshot(&record.sender);
    let balance = wallet.fungible_balance(&record.token);
    let credited = balance
        .checked_add(record.amount)
        .ok_or(LedgerError::BalanceOverflow {
            owner: record.sender,
            asset: AssetKey::Fungible(record.token),
        })?;
    wallet.fungible.insert(record.token, credited);
    ledger.replace(record.sender, wallet);
    Ok(())
}

/// Moves `amount` of `token` from `from` to `to`.
pub fn transfer(
    ledger: &mut AssetLedger,
    token: Address,
    from: Address,
    to: Address,
    amount: U256,
) -> Result<(), LedgerError> {
    let mut from_wallet = ledger.snapshot(&from);
    let available = from_wallet.fungible_balance(&token);
    if available < amount {
        return Err(LedgerError::InsufficientBalance {
            owner: from,
            asset: AssetKey::Fungible(token),
            available,
            requested: amount,
        });
    }
    if from == to {
        return Ok(());
    }

    let mut to_wallet = ledger.snapshot(&to);
    let credited = to_wallet
        .fungible_balance(&token)
        .checked_add(amount)
        .ok_or(LedgerError::BalanceOverflow {
            owner: to,
            asset: AssetKey::Fungible(token),
        })?;
    from_wallet.fungible.insert(token, available - amount);
    to_wallet.fungible.insert(token, credited);

    ledger.replace(from, from_wallet);
    ledger.replace(to, to_wallet);
    Ok(())
}

/// Debits `amount` of `token` from `owner` and issues a voucher calling
/// the token contract's standard transfer.
pub fn withdraw(
    ledger: &mut AssetLedger,
    registry: &ApplicationAddressRegistry,
    token: Address,
    owner: Address,
    amount: U256,
) -> Result<Voucher, LedgerError> {
    registry.get_or_fail()?;

    let mut wallet = ledger.snapshot(&owner);
    let available = wallet.fungible_balance(&token);
    if available < amount {
        return Err(LedgerError::InsufficientBalance {
            owner,
            asset: AssetKey::Fungible(token),
            available,
            requested: amount,
        });
    }
    wallet.fungible.insert(token, available - amount);
    ledger.replace(owner, wallet);

    Ok(Voucher::new(token, fungible_transfer_call(&owner, &amount)))
}
