//! Native-currency operations: deposit credit, same-ledger transfer,
//! withdrawal voucher.

use primitive_types::U256;

use crate::address::Address;
use crate::deposit::parse_native_deposit;
use crate::error::{AssetKey, LedgerError};
use crate::registry::ApplicationAddressRegistry;
use crate::voucher::{withdraw_native_call, Voucher};
use crate::wallet::AssetLedger;

/// Credits a decoded native deposit to its sender.
pub fn deposit(ledger: &mut AssetLedger, payload: &[u8]) -> Result<(), LedgerError> {
    let record = parse_native_deposit(payload)?;

    let mut wallet = ledger.snapshot(&record.sender);
    wallet.native = wallet
        .native
        .checked_add(record.value)
        .ok_or(LedgerError::BalanceOverflow {
            owner: record.sender,
            asset: AssetKey::Native,
        })?;
    ledger.replace(record.sender, wallet);
    Ok(())
}

/// Moves `amount` of native currency from `from` to `to`.
///
/// Validates sufficiency before touching either wallet. A transfer to
/// oneself validates and then changes nothing.
pub fn transfer(
    ledger: &mut AssetLedger,
    from: Address,
    to: Address,
    amount: U256,
) -> Result<(), LedgerError> {
    let mut from_wallet = ledger.snapshot(&from);
    if from_wallet.native < amount {
        return Err(LedgerError::InsufficientBalance {
            owner: from,
            asset: AssetKey::Native,
            available: from_wallet.native,
            requested: amount,
        });
    }
    if from == to {
        return Ok(());
    }

    let mut to_wallet = ledger.snapshot(&to);
    to_wallet.native =
        to_wallet
            .native
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                owner: to,
                asset: AssetKey::Native,
            })?;
    from_wallet.native -= amount;

    ledger.replace(from, from_wallet);
    ledger.replace(to, to_wallet);
    Ok(())
}

/// Debits `amount` from `owner` and issues the voucher that pays it out
/// on the base layer.
///
/// The voucher is addressed to the application contract itself, which
/// holds the escrowed native funds.
pub fn withdraw(
    ledger: &mut AssetLedger,
    registry: &ApplicationAddressRegistry,
    owner: Address,
    amount: U256,
) -> Result<Voucher, LedgerError> {
    let application = registry.get_or_fail()?;

    let mut wallet = ledger.snapshot(&owner);
    if wallet.native < amount {
        return Err(LedgerError::InsufficientBalance {
            owner,
            asset: AssetKey::Native,
            available: wallet.native,
            requested: amount,
        });
    }
    wallet.native -= amount;
    ledger.replace(owner, wallet);

    Ok(Voucher::new(
        application,
        withdraw_native_call(&owner, &amount),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn ledger_with_native(owner: Address, amount: u64) -> AssetLedger {
        let mut ledger = AssetLedger::new();
        let mut wallet = ledger.snapshot(&owner);
        wallet.native = U256::from(amount);
        ledger.replace(owner, wallet);
        ledger
    }

    fn deposit_payload(sender: Address, value: u64) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(sender.as_bytes());
        let mut word = [0u8; 32];
        U256::from(value).to_big_endian(&mut word);
        p.extend_from_slice(&word);
        p
    }

    #[test]
    fn deposit_accumulates() {
        let mut ledger = AssetLedger::new();
        let sender = addr(0xAA);

        deposit(&mut ledger, &deposit_payload(sender, 100)).unwrap();
        deposit(&mut ledger, &deposit_payload(sender, 23)).unwrap();
        assert_eq!(ledger.native_balance(&sender), U256::from(123u64));
    }

    #[test]
    fn transfer_moves_exactly_the_amount() {
        let from = addr(0x01);
        let to = addr(0x02);
        let mut ledger = ledger_with_native(from, 1000);

        transfer(&mut ledger, from, to, U256::from(300u64)).unwrap();
        assert_eq!(ledger.native_balance(&from), U256::from(700u64));
        assert_eq!(ledger.native_balance(&to), U256::from(300u64));
    }

    #[test]
    fn transfer_insufficient_leaves_store_unchanged() {
        let from = addr(0x01);
        let to = addr(0x02);
        let mut ledger = ledger_with_native(from, 100);
        let before = ledger.clone();

        let err = transfer(&mut ledger, from, to, U256::from(200u64)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(ledger.native_balance(&from), before.native_balance(&from));
        assert_eq!(ledger.native_balance(&to), before.native_balance(&to));
    }

    #[test]
    fn self_transfer_validates_then_noops() {
        let owner = addr(0x01);
        let mut ledger = ledger_with_native(owner, 100);

        transfer(&mut ledger, owner, owner, U256::from(40u64)).unwrap();
        assert_eq!(ledger.native_balance(&owner), U256::from(100u64));

        assert!(transfer(&mut ledger, owner, owner, U256::from(200u64)).is_err());
    }

    #[test]
    fn withdraw_requires_relay() {
        let owner = addr(0x01);
        let mut ledger = ledger_with_native(owner, 100);
        let registry = ApplicationAddressRegistry::default();

        let err = withdraw(&mut ledger, &registry, owner, U256::one()).unwrap_err();
        assert!(matches!(err, LedgerError::RelayNotReceived));
        assert_eq!(ledger.native_balance(&owner), U256::from(100u64));
    }

    #[test]
    fn withdraw_debits_and_builds_voucher() {
        let owner = addr(0x01);
        let application = addr(0xD0);
        let mut ledger = ledger_with_native(owner, 123_456);
        let mut registry = ApplicationAddressRegistry::default();
        registry.set(application).unwrap();

        let voucher = withdraw(&mut ledger, &registry, owner, U256::one()).unwrap();
        assert_eq!(ledger.native_balance(&owner), U256::from(123_455u64));
        assert_eq!(voucher.destination, application);
        assert_eq!(voucher.payload, withdraw_native_call(&owner, &U256::one()));
        assert_eq!(voucher.value, None);
    }
}
