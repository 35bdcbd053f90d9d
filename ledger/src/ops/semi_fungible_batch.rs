//! Batch semi-fungible operations: parallel (token_id, value) arrays
//! moved as one all-or-nothing unit.
//!
//! Every element is validated against the working snapshot before any
//! `replace` lands, so a single short position anywhere in the batch
//! aborts the whole thing with the store untouched.

use primitive_types::U256;

use crate::address::Address;
use crate::deposit::parse_semi_fungible_batch_deposit;
use crate::error::{AssetKey, LedgerError};
use crate::ops::check_batch_shape;
use crate::registry::ApplicationAddressRegistry;
use crate::voucher::{semi_fungible_safe_batch_transfer_call, Voucher};
use crate::wallet::{AssetLedger, Wallet};

fn debit_all(
    wallet: &mut Wallet,
    owner: Address,
    token: Address,
    token_ids: &[U256],
    values: &[U256],
) -> Result<(), LedgerError> {
    let positions = wallet.semi_fungible.entry(token).or_default();
    for (token_id, value) in token_ids.iter().zip(values) {
        let available = positions.get(token_id).copied().unwrap_or_default();
        if available < *value {
            return Err(LedgerError::InsufficientBalance {
                owner,
                asset: AssetKey::SemiFungible(token, *token_id),
                available,
                requested: *value,
            });
        }
        // Debiting the snapshot as we validate makes repeated ids in one
        // batch check against what the earlier elements left behind.
        positions.insert(*token_id, available - *value);
    }
    Ok(())
}

fn credit_all(
    wallet: &mut Wallet,
    owner: Address,
    token: Address,
    token_ids: &[U256],
    values: &[U256],
) -> Result<(), LedgerError> {
    let positions = wallet.semi_fungible.entry(token).or_default();
    for (token_id, value) in token_ids.iter().zip(values) {
        let balance = positions.get(token_id).copied().unwrap_or_default();
        let credited = balance
            .checked_add(*value)
            .ok_or(LedgerError::BalanceOverflow {
                owner,
                asset: AssetKey::SemiFungible(token, *token_id),
            })?;
        positions.insert(*token_id, credited);
    }
    Ok(())
}

/// Credits a decoded batch deposit to its sender.
///
/// The decoder guarantees equal-length arrays; an empty batch is valid
/// and credits nothing.
pub fn deposit(ledger: &mut AssetLedger, payload: &[u8]) -> Result<(), LedgerError> {
    let record = parse_semi_fungible_batch_deposit(payload)?;

    let mut wallet = ledger.snapshot(&record.sender);
    credit_all(
        &mut wallet,
        record.sender,
        record.token,
        &record.token_ids,
        &record.values,
    )?;
    ledger.replace(record.sender, wallet);
    Ok(())
}

/// Moves a batch of (token_id, value) positions from `from` to `to`.
pub fn transfer(
    ledger: &mut AssetLedger,
    token: Address,
    from: Address,
    to: Address,
    token_ids: &[U256],
    values: &[U256],
) -> Result<(), LedgerError> {
    check_batch_shape(token_ids, values)?;

    let mut from_wallet = ledger.snapshot(&from);
    debit_all(&mut from_wallet, from, token, token_ids, values)?;
    if from == to {
        return Ok(());
    }

    let mut to_wallet = ledger.snapshot(&to);
    credit_all(&mut to_wallet, to, token, token_ids, values)?;

    ledger.replace(from, from_wallet);
    ledger.replace(to, to_wallet);
    Ok(())
}

/// Debits a batch from `owner` and issues a voucher calling the token
/// contract's safe batch transfer, application → owner, with empty
/// extra data.
pub fn withdraw(
    ledger: &mut AssetLedger,
    registry: &ApplicationAddressRegistry,
    token: Address,
    owner: Address,
    token_ids: &[U256],
    values: &[U256],
) -> Result<Voucher, LedgerError> {
    check_batch_shape(token_ids, values)?;
    let application = registry.get_or_fail()?;

    let mut wallet = ledger.snapshot(&owner);
    debit_all(&mut wallet, owner, token, token_ids, values)?;
    ledger.replace(owner, wallet);

    Ok(Voucher::new(
        token,
        semi_fungible_safe_batch_transfer_call(&application, &owner, token_ids, values),
    ))
}

/// Balances for parallel (token, token_id) pairs of one owner.
///
/// The two arrays must have the same length; an empty query is valid
/// and answers an empty vector.
pub fn balances(
    ledger: &AssetLedger,
    tokens: &[Address],
    token_ids: &[U256],
    owner: &Address,
) -> Result<Vec<U256>, LedgerError> {
    if tokens.len() != token_ids.len() {
        return Err(LedgerError::ArrayLengthMismatch {
            first: "tokens",
            second: "token_ids",
        });
    }
    Ok(tokens
        .iter()
        .zip(token_ids)
        .map(|(token, token_id)| ledger.semi_fungible_balance(token, token_id, owner))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn uints(values: &[u64]) -> Vec<U256> {
        values.iter().copied().map(U256::from).collect()
    }

    fn seeded_ledger(token: Address, owner: Address) -> AssetLedger {
        let mut ledger = AssetLedger::new();
        let mut wallet = ledger.snapshot(&owner);
        let positions = wallet.semi_fungible.entry(token).or_default();
        positions.insert(U256::from(1u64), U256::from(3u64));
        positions.insert(U256::from(2u64), U256::from(5u64));
        ledger.replace(owner, wallet);
        ledger
    }

    #[test]
    fn transfer_moves_every_pair() {
        let token = addr(0x11);
        let from = addr(0x01);
        let to = addr(0x02);
        let mut ledger = seeded_ledger(token, from);

        transfer(
            &mut ledger,
            token,
            from,
            to,
            &uints(&[1, 2]),
            &uints(&[1, 4]),
        )
        .unwrap();

        assert_eq!(
            ledger.semi_fungible_balance(&token, &U256::one(), &from),
            U256::from(2u64)
        );
        assert_eq!(
            ledger.semi_fungible_balance(&token, &U256::from(2u64), &from),
            U256::one()
        );
        assert_eq!(
            ledger.semi_fungible_balance(&token, &U256::one(), &to),
            U256::one()
        );
        assert_eq!(
            ledger.semi_fungible_balance(&token, &U256::from(2u64), &to),
            U256::from(4u64)
        );
    }

    #[test]
    fn one_short_element_aborts_the_whole_batch() {
        let token = addr(0x11);
        let from = addr(0x01);
        let to = addr(0x02);
        let mut ledger = seeded_ledger(token, from);
        let before = ledger.clone();

        let err = transfer(
            &mut ledger,
            token,
            from,
            to,
            &uints(&[1, 2]),
            &uints(&[1, 6]), // id 2 only holds 5
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));

        for id in [1u64, 2] {
            assert_eq!(
                ledger.semi_fungible_balance(&token, &U256::from(id), &from),
                before.semi_fungible_balance(&token, &U256::from(id), &from)
            );
            assert!(ledger
                .semi_fungible_balance(&token, &U256::from(id), &to)
                .is_zero());
        }
    }

    #[test]
    fn repeated_id_in_one_batch_is_checked_cumulatively() {
        let token = addr(0x11);
        let from = addr(0x01);
        let mut ledger = seeded_ledger(token, from);

        // id 1 holds 3; 2 + 2 must fail even though each element alone fits.
        let err = transfer(
            &mut ledger,
            token,
            from,
            addr(0x02),
            &uints(&[1, 1]),
            &uints(&[2, 2]),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    }

    #[test]
    fn mismatched_arrays_fail_before_any_mutation() {
        let token = addr(0x11);
        let from = addr(0x01);
        let mut ledger = seeded_ledger(token, from);
        let before = ledger.clone();

        let err = transfer(
            &mut ledger,
            token,
            from,
            addr(0x02),
            &uints(&[1, 2]),
            &uints(&[1]),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::ArrayLengthMismatch { .. }));
        assert_eq!(
            ledger.semi_fungible_balance(&token, &U256::one(), &from),
            before.semi_fungible_balance(&token, &U256::one(), &from)
        );
    }

    #[test]
    fn empty_batch_transfer_is_rejected() {
        let token = addr(0x11);
        let mut ledger = AssetLedger::new();

        let err = transfer(&mut ledger, token, addr(0x01), addr(0x02), &[], &[]).unwrap_err();
        assert!(matches!(err, LedgerError::EmptyArray { .. }));
    }

    #[test]
    fn withdraw_encodes_batch_call() {
        let token = addr(0x11);
        let owner = addr(0x01);
        let application = addr(0xD0);
        let mut ledger = seeded_ledger(token, owner);
        let mut registry = ApplicationAddressRegistry::default();
        registry.set(application).unwrap();

        let ids = uints(&[1, 2]);
        let values = uints(&[3, 5]);
        let voucher =
            withdraw(&mut ledger, &registry, token, owner, &ids, &values).unwrap();

        assert!(ledger
            .semi_fungible_balance(&token, &U256::one(), &owner)
            .is_zero());
        assert_eq!(voucher.destination, token);
        assert_eq!(
            voucher.payload,
            semi_fungible_safe_batch_transfer_call(&application, &owner, &ids, &values)
        );
    }

    #[test]
    fn batch_balances_query() {
        let token = addr(0x11);
        let owner = addr(0x01);
        let ledger = seeded_ledger(token, owner);

        let result = balances(
            &ledger,
            &[token, token, addr(0x99)],
            &uints(&[1, 2, 1]),
            &owner,
        )
        .unwrap();
        assert_eq!(result, uints(&[3, 5, 0]));

        assert!(matches!(
            balances(&ledger, &[token], &uints(&[1, 2]), &owner),
            Err(LedgerError::ArrayLengthMismatch { .. })
        ));
    }
}
