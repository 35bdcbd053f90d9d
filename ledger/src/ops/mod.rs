//! # Per-Asset Operations
//!
//! One module per asset kind, each with the same surface: a `deposit`
//! credit step (fed by the dispatcher), `transfer`, `withdraw`, and the
//! balance queries that kind supports. The relay module handles the one
//! deposit that carries no value at all: the application's own address.
//!
//! Every operation follows the same discipline: validate everything
//! against snapshots, then land the result with whole-wallet `replace`
//! calls. An error anywhere before the final `replace` leaves the store
//! untouched, which is what lets the dispatcher treat "handler failed"
//! and "nothing happened" as the same thing.

pub mod fungible;
pub mod native;
pub mod non_fungible;
pub mod relay;
pub mod semi_fungible;
pub mod semi_fungible_batch;

use primitive_types::U256;

use crate::error::LedgerError;

/// Validates the shape of a parallel-array batch: both non-empty, equal
/// length. Checked before any element is read.
pub(crate) fn check_batch_shape(
    token_ids: &[U256],
    values: &[U256],
) -> Result<(), LedgerError> {
    if token_ids.is_empty() {
        return Err(LedgerError::EmptyArray { name: "token_ids" });
    }
    if values.is_empty() {
        return Err(LedgerError::EmptyArray { name: "values" });
    }
    if token_ids.len() != values.len() {
        return Err(LedgerError::ArrayLengthMismatch {
            first: "token_ids",
            second: "values",
        });
    }
    Ok(())
}
