//! # Deposit Payload Decoding
//!
//! Portal contracts on the base layer notify the rollup of deposits with
//! tightly packed binary payloads. This module turns those bytes into
//! typed records, one per asset kind, and does nothing else: no I/O, no
//! ledger access, pure functions.
//!
//! ## Layouts
//!
//! Offsets are fixed per kind (all integers are 32-byte big-endian):
//!
//! ```text
//! native                  [0:20] sender  [20:52] value
//! fungible (flagged)      [0:1]  success [1:21] token  [21:41] sender  [41:73] amount
//! fungible (bare)         [0:20] token   [20:40] sender [40:72] amount
//! non-fungible            [0:20] token   [20:40] sender [40:72] token_id
//! semi-fungible single    [0:20] token   [20:40] sender [40:72] token_id [72:104] value
//! semi-fungible batch     [0:20] token   [20:40] sender [40:]  abi(uint256[], uint256[])
//! relay                   [0:20] application address (exact length)
//! ```
//!
//! Some portal generations append execution-layer data after the fixed
//! prefix; every decoder here ignores trailing bytes. The two fungible
//! layouts both exist in the portals' history, and
//! [`FungibleDepositLayout`] selects which one a deployment speaks.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;

/// ABI word size: every head offset, length, and element is 32 bytes.
const WORD: usize = 32;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while decoding a deposit payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is shorter than the fixed prefix of its layout.
    #[error("payload too short: need at least {expected} bytes, got {got}")]
    PayloadTooShort {
        /// Minimum length the layout requires.
        expected: usize,
        /// Actual payload length.
        got: usize,
    },

    /// The success flag of a flagged fungible deposit was neither 0 nor 1.
    #[error("invalid boolean byte: {0:#04x}")]
    InvalidBooleanByte(u8),

    /// A relay payload was not exactly 20 bytes.
    #[error("relay payload must be exactly 20 bytes, got {got}")]
    InvalidRelayLength {
        /// Actual payload length.
        got: usize,
    },

    /// An ABI head offset or element range points outside the payload.
    #[error("malformed batch arrays: {what} out of bounds")]
    ArrayOutOfBounds {
        /// Which part of the encoding was invalid.
        what: &'static str,
    },

    /// The batch arrays decoded to different lengths.
    ///
    /// The record declares parallel arrays; a mismatched pair is
    /// malformed input, rejected before any handler runs.
    #[error("batch arrays must have the same length ({token_ids} != {values})")]
    BatchLengthMismatch {
        /// Decoded token-id count.
        token_ids: usize,
        /// Decoded value count.
        values: usize,
    },
}

// ---------------------------------------------------------------------------
// Layout selection
// ---------------------------------------------------------------------------

/// Which of the two historical fungible-deposit payload layouts the
/// configured portal emits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FungibleDepositLayout {
    /// Leading success boolean before token/sender/amount.
    #[default]
    SuccessFlag,
    /// token/sender/amount with no flag; decodes as `success = true`.
    Bare,
}

// ---------------------------------------------------------------------------
// Deposit records
// ---------------------------------------------------------------------------

/// A native-currency deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeDeposit {
    /// Account that deposited on the base layer.
    pub sender: Address,
    /// Deposited amount in the smallest unit.
    pub value: U256,
}

/// A fungible-token deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleDeposit {
    /// Whether the base-layer transfer into the portal succeeded.
    ///
    /// A `false` flag is still a valid notification; the ledger accepts
    /// it and credits nothing.
    pub success: bool,
    /// Token contract address.
    pub token: Address,
    /// Depositing account.
    pub sender: Address,
    /// Deposited amount.
    pub amount: U256,
}

/// A non-fungible-token deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonFungibleDeposit {
    /// Token contract address.
    pub token: Address,
    /// Depositing account.
    pub sender: Address,
    /// The deposited token id.
    pub token_id: U256,
}

/// A single-id semi-fungible deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemiFungibleSingleDeposit {
    /// Token contract address.
    pub token: Address,
    /// Depositing account.
    pub sender: Address,
    /// The deposited token id.
    pub token_id: U256,
    /// Quantity of that id.
    pub value: U256,
}

/// A batch semi-fungible deposit: parallel equal-length arrays.
///
/// Zero-length arrays are a valid (empty) batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemiFungibleBatchDeposit {
    /// Token contract address.
    pub token: Address,
    /// Depositing account.
    pub sender: Address,
    /// Deposited token ids.
    pub token_ids: Vec<U256>,
    /// Quantity per token id, same length as `token_ids`.
    pub values: Vec<U256>,
}

/// Asset-kind tag for [`DepositRecord::decode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepositKind {
    /// Native-currency deposit.
    Native,
    /// Fungible-token deposit.
    Fungible,
    /// Non-fungible-token deposit.
    NonFungible,
    /// Single-id semi-fungible deposit.
    SemiFungibleSingle,
    /// Batch semi-fungible deposit.
    SemiFungibleBatch,
}

/// A decoded deposit notification, tagged by asset kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositRecord {
    /// Native-currency deposit.
    Native(NativeDeposit),
    /// Fungible-token deposit.
    Fungible(FungibleDeposit),
    /// Non-fungible-token deposit.
    NonFungible(NonFungibleDeposit),
    /// Single-id semi-fungible deposit.
    SemiFungibleSingle(SemiFungibleSingleDeposit),
    /// Batch semi-fungible deposit.
    SemiFungibleBatch(SemiFungibleBatchDeposit),
}

impl DepositRecord {
    /// Decodes `payload` as a deposit of the given kind.
    ///
    /// `layout` only matters for [`DepositKind::Fungible`].
    pub fn decode(
        kind: DepositKind,
        payload: &[u8],
        layout: FungibleDepositLayout,
    ) -> Result<Self, DecodeError> {
        match kind {
            DepositKind::Native => parse_native_deposit(payload).map(Self::Native),
            DepositKind::Fungible => {
                parse_fungible_deposit(payload, layout).map(Self::Fungible)
            }
            DepositKind::NonFungible => {
                parse_non_fungible_deposit(payload).map(Self::NonFungible)
            }
            DepositKind::SemiFungibleSingle => {
                parse_semi_fungible_single_deposit(payload).map(Self::SemiFungibleSingle)
            }
            DepositKind::SemiFungibleBatch => {
                parse_semi_fungible_batch_deposit(payload).map(Self::SemiFungibleBatch)
            }
        }
    }

    /// The account that made the deposit.
    pub fn sender(&self) -> Address {
        match self {
            DepositRecord::Native(d) => d.sender,
            DepositRecord::Fungible(d) => d.sender,
            DepositRecord::NonFungible(d) => d.sender,
            DepositRecord::SemiFungibleSingle(d) => d.sender,
            DepositRecord::SemiFungibleBatch(d) => d.sender,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoders
// ---------------------------------------------------------------------------

fn require_len(payload: &[u8], expected: usize) -> Result<(), DecodeError> {
    if payload.len() < expected {
        return Err(DecodeError::PayloadTooShort {
            expected,
            got: payload.len(),
        });
    }
    Ok(())
}

fn address_at(payload: &[u8], offset: usize) -> Address {
    // Callers have already bounds-checked the fixed prefix.
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&payload[offset..offset + 20]);
    Address::new(bytes)
}

fn uint_at(payload: &[u8], offset: usize) -> U256 {
    U256::from_big_endian(&payload[offset..offset + WORD])
}

/// Decodes a native-currency deposit: `sender · value`.
pub fn parse_native_deposit(payload: &[u8]) -> Result<NativeDeposit, DecodeError> {
    require_len(payload, 52)?;
    Ok(NativeDeposit {
        sender: address_at(payload, 0),
        value: uint_at(payload, 20),
    })
}

/// Decodes a fungible-token deposit in the given layout.
pub fn parse_fungible_deposit(
    payload: &[u8],
    layout: FungibleDepositLayout,
) -> Result<FungibleDeposit, DecodeError> {
    match layout {
        FungibleDepositLayout::SuccessFlag => {
            require_len(payload, 73)?;
            let success = match payload[0] {
                0 => false,
                1 => true,
                other => return Err(DecodeError::InvalidBooleanByte(other)),
            };
            Ok(FungibleDeposit {
                success,
                token: address_at(payload, 1),
                sender: address_at(payload, 21),
                amount: uint_at(payload, 41),
            })
        }
        FungibleDepositLayout::Bare => {
            require_len(payload, 72)?;
            Ok(FungibleDeposit {
                success: true,
                token: address_at(payload, 0),
                sender: address_at(payload, 20),
                amount: uint_at(payload, 40),
            })
        }
    }
}

/// Decodes a non-fungible-token deposit: `token · sender · token_id`.
pub fn parse_non_fungible_deposit(
    payload: &[u8],
) -> Result<NonFungibleDeposit, DecodeError> {
    require_len(payload, 72)?;
    Ok(NonFungibleDeposit {
        token: address_at(payload, 0),
        sender: address_at(payload, 20),
        token_id: uint_at(payload, 40),
    })
}

/// Decodes a single-id semi-fungible deposit:
/// `token · sender · token_id · value`.
pub fn parse_semi_fungible_single_deposit(
    payload: &[u8],
) -> Result<SemiFungibleSingleDeposit, DecodeError> {
    require_len(payload, 104)?;
    Ok(SemiFungibleSingleDeposit {
        token: address_at(payload, 0),
        sender: address_at(payload, 20),
        token_id: uint_at(payload, 40),
        value: uint_at(payload, 72),
    })
}

/// Decodes a batch semi-fungible deposit: a 40-byte `token · sender`
/// header followed by the ABI encoding of
/// `(uint256[] token_ids, uint256[] values)`.
pub fn parse_semi_fungible_batch_deposit(
    payload: &[u8],
) -> Result<SemiFungibleBatchDeposit, DecodeError> {
    require_len(payload, 40 + 2 * WORD)?;
    let token = address_at(payload, 0);
    let sender = address_at(payload, 20);

    let tail = &payload[40..];
    let ids_offset = word_to_offset(tail, 0, "token_ids offset")?;
    let values_offset = word_to_offset(tail, WORD, "values offset")?;

    let token_ids = decode_uint_array(tail, ids_offset, "token_ids")?;
    let values = decode_uint_array(tail, values_offset, "values")?;

    if token_ids.len() != values.len() {
        return Err(DecodeError::BatchLengthMismatch {
            token_ids: token_ids.len(),
            values: values.len(),
        });
    }

    Ok(SemiFungibleBatchDeposit {
        token,
        sender,
        token_ids,
        values,
    })
}

/// Decodes a relay payload: exactly one 20-byte application address.
pub fn parse_relay_payload(payload: &[u8]) -> Result<Address, DecodeError> {
    if payload.len() != 20 {
        return Err(DecodeError::InvalidRelayLength {
            got: payload.len(),
        });
    }
    Ok(address_at(payload, 0))
}

/// Reads a 32-byte head word at `offset` as an in-bounds byte offset.
///
/// Offsets above `u32::MAX` are rejected outright; no real payload is
/// anywhere near 4 GiB.
fn word_to_offset(
    tail: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<usize, DecodeError> {
    let word = &tail[offset..offset + WORD];
    if word[..WORD - 4].iter().any(|&b| b != 0) {
        return Err(DecodeError::ArrayOutOfBounds { what });
    }
    let mut be = [0u8; 4];
    be.copy_from_slice(&word[WORD - 4..]);
    Ok(u32::from_be_bytes(be) as usize)
}

fn decode_uint_array(
    tail: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<Vec<U256>, DecodeError> {
    if offset + WORD > tail.len() {
        return Err(DecodeError::ArrayOutOfBounds { what });
    }
    let len = word_to_offset(tail, offset, what)?;
    let start = offset + WORD;
    let end = start
        .checked_add(len.checked_mul(WORD).ok_or(DecodeError::ArrayOutOfBounds { what })?)
        .ok_or(DecodeError::ArrayOutOfBounds { what })?;
    if end > tail.len() {
        return Err(DecodeError::ArrayOutOfBounds { what });
    }

    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        out.push(U256::from_big_endian(
            &tail[start + i * WORD..start + (i + 1) * WORD],
        ));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
