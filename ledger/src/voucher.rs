//! # Withdrawal Vouchers
//!
//! A [`Voucher`] is the ledger's only output that leaves the rollup: a
//! destination contract and an encoded call the base-layer settlement
//! process executes exactly once. The ledger debits optimistically at
//! construction time; by the time the voucher runs on the base chain,
//! the funds are already gone from the off-chain books.
//!
//! The encoders here cover exactly the five withdrawal calls, standard
//! head/tail ABI form, 32-byte words. This is deliberately not a general
//! ABI codec. Selectors are derived from the canonical signatures with
//! Keccak-256 rather than pasted in as magic numbers; the unit tests pin
//! them to the known four-byte values.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::address::{keccak256, Address};

/// ABI word size.
const WORD: usize = 32;

// Canonical signatures of the calls vouchers can carry.
const WITHDRAW_NATIVE_SIGNATURE: &str = "withdrawEther(address,uint256)";
const FUNGIBLE_TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";
const NON_FUNGIBLE_SAFE_TRANSFER_SIGNATURE: &str =
    "safeTransferFrom(address,address,uint256)";
const SEMI_FUNGIBLE_SAFE_TRANSFER_SIGNATURE: &str =
    "safeTransferFrom(address,address,uint256,uint256,bytes)";
const SEMI_FUNGIBLE_SAFE_BATCH_TRANSFER_SIGNATURE: &str =
    "safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)";

// ---------------------------------------------------------------------------
// Voucher
// ---------------------------------------------------------------------------

/// A to-be-executed base-layer call. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    /// Contract the base layer will call.
    pub destination: Address,
    /// Encoded call data.
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
    /// Native value to attach to the call.
    ///
    /// The current encoders move value inside the encoded call, so they
    /// always leave this `None`; settlement layers that accept a direct
    /// value read it from here.
    pub value: Option<U256>,
}

impl Voucher {
    /// Creates a voucher with no attached native value.
    pub fn new(destination: Address, payload: Vec<u8>) -> Self {
        Self {
            destination,
            payload,
            value: None,
        }
    }
}

/// Serde helper: `Vec<u8>` as a `0x`-prefixed hex string.
///
/// The outer layer publishes vouchers as JSON; raw byte arrays would be
/// both bloated and unreadable in logs.
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let body = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(body).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Call encoding
// ---------------------------------------------------------------------------

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn push_address(out: &mut Vec<u8>, address: &Address) {
    out.extend_from_slice(&[0u8; WORD - 20]);
    out.extend_from_slice(address.as_bytes());
}

fn push_uint(out: &mut Vec<u8>, value: &U256) {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    out.extend_from_slice(&word);
}

fn push_uint_array(out: &mut Vec<u8>, values: &[U256]) {
    push_uint(out, &U256::from(values.len()));
    for value in values {
        push_uint(out, value);
    }
}

/// `withdrawEther(address,uint256)` with `(receiver, amount)`.
///
/// Addressed to the application contract itself, which pays out of its
/// own base-layer balance.
pub fn withdraw_native_call(receiver: &Address, amount: &U256) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 2 * WORD);
    out.extend_from_slice(&selector(WITHDRAW_NATIVE_SIGNATURE));
    push_address(&mut out, receiver);
    push_uint(&mut out, amount);
    out
}

/// `transfer(address,uint256)` with `(recipient, amount)`.
pub fn fungible_transfer_call(recipient: &Address, amount: &U256) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 2 * WORD);
    out.extend_from_slice(&selector(FUNGIBLE_TRANSFER_SIGNATURE));
    push_address(&mut out, recipient);
    push_uint(&mut out, amount);
    out
}

/// `safeTransferFrom(address,address,uint256)` with `(from, to, token_id)`.
pub fn non_fungible_safe_transfer_call(
    from: &Address,
    to: &Address,
    token_id: &U256,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 3 * WORD);
    out.extend_from_slice(&selector(NON_FUNGIBLE_SAFE_TRANSFER_SIGNATURE));
    push_address(&mut out, from);
    push_address(&mut out, to);
    push_uint(&mut out, token_id);
    out
}

/// `safeTransferFrom(address,address,uint256,uint256,bytes)` with
/// `(from, to, token_id, value, "")`.
pub fn semi_fungible_safe_transfer_call(
    from: &Address,
    to: &Address,
    token_id: &U256,
    value: &U256,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 6 * WORD);
    out.extend_from_slice(&selector(SEMI_FUNGIBLE_SAFE_TRANSFER_SIGNATURE));
    push_address(&mut out, from);
    push_address(&mut out, to);
    push_uint(&mut out, token_id);
    push_uint(&mut out, value);
    // Head offset of the empty `bytes` argument, then its zero length.
    push_uint(&mut out, &U256::from(5 * WORD));
    push_uint(&mut out, &U256::zero());
    out
}

/// `safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)`
/// with `(from, to, token_ids, values, "")`.
pub fn semi_fungible_safe_batch_transfer_call(
    from: &Address,
    to: &Address,
    token_ids: &[U256],
    values: &[U256],
) -> Vec<u8> {
    let head = 5 * WORD;
    let ids_tail = WORD + token_ids.len() * WORD;
    let values_tail = WORD + values.len() * WORD;

    let mut out = Vec::with_capacity(4 + head + ids_tail + values_tail + WORD);
    out.extend_from_slice(&selector(SEMI_FUNGIBLE_SAFE_BATCH_TRANSFER_SIGNATURE));
    push_address(&mut out, from);
    push_address(&mut out, to);
    push_uint(&mut out, &U256::from(head));
    push_uint(&mut out, &U256::from(head + ids_tail));
    push_uint(&mut out, &U256::from(head + ids_tail + values_tail));
    push_uint_array(&mut out, token_ids);
    push_uint_array(&mut out, values);
    // Empty `bytes`: length word only.
    push_uint(&mut out, &U256::zero());
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
