//! # Canonical Account Address
//!
//! Every owner, token contract, and portal in the ledger is identified by
//! a 20-byte base-layer address. The ledger keys its maps by this value
//! type, never by text, so two spellings of the same address can never
//! split a balance across two entries.
//!
//! ## Parsing & Display
//!
//! Text input at the API boundary is `0x`-prefixed hex. Single-case input
//! (all lower or all upper) is accepted as-is; mixed-case input must carry
//! a valid EIP-55 checksum. [`Display`](fmt::Display) always renders the
//! EIP-55 form, which is also what serde emits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Byte length of a base-layer address.
pub const ADDRESS_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while parsing an address from text or bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The input does not start with the `0x` prefix.
    #[error("address must start with 0x")]
    MissingPrefix,

    /// The input has the wrong byte length.
    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required byte length.
        expected: usize,
        /// Byte length of the rejected input.
        got: usize,
    },

    /// The input contains a non-hexadecimal character.
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),

    /// Mixed-case input whose casing does not match the EIP-55 checksum.
    #[error("bad address checksum: {0}")]
    BadChecksum(String),
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A canonical 20-byte account address.
///
/// `Address` is `Copy` and cheap to move around; the ledger stores it raw
/// in every map key. Ordering and hashing are byte-wise, so containers
/// keyed by `Address` behave deterministically.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address. Conventionally "no address" on the base layer.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Constructs an address from a raw 20-byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Constructs an address from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidLength`] unless `bytes` is exactly
    /// 20 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Returns the raw 20-byte array.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Parses a `0x`-prefixed hex address.
    ///
    /// Accepts all-lowercase and all-uppercase hex unconditionally.
    /// Mixed-case input is treated as checksummed and must match the
    /// EIP-55 casing exactly.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;

        if body.len() != ADDRESS_LENGTH * 2 {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: body.len() / 2,
            });
        }

        let bytes =
            hex::decode(body).map_err(|_| AddressError::InvalidHex(s.to_string()))?;
        let address = Self::from_slice(&bytes)?;

        let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper {
            let checksummed = address.to_checksum();
            if checksummed[2..] != *body {
                return Err(AddressError::BadChecksum(s.to_string()));
            }
        }

        Ok(address)
    }

    /// Renders the EIP-55 mixed-case checksum form, `0x`-prefixed.
    ///
    /// A hex digit is uppercased when the corresponding nibble of
    /// `keccak256(lowercase_hex_body)` is `>= 8`.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(2 + ADDRESS_LENGTH * 2);
        out.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if nibble >= 8 {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

/// Keccak-256 digest of `data`.
///
/// The base layer's hash everywhere: address checksums here, call
/// selectors in the voucher encoder.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

// Serde renders the checksum string; parsing goes through the same
// case-validation as every other text boundary.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-55 reference vectors.
    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn checksum_matches_reference_vectors() {
        for vector in CHECKSUMMED {
            let parsed = Address::parse(&vector.to_lowercase()).unwrap();
            assert_eq!(parsed.to_checksum(), *vector);
        }
    }

    #[test]
    fn parse_accepts_lowercase() {
        let a = Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(a.to_checksum(), CHECKSUMMED[0]);
    }

    #[test]
    fn parse_accepts_uppercase() {
        let a = Address::parse("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap();
        assert_eq!(a.to_checksum(), CHECKSUMMED[0]);
    }

    #[test]
    fn parse_accepts_valid_checksum() {
        for vector in CHECKSUMMED {
            assert!(Address::parse(vector).is_ok());
        }
    }

    #[test]
    fn parse_rejects_bad_checksum() {
        // Flip the case of one alphabetic character.
        let corrupted = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD";
        assert!(matches!(
            Address::parse(corrupted),
            Err(AddressError::BadChecksum(_))
        ));
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        assert_eq!(
            Address::parse("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            Err(AddressError::MissingPrefix)
        );
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(matches!(
            Address::parse("0x5aaeb6"),
            Err(AddressError::InvalidLength { .. })
        ));
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(matches!(
            Address::parse("0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn case_insensitive_spellings_are_equal() {
        let lower = Address::parse("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        let upper = Address::parse("0xFB6916095CA1DF60BB79CE92CE3EA74C37C5D359").unwrap();
        let mixed = Address::parse(CHECKSUMMED[1]).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn from_slice_length_check() {
        assert!(Address::from_slice(&[0u8; 20]).is_ok());
        assert!(matches!(
            Address::from_slice(&[0u8; 19]),
            Err(AddressError::InvalidLength { .. })
        ));
    }

    #[test]
    fn zero_address_is_default() {
        assert_eq!(Address::default(), Address::ZERO);
        assert_eq!(
            Address::ZERO.to_checksum(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn serde_roundtrip_uses_checksum_string() {
        let a = Address::parse(CHECKSUMMED[2]).unwrap();
        let json = serde_json::to_string(&a).expect("serialize");
        assert_eq!(json, format!("\"{}\"", CHECKSUMMED[2]));
        let back: Address = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(a, back);
    }
}
