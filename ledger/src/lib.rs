// Copyright (c) 2026 Reef Contributors. MIT License.
// See LICENSE for details.

//! # Reef Ledger — Core Library
//!
//! An in-memory, deterministic asset ledger for applications running in
//! a rollup's off-chain execution environment. Deposits arrive as
//! binary notifications from base-layer portal contracts; applications
//! move balances with transfers; withdrawals mint [`Voucher`]s the base
//! layer executes exactly once.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of
//! the ledger:
//!
//! - **address** — Canonical 20-byte addresses. One spelling, one key.
//! - **config** — Portal deployment addresses and policy knobs.
//! - **deposit** — Byte-exact decoding of portal deposit payloads.
//! - **dispatch** — Advance-request routing; the error boundary.
//! - **registry** — The relayed application address, held once.
//! - **wallet** — The balance store and the assembled [`WalletApp`].
//! - **ops** — Per-asset deposit/transfer/withdraw operations.
//! - **voucher** — Withdrawal vouchers and their call encoders.
//! - **error** — The one error taxonomy every operation speaks.
//!
//! ## Determinism
//!
//! The ledger is driven by a sequential request stream and does no I/O,
//! keeps no clocks, and iterates only ordered collections where order
//! is observable. Replaying the same inputs produces bit-identical
//! outputs, which is what lets the rollup's validators agree on them.
//!
//! ## Design Philosophy
//!
//! 1. Validate, then mutate. Nothing lands until every check passed.
//! 2. Balances never go negative and never clamp; operations fail.
//! 3. If it touches money, it has tests. Plural.

pub mod address;
pub mod config;
pub mod deposit;
pub mod dispatch;
pub mod error;
pub mod ops;
pub mod registry;
pub mod voucher;
pub mod wallet;

pub use address::{Address, AddressError};
pub use config::{PortalConfig, RelayPolicy};
pub use deposit::{DecodeError, DepositKind, DepositRecord, FungibleDepositLayout};
pub use dispatch::{AdvanceMetadata, AdvanceRequest, DepositDispatcher, DispatchOutcome};
pub use error::{AssetKey, LedgerError};
pub use registry::ApplicationAddressRegistry;
pub use voucher::Voucher;
pub use wallet::{AssetLedger, Wallet, WalletApp};
