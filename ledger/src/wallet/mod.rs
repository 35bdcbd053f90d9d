//! # Wallet & Ledger State
//!
//! Where the balances live.
//!
//! ```text
//! account.rs — Wallet: one owner's holdings across all four asset kinds
//! ledger.rs  — AssetLedger: the owner-keyed wallet store
//! app.rs     — WalletApp: store + registry + dispatcher behind one API
//! ```
//!
//! Mutation discipline: operations never edit a stored wallet in place.
//! They take a [`AssetLedger::snapshot`], validate and mutate the copy,
//! and land it with [`AssetLedger::replace`] only after every check has
//! passed. An operation that fails between those points leaves the store
//! byte-identical to where it started.

pub mod account;
pub mod app;
pub mod ledger;

pub use account::Wallet;
pub use app::WalletApp;
pub use ledger::AssetLedger;
