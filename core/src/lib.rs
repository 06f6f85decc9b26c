// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # brainaudit: Core Library
//!
//! Reproduces the classic "brainwallet" key derivation so that a passphrase
//! can be audited: given a phrase, what private key, WIF string and Bitcoin
//! address does it map to?
//!
//! ```text
//! passphrase ──sha256──▶ private key ──secp256k1──▶ public key
//!                             │                          │
//!                       Base58Check(0x80)     Base58Check(0x00, hash160)
//!                             ▼                          ▼
//!                            WIF                      address
//! ```
//!
//! The scheme is unsalted and fast, which is exactly why funds sent to these
//! addresses disappear. Nothing here hardens it.
//!
//! ## Architecture
//!
//! - **config**: version bytes, lengths, and [`NetworkParams`].
//! - **crypto**: hashing, Base58/Base58Check, and secp256k1 key pairs.
//! - **address**: WIF and P2PKH address formatting and parsing.
//! - **derivation**: the end-to-end pipeline ([`Deriver`], [`derive`]).
//! - **error**: [`DerivationError`] and friends.
//!
//! The library performs no I/O. Balance lookups live in the CLI crate.

pub mod address;
pub mod config;
pub mod crypto;
pub mod derivation;
pub mod error;

pub use address::AddressFormatter;
pub use config::{Network, NetworkParams};
pub use crypto::keys::PublicKeyFormat;
pub use derivation::{derive, DerivationResult, Deriver};
pub use error::{DerivationError, EncodingError};

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
