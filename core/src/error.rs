//! Error types for brainwallet derivation.
//!
//! Every failure here is a deterministic function of the input. Retrying
//! with the same passphrase or string will fail the same way, so none of
//! these are retryable. Messages never include key material.

use thiserror::Error;

pub use crate::crypto::base58::EncodingError;

/// Errors returned by the derivation pipeline and the WIF/address parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// The passphrase hash is zero or not below the secp256k1 curve order.
    #[error("invalid private key: the passphrase hash is not a valid secp256k1 scalar, choose a different phrase")]
    InvalidPrivateKey,

    /// Malformed Base58 / Base58Check input.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// A decoded string carries a different version byte than the network's.
    #[error("version byte mismatch: expected 0x{expected:02x}, got 0x{actual:02x}")]
    VersionMismatch {
        /// Version byte of the configured network.
        expected: u8,
        /// Version byte found in the decoded data.
        actual: u8,
    },

    /// A decoded payload has the wrong length for its kind.
    #[error("invalid payload length: expected {expected} bytes, got {actual}")]
    InvalidPayloadLength {
        /// Length required by the configured network and key format.
        expected: usize,
        /// Length of the decoded payload, version byte included.
        actual: usize,
    },

    /// A compressed WIF payload whose last byte is not `0x01`.
    #[error("invalid WIF compression flag: 0x{flag:02x}")]
    InvalidCompressionFlag {
        /// The byte found where the compression flag belongs.
        flag: u8,
    },
}

/// Result type for derivation operations.
pub type Result<T> = std::result::Result<T, DerivationError>;
