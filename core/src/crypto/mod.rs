//! # Cryptographic Primitives
//!
//! Everything the brainwallet pipeline needs below the address layer:
//!
//! - **hash**: SHA-256, RIPEMD-160 and their compositions (double SHA-256,
//!   HASH160, the Base58Check checksum).
//! - **base58**: the Bitcoin Base58 alphabet and Base58Check framing.
//! - **keys**: passphrase → private key → secp256k1 public key.
//!
//! All of it is a thin, typed layer over audited crates (`sha2`, `ripemd`,
//! `secp256k1`, `bs58`).

pub mod base58;
pub mod hash;
pub mod keys;

pub use base58::EncodingError;
pub use hash::{checksum, double_sha256, hash160, ripemd160, sha256};
pub use keys::{derive_key_pair, KeyPair, PrivateKey, PublicKey, PublicKeyFormat, CURVE_ORDER};
