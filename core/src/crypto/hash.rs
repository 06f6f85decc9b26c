//! # Hashing Utilities
//!
//! The two digest primitives the brainwallet scheme is built from, plus the
//! three compositions of them that show up over and over:
//!
//! - **SHA-256**: turns the passphrase into the private key, and is the inner
//!   hash of both HASH160 and the Base58Check checksum.
//! - **RIPEMD-160**: the outer hash of HASH160, shrinking a public key down
//!   to the 20-byte payload of an address.
//!
//! Both come from the RustCrypto `sha2` and `ripemd` crates. Nothing in here
//! is hand-rolled, and nothing in here can fail.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::config::{CHECKSUM_LENGTH, PUBKEY_HASH_LENGTH};

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use brainaudit_core::crypto::sha256;
///
/// let hash = sha256(b"correct horse battery staple");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute the RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; PUBKEY_HASH_LENGTH] {
    Ripemd160::digest(data).into()
}

/// Compute the double-SHA-256 hash: `SHA-256(SHA-256(data))`.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// `RIPEMD-160(SHA-256(data))`, the hash that turns a public key into the
/// payload of an address.
pub fn hash160(data: &[u8]) -> [u8; PUBKEY_HASH_LENGTH] {
    ripemd160(&sha256(data))
}

/// The Base58Check checksum of `data`: the first four bytes of its
/// double SHA-256. Always two rounds, never one.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = double_sha256(data);
    let mut output = [0u8; CHECKSUM_LENGTH];
    output.copy_from_slice(&digest[..CHECKSUM_LENGTH]);
    output
}
