//! # Key Derivation
//!
//! Brainwallet key material on secp256k1.
//!
//! The private key is a single, unsalted SHA-256 of the passphrase bytes.
//! That is the whole scheme, and the reason brainwallets get emptied by
//! dictionary sweeps within seconds of being funded. This module reproduces
//! it exactly; it does not make it safer.
//!
//! ## Valid scalars
//!
//! A secp256k1 private key must lie in `[1, n - 1]` where `n` is the curve
//! order ([`CURVE_ORDER`]). A SHA-256 digest lands outside that range with
//! probability around 2^-128, but the passphrase is attacker-chosen, so the
//! case is checked on every derivation and reported as
//! [`DerivationError::InvalidPrivateKey`]. Out-of-range keys are never
//! reduced modulo `n`.
//!
//! ## Public key encoding
//!
//! The public key is serialized as SEC1, either uncompressed (`04 || X || Y`,
//! 65 bytes) or compressed (`02/03 || X`, 33 bytes), per [`PublicKeyFormat`].
//! The choice changes the address, so it is carried alongside the key and
//! never inferred.

use secp256k1::{Secp256k1, SecretKey, Signing};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::hash::{hash160, sha256};
use crate::config::{
    COMPRESSED_PUBLIC_KEY_LENGTH, PRIVATE_KEY_LENGTH, PUBKEY_HASH_LENGTH,
    UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};
use crate::error::{DerivationError, Result};

pub use secp256k1::constants::CURVE_ORDER;

/// SEC1 serialization of the public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicKeyFormat {
    /// `04 || X || Y`. What the classic brainwallet tools used, and the
    /// encoding behind the published brainwallet addresses.
    #[default]
    Uncompressed,
    /// `02/03 || X`.
    Compressed,
}

impl PublicKeyFormat {
    pub fn is_compressed(self) -> bool {
        matches!(self, PublicKeyFormat::Compressed)
    }

    /// Serialized length in bytes.
    pub fn encoded_len(self) -> usize {
        match self {
            PublicKeyFormat::Uncompressed => UNCOMPRESSED_PUBLIC_KEY_LENGTH,
            PublicKeyFormat::Compressed => COMPRESSED_PUBLIC_KEY_LENGTH,
        }
    }
}

/// A 32-byte secp256k1 private key.
///
/// Construction does not validate the scalar; validation happens when the
/// public key is derived (see [`KeyPair::from_private_key`]). This lets
/// callers hold and inspect out-of-range values, which is exactly what the
/// error path needs to be tested against.
///
/// `Debug` output never contains the key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    bytes: [u8; PRIVATE_KEY_LENGTH],
}

impl PrivateKey {
    /// `SHA-256(passphrase)`. No normalization of any kind.
    pub fn from_passphrase(passphrase: &[u8]) -> Self {
        Self {
            bytes: sha256(passphrase),
        }
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LENGTH] {
        &self.bytes
    }

    /// 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Whether the bytes are a valid secp256k1 scalar, i.e. in `[1, n - 1]`.
    pub fn is_valid_scalar(&self) -> bool {
        self.to_secret_key().is_ok()
    }

    fn to_secret_key(&self) -> Result<SecretKey> {
        // from_slice rejects zero and anything >= the curve order.
        SecretKey::from_slice(&self.bytes).map_err(|_| DerivationError::InvalidPrivateKey)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A serialized secp256k1 public key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: Vec<u8>,
    format: PublicKeyFormat,
}

impl PublicKey {
    /// SEC1 bytes, 33 or 65 long depending on [`format`](Self::format).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> PublicKeyFormat {
        self.format
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// `RIPEMD-160(SHA-256(bytes))`, the address payload.
    pub fn hash160(&self) -> [u8; PUBKEY_HASH_LENGTH] {
        hash160(&self.bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({:?}, {})", self.format, self.to_hex())
    }
}

/// A private key and the public key derived from it.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Derive the public key by scalar multiplication of the generator.
    ///
    /// Fails with [`DerivationError::InvalidPrivateKey`] if the private key
    /// is zero or not below the curve order.
    pub fn from_private_key<C: Signing>(
        secp: &Secp256k1<C>,
        private_key: PrivateKey,
        format: PublicKeyFormat,
    ) -> Result<Self> {
        let secret_key = private_key.to_secret_key()?;
        let point = secp256k1::PublicKey::from_secret_key(secp, &secret_key);

        let bytes = match format {
            PublicKeyFormat::Uncompressed => point.serialize_uncompressed().to_vec(),
            PublicKeyFormat::Compressed => point.serialize().to_vec(),
        };

        Ok(Self {
            private_key,
            public_key: PublicKey { bytes, format },
        })
    }

    /// Same as [`from_private_key`](Self::from_private_key), for raw bytes,
    /// with a throwaway signing context.
    pub fn from_private_key_bytes(
        bytes: &[u8; PRIVATE_KEY_LENGTH],
        format: PublicKeyFormat,
    ) -> Result<Self> {
        let secp = Secp256k1::signing_only();
        Self::from_private_key(&secp, PrivateKey::from_bytes(*bytes), format)
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public_key.to_hex())
    }
}

/// Hash a passphrase into a key pair using the given context.
pub fn derive_key_pair_with<C: Signing>(
    secp: &Secp256k1<C>,
    passphrase: &[u8],
    format: PublicKeyFormat,
) -> Result<KeyPair> {
    KeyPair::from_private_key(secp, PrivateKey::from_passphrase(passphrase), format)
}

/// Hash a passphrase into a key pair.
///
/// ```
/// use brainaudit_core::crypto::keys::{derive_key_pair, PublicKeyFormat};
///
/// let kp = derive_key_pair(b"correct horse battery staple", PublicKeyFormat::Compressed).unwrap();
/// assert_eq!(kp.public_key().as_bytes().len(), 33);
/// ```
pub fn derive_key_pair(passphrase: &[u8], format: PublicKeyFormat) -> Result<KeyPair> {
    let secp = Secp256k1::signing_only();
    derive_key_pair_with(&secp, passphrase, format)
}
