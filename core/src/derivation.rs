//! # Derivation Pipeline
//!
//! passphrase → SHA-256 → private key → secp256k1 public key → WIF + address.
//!
//! [`Deriver`] owns everything a derivation needs that is not the passphrase:
//! the network version bytes, the public key format and a signing-only
//! secp256k1 context. It holds no mutable state, so one instance can be
//! shared across threads and called concurrently.
//!
//! Key material is never logged. Events at `debug`/`trace` carry only the
//! network, the key format, and the resulting address.

use secp256k1::{Secp256k1, SignOnly};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::address::AddressFormatter;
use crate::config::{Network, NetworkParams, PRIVATE_KEY_LENGTH};
use crate::crypto::keys::{KeyPair, PrivateKey, PublicKeyFormat};
use crate::error::Result;

/// The four strings a derivation produces.
///
/// Serializes with the field names `privateKeyHex`, `privateKeyWIF`,
/// `publicKeyHex` and `address`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationResult {
    /// 64 lowercase hex characters.
    #[serde(rename = "privateKeyHex")]
    pub private_key_hex: String,
    /// Base58Check, network WIF version.
    #[serde(rename = "privateKeyWIF")]
    pub private_key_wif: String,
    /// SEC1 encoding in the deriver's key format, lowercase hex.
    #[serde(rename = "publicKeyHex")]
    pub public_key_hex: String,
    /// Base58Check P2PKH address.
    pub address: String,
}

impl fmt::Debug for DerivationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationResult")
            .field("private_key_hex", &"<redacted>")
            .field("private_key_wif", &"<redacted>")
            .field("public_key_hex", &self.public_key_hex)
            .field("address", &self.address)
            .finish()
    }
}

/// Brainwallet derivation for one network and one public key format.
///
/// ```
/// use brainaudit_core::derivation::Deriver;
///
/// let deriver = Deriver::mainnet();
/// let result = deriver.derive("correct horse battery staple").unwrap();
/// assert_eq!(result.address, "1JwSSubhmg6iPtRjtyqhUYYH7bZg3Lfy1T");
/// ```
#[derive(Clone)]
pub struct Deriver {
    secp: Secp256k1<SignOnly>,
    formatter: AddressFormatter,
}

impl Deriver {
    pub fn new(params: NetworkParams, key_format: PublicKeyFormat) -> Self {
        Self {
            secp: Secp256k1::signing_only(),
            formatter: AddressFormatter::new(params, key_format),
        }
    }

    /// Mainnet version bytes, uncompressed public keys.
    pub fn mainnet() -> Self {
        Self::new(NetworkParams::MAINNET, PublicKeyFormat::Uncompressed)
    }

    pub fn for_network(network: Network, key_format: PublicKeyFormat) -> Self {
        Self::new(network.params(), key_format)
    }

    pub fn params(&self) -> NetworkParams {
        self.formatter.params()
    }

    pub fn key_format(&self) -> PublicKeyFormat {
        self.formatter.key_format()
    }

    /// The formatter this deriver encodes with, for parsing its own output.
    pub fn formatter(&self) -> &AddressFormatter {
        &self.formatter
    }

    /// Derive from a text passphrase, hashed as its exact UTF-8 bytes.
    pub fn derive(&self, passphrase: &str) -> Result<DerivationResult> {
        self.derive_bytes(passphrase.as_bytes())
    }

    /// Derive from arbitrary passphrase bytes.
    pub fn derive_bytes(&self, passphrase: &[u8]) -> Result<DerivationResult> {
        trace!(len = passphrase.len(), "hashing passphrase");
        self.run(PrivateKey::from_passphrase(passphrase))
    }

    /// Run the pipeline from a raw 32-byte scalar instead of a passphrase.
    pub fn derive_from_private_key(
        &self,
        private_key: &[u8; PRIVATE_KEY_LENGTH],
    ) -> Result<DerivationResult> {
        self.run(PrivateKey::from_bytes(*private_key))
    }

    fn run(&self, private_key: PrivateKey) -> Result<DerivationResult> {
        let key_pair =
            KeyPair::from_private_key(&self.secp, private_key, self.key_format()).map_err(|e| {
                debug!("passphrase hash is not a valid secp256k1 scalar");
                e
            })?;
        trace!(format = ?self.key_format(), "public key derived");

        let result = DerivationResult {
            private_key_hex: key_pair.private_key().to_hex(),
            private_key_wif: self.formatter.format_wif(key_pair.private_key()),
            public_key_hex: key_pair.public_key().to_hex(),
            address: self.formatter.format_address(key_pair.public_key()),
        };

        debug!(
            address = %result.address,
            wif_version = self.params().wif_version,
            address_version = self.params().address_version,
            "derivation complete"
        );
        Ok(result)
    }
}

impl Default for Deriver {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl fmt::Debug for Deriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deriver")
            .field("params", &self.params())
            .field("key_format", &self.key_format())
            .finish()
    }
}

/// Derive with mainnet version bytes and uncompressed public keys.
///
/// Builds a fresh context on every call; hold a [`Deriver`] when deriving
/// many passphrases.
pub fn derive(passphrase: &str) -> Result<DerivationResult> {
    Deriver::mainnet().derive(passphrase)
}
