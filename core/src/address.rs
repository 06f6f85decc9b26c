//! # Address Formatting
//!
//! Turns key material into the two Base58Check strings a brainwallet user
//! actually sees:
//!
//! ```text
//! WIF      = base58( wif_version     || private_key [|| 0x01] || checksum )
//! address  = base58( address_version || hash160(public_key)   || checksum )
//! checksum = sha256(sha256(version || payload))[..4]
//! ```
//!
//! The trailing `0x01` on the WIF payload is present only when the public
//! key is compressed, so that wallet software importing the WIF derives the
//! same address we printed.
//!
//! The version bytes come from [`NetworkParams`]; nothing in this module
//! hardcodes a network.

use crate::config::{
    NetworkParams, CHECKSUM_LENGTH, COMPRESSED_WIF_SUFFIX, PRIVATE_KEY_LENGTH, PUBKEY_HASH_LENGTH,
};
use crate::crypto::base58;
use crate::crypto::hash::checksum;
use crate::crypto::keys::{PrivateKey, PublicKey, PublicKeyFormat};
use crate::error::{DerivationError, Result};

/// `version || payload || checksum(version || payload)`.
///
/// ```
/// use brainaudit_core::address::version_and_checksum;
///
/// let framed = version_and_checksum(0x00, &[0u8; 20]);
/// assert_eq!(framed.len(), 1 + 20 + 4);
/// assert_eq!(framed[0], 0x00);
/// ```
pub fn version_and_checksum(version: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LENGTH);
    data.push(version);
    data.extend_from_slice(payload);
    let sum = checksum(&data);
    data.extend_from_slice(&sum);
    data
}

/// Formats (and parses) WIF private keys and P2PKH addresses for one
/// network and one public key format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFormatter {
    params: NetworkParams,
    key_format: PublicKeyFormat,
}

impl AddressFormatter {
    pub fn new(params: NetworkParams, key_format: PublicKeyFormat) -> Self {
        Self { params, key_format }
    }

    pub fn params(&self) -> NetworkParams {
        self.params
    }

    pub fn key_format(&self) -> PublicKeyFormat {
        self.key_format
    }

    /// Wallet Import Format for `private_key`.
    pub fn format_wif(&self, private_key: &PrivateKey) -> String {
        let mut payload = Vec::with_capacity(PRIVATE_KEY_LENGTH + 1);
        payload.extend_from_slice(private_key.as_bytes());
        if self.key_format.is_compressed() {
            payload.push(COMPRESSED_WIF_SUFFIX);
        }
        base58::encode(&version_and_checksum(self.params.wif_version, &payload))
    }

    /// P2PKH address for `public_key`, hashing the bytes in whatever
    /// encoding the key carries.
    pub fn format_address(&self, public_key: &PublicKey) -> String {
        self.format_address_from_hash(&public_key.hash160())
    }

    /// P2PKH address for an already-computed HASH160.
    pub fn format_address_from_hash(&self, pubkey_hash: &[u8; PUBKEY_HASH_LENGTH]) -> String {
        base58::encode(&version_and_checksum(self.params.address_version, pubkey_hash))
    }

    /// Decode a WIF string produced for this network and key format.
    ///
    /// Checks, in order: Base58 alphabet, checksum, length, version byte,
    /// compression flag. The scalar itself is not range-checked here.
    pub fn parse_wif(&self, wif: &str) -> Result<PrivateKey> {
        let expected_len = 1 + PRIVATE_KEY_LENGTH + usize::from(self.key_format.is_compressed());
        let data = self.decode_versioned(wif, self.params.wif_version, expected_len)?;

        if self.key_format.is_compressed() {
            let flag = data[expected_len - 1];
            if flag != COMPRESSED_WIF_SUFFIX {
                return Err(DerivationError::InvalidCompressionFlag { flag });
            }
        }

        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        bytes.copy_from_slice(&data[1..1 + PRIVATE_KEY_LENGTH]);
        Ok(PrivateKey::from_bytes(bytes))
    }

    /// Decode a P2PKH address for this network into its HASH160.
    pub fn parse_address(&self, address: &str) -> Result<[u8; PUBKEY_HASH_LENGTH]> {
        let data =
            self.decode_versioned(address, self.params.address_version, 1 + PUBKEY_HASH_LENGTH)?;
        let mut hash = [0u8; PUBKEY_HASH_LENGTH];
        hash.copy_from_slice(&data[1..]);
        Ok(hash)
    }

    fn decode_versioned(&self, encoded: &str, version: u8, expected_len: usize) -> Result<Vec<u8>> {
        let data = base58::decode_check(encoded)?;
        if data.len() != expected_len {
            return Err(DerivationError::InvalidPayloadLength {
                expected: expected_len,
                actual: data.len(),
            });
        }
        if data[0] != version {
            return Err(DerivationError::VersionMismatch {
                expected: version,
                actual: data[0],
            });
        }
        Ok(data)
    }
}

impl Default for AddressFormatter {
    fn default() -> Self {
        Self::new(NetworkParams::MAINNET, PublicKeyFormat::Uncompressed)
    }
}
