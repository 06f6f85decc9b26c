//! # Network Configuration & Constants
//!
//! Every magic number in the derivation pipeline lives here. Version bytes,
//! payload lengths, the WIF compression marker: if it is a constant of the
//! target network, it is defined in this module and nowhere else.
//!
//! The version bytes are grouped into [`NetworkParams`], which is passed
//! explicitly into the address formatter. Supporting another Base58Check
//! network is a matter of constructing a different `NetworkParams`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Version Bytes
// ---------------------------------------------------------------------------

/// Mainnet WIF private key prefix. Uncompressed mainnet WIF strings start
/// with `5`, compressed ones with `K` or `L`.
pub const MAINNET_WIF_VERSION: u8 = 0x80;

/// Mainnet P2PKH address prefix. Addresses start with `1`.
pub const MAINNET_ADDRESS_VERSION: u8 = 0x00;

/// Testnet WIF private key prefix (`9` uncompressed, `c` compressed).
pub const TESTNET_WIF_VERSION: u8 = 0xEF;

/// Testnet P2PKH address prefix (`m` or `n`).
pub const TESTNET_ADDRESS_VERSION: u8 = 0x6F;

/// Suffix appended to the WIF payload when the matching public key is
/// serialized in compressed form.
pub const COMPRESSED_WIF_SUFFIX: u8 = 0x01;

// ---------------------------------------------------------------------------
// Lengths
// ---------------------------------------------------------------------------

/// A private key is a SHA-256 digest: always 32 bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// SEC1 compressed public key: `02/03 || X`.
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;

/// SEC1 uncompressed public key: `04 || X || Y`.
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// RIPEMD-160(SHA-256(pubkey)).
pub const PUBKEY_HASH_LENGTH: usize = 20;

/// Base58Check checksum: first 4 bytes of the double SHA-256.
pub const CHECKSUM_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Networks
// ---------------------------------------------------------------------------

/// The networks the pipeline knows version bytes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Version bytes for this network.
    pub fn params(self) -> NetworkParams {
        match self {
            Network::Mainnet => NetworkParams::MAINNET,
            Network::Testnet => NetworkParams::TESTNET,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" | "test" | "testnet3" => Ok(Network::Testnet),
            other => Err(format!(
                "unknown network '{}': expected 'mainnet' or 'testnet'",
                other
            )),
        }
    }
}

/// The version bytes that distinguish one Base58Check network from another.
///
/// ```
/// use brainaudit_core::config::{NetworkParams, MAINNET_WIF_VERSION};
///
/// let params = NetworkParams::default();
/// assert_eq!(params.wif_version, MAINNET_WIF_VERSION);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Prefix byte of WIF-encoded private keys.
    pub wif_version: u8,
    /// Prefix byte of P2PKH addresses.
    pub address_version: u8,
}

impl NetworkParams {
    pub const MAINNET: Self = Self::new(MAINNET_WIF_VERSION, MAINNET_ADDRESS_VERSION);
    pub const TESTNET: Self = Self::new(TESTNET_WIF_VERSION, TESTNET_ADDRESS_VERSION);

    /// Arbitrary version bytes, for networks not listed in [`Network`].
    pub const fn new(wif_version: u8, address_version: u8) -> Self {
        Self {
            wif_version,
            address_version,
        }
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self::MAINNET
    }
}

impl From<Network> for NetworkParams {
    fn from(network: Network) -> Self {
        network.params()
    }
}
