//! # Base58 and Base58Check
//!
//! Base58 is the Bitcoin alphabet: the 62 alphanumerics minus `0`, `O`, `I`
//! and `l`. The input bytes are read as one big-endian unsigned integer, and
//! every leading zero byte becomes a leading `1`. Digit conversion is done by
//! the `bs58` crate with its Bitcoin alphabet; the checksum framing is ours.
//!
//! Base58Check appends `checksum(payload)` (see [`super::hash::checksum`])
//! before encoding, and verifies it after decoding.

use thiserror::Error;

use super::hash::checksum;
use crate::config::CHECKSUM_LENGTH;

/// The Bitcoin Base58 alphabet.
pub const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Errors from decoding Base58 or Base58Check strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("invalid base58 character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },

    #[error("base58check data too short: {len} bytes, need at least 4")]
    TooShort { len: usize },

    #[error("base58check checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Checksum recomputed over the payload (hex).
        expected: String,
        /// Checksum found in the trailing four bytes (hex).
        actual: String,
    },

    #[error("malformed base58 input: {0}")]
    Malformed(String),
}

/// Encode bytes as Base58.
///
/// ```
/// use brainaudit_core::crypto::base58;
///
/// assert_eq!(base58::encode(b"hello world"), "StV1DL6CwTryKyV");
/// assert_eq!(base58::encode(&[0, 0, 1]), "112");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    bs58::encode(bytes)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string()
}

/// Decode a Base58 string.
pub fn decode(encoded: &str) -> Result<Vec<u8>, EncodingError> {
    bs58::decode(encoded)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| match e {
            bs58::decode::Error::InvalidCharacter { character, index } => {
                EncodingError::InvalidCharacter { character, index }
            }
            bs58::decode::Error::NonAsciiCharacter { index } => EncodingError::InvalidCharacter {
                character: encoded
                    .get(index..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
                index,
            },
            other => EncodingError::Malformed(other.to_string()),
        })
}

/// Append the 4-byte checksum to `payload` and encode the result.
pub fn encode_check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LENGTH);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    encode(&data)
}

/// Decode a Base58Check string, verify its checksum, and return the payload
/// with the checksum stripped.
pub fn decode_check(encoded: &str) -> Result<Vec<u8>, EncodingError> {
    let mut data = decode(encoded)?;
    if data.len() < CHECKSUM_LENGTH {
        return Err(EncodingError::TooShort { len: data.len() });
    }

    let found = data.split_off(data.len() - CHECKSUM_LENGTH);
    let expected = checksum(&data);
    if found.as_slice() != expected.as_slice() {
        return Err(EncodingError::ChecksumMismatch {
            expected: hex::encode(expected),
            actual: hex::encode(found),
        });
    }

    Ok(data)
}
