//! Chain identifiers and error definitions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::encoding::{Cb58, Cb58Error};

/// Length of an identifier in bytes.
pub const ID_LEN: usize = 32;

/// 32-byte identifier for transactions and contracts.
///
/// The text form is CB58. The all-zero value is the "not specified" sentinel.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub [u8; ID_LEN]);

impl Id {
    /// The all-zero sentinel.
    pub const EMPTY: Id = Id([0u8; ID_LEN]);

    /// Identifier derived as the sha256 digest of `bytes`.
    pub fn digest(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }
}

impl From<[u8; ID_LEN]> for Id {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Cb58::encode(&self.0))
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}

/// Errors parsing an [`Id`] from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseIdError {
    #[error(transparent)]
    Encoding(#[from] Cb58Error),

    #[error("expected {ID_LEN} bytes, got {0}")]
    Length(usize),
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = Cb58::decode(s)?;
        let array: [u8; ID_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseIdError::Length(bytes.len()))?;
        Ok(Self(array))
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An empty string deserializes to [`Id::EMPTY`], which validation then
/// reports as "not specified".
impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Self::EMPTY);
        }
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Lifecycle status of a stored transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Admitted to the pending pool, not yet in a block.
    Processing,
    /// Included in a block by the producer.
    Accepted,
}

/// Errors from key generation and parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Key bytes are not a valid secp256k1 scalar.
    #[error("malformed key material: {0}")]
    Malformed(String),

    /// The key generator could not produce a key.
    #[error("key generation failed: {0}")]
    Generation(String),
}

/// Errors from transaction construction and signing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("function name is {len} bytes, maximum is {max}")]
    FunctionTooLong { len: usize, max: usize },

    #[error("{count} arguments supplied, maximum is {max}")]
    TooManyArgs { count: usize, max: usize },

    #[error("contract bytes are empty")]
    EmptyContract,

    #[error("contract is not a wasm module: {0}")]
    InvalidModule(String),

    #[error("signing failed: {0}")]
    Signing(String),

    /// A variable-length field does not fit the `u32` length prefix.
    #[error("field of {len} bytes exceeds the encodable maximum of {} bytes", u32::MAX)]
    FieldTooLarge { len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sentinel() {
        assert!(Id::EMPTY.is_empty());
        assert!(Id::default().is_empty());
        assert!(!Id::digest(b"tx").is_empty());
    }

    #[test]
    fn test_id_text_form() {
        let id = Id::digest(b"contract");
        let parsed: Id = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_wrong_length() {
        let short = Cb58::encode(&[1, 2, 3]);
        assert_eq!(short.parse::<Id>().unwrap_err(), ParseIdError::Length(3));
    }

    #[test]
    fn test_id_serde() {
        let id = Id::digest(b"serde");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let blank: Id = serde_json::from_str("\"\"").unwrap();
        assert!(blank.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = BuildError::TooManyArgs { count: 70, max: 64 };
        assert_eq!(err.to_string(), "70 arguments supplied, maximum is 64");
        assert!(KeyError::Malformed("bad".into()).to_string().contains("bad"));
    }
}
