//! CB58 text encoding for binary payloads.
//!
//! CB58 is base58 over `bytes || checksum`, where the checksum is the last
//! four bytes of `sha256(bytes)`. Keys, contract modules and byte arguments
//! all travel over the wire in this form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of the checksum suffix in bytes.
pub const CHECKSUM_LEN: usize = 4;

/// Errors produced while decoding a CB58 string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Cb58Error {
    /// The input contains characters outside the base58 alphabet.
    #[error("invalid base58: {0}")]
    Base58(String),

    /// The decoded payload is shorter than the checksum.
    #[error("input too short to carry a checksum")]
    MissingChecksum,

    /// The checksum does not match the payload.
    #[error("checksum mismatch")]
    BadChecksum,
}

/// Binary payload that serializes as a CB58 string.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Cb58(pub Vec<u8>);

impl Cb58 {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode raw bytes to their CB58 string form.
    pub fn encode(bytes: &[u8]) -> String {
        let mut buf = Vec::with_capacity(bytes.len() + CHECKSUM_LEN);
        buf.extend_from_slice(bytes);
        buf.extend_from_slice(&checksum(bytes));
        bs58::encode(buf).into_string()
    }

    /// Decode a CB58 string, verifying its checksum.
    ///
    /// The empty string decodes to an empty payload so that optional byte
    /// fields can be left blank by callers.
    pub fn decode(s: &str) -> Result<Vec<u8>, Cb58Error> {
        if s.is_empty() {
            return Ok(Vec::new());
        }

        let raw = bs58::decode(s)
            .into_vec()
            .map_err(|e| Cb58Error::Base58(e.to_string()))?;
        if raw.len() < CHECKSUM_LEN {
            return Err(Cb58Error::MissingChecksum);
        }

        let (payload, sum) = raw.split_at(raw.len() - CHECKSUM_LEN);
        if checksum(payload) != sum {
            return Err(Cb58Error::BadChecksum);
        }
        Ok(payload.to_vec())
    }
}

fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(bytes);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    out
}

impl From<Vec<u8>> for Cb58 {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Cb58 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str(&Self::encode(&self.0))
    }
}

impl fmt::Debug for Cb58 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cb58({} bytes)", self.0.len())
    }
}

impl FromStr for Cb58 {
    type Err = Cb58Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s).map(Self)
    }
}

impl Serialize for Cb58 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cb58 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let payload = b"wasm bytes".to_vec();
        let encoded = Cb58::encode(&payload);
        assert_eq!(Cb58::decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_checksum_is_verified() {
        let mut encoded = Cb58::encode(&[1, 2, 3, 4, 5]).into_bytes();
        // Flip one base58 character to corrupt the payload or checksum.
        let last = encoded.len() - 1;
        encoded[last] = if encoded[last] == b'2' { b'3' } else { b'2' };
        let corrupted = String::from_utf8(encoded).unwrap();
        assert!(Cb58::decode(&corrupted).is_err());
    }

    #[test]
    fn test_invalid_alphabet() {
        let err = Cb58::decode("0OIl").unwrap_err();
        assert!(matches!(err, Cb58Error::Base58(_)));
    }

    #[test]
    fn test_empty_string_is_empty_payload() {
        assert!(Cb58::decode("").unwrap().is_empty());
        assert_eq!(Cb58::default().to_string(), "");
    }

    #[test]
    fn test_serde_as_string() {
        let value = Cb58::new(vec![9u8; 16]);
        let json = serde_json::to_string(&value).unwrap();
        assert!(json.starts_with('"'));
        let decoded: Cb58 = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, value);
    }
}
