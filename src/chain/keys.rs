//! Private keys and the key factory used for transaction signing.
//!
//! # Security
//! - Key bytes are never logged; `Debug` prints only the address
//! - Fresh keys are drawn from the operating system RNG

use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, SignerSync};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

use crate::chain::types::{BuildError, KeyError};

/// Length of a secp256k1 private key in bytes.
pub const PRIVATE_KEY_LEN: usize = 32;

/// A secp256k1 private key. Its address is the sender of signed transactions.
#[derive(Clone)]
pub struct PrivateKey {
    signer: PrivateKeySigner,
}

impl PrivateKey {
    /// Parse a key from its 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(KeyError::Malformed(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_LEN,
                bytes.len()
            )));
        }

        let signer = PrivateKeySigner::from_slice(bytes)
            .map_err(|e| KeyError::Malformed(e.to_string()))?;
        Ok(Self { signer })
    }

    /// The address derived from this key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The key's 32-byte scalar.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.signer.to_bytes().to_vec()
    }

    /// Sign a 32-byte digest.
    pub fn sign_hash(&self, hash: &B256) -> Result<Signature, BuildError> {
        self.signer
            .sign_hash_sync(hash)
            .map_err(|e| BuildError::Signing(e.to_string()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address())
            .finish()
    }
}

/// Creates and parses signing keys.
pub trait KeyFactory: Send + Sync {
    /// Generate a fresh private key.
    fn new_private_key(&self) -> Result<PrivateKey, KeyError>;

    /// Parse key material supplied by a caller.
    fn to_private_key(&self, bytes: &[u8]) -> Result<PrivateKey, KeyError>;
}

/// Key factory for secp256k1 keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1KeyFactory;

impl KeyFactory for Secp256k1KeyFactory {
    fn new_private_key(&self) -> Result<PrivateKey, KeyError> {
        let mut bytes = [0u8; PRIVATE_KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| KeyError::Generation(e.to_string()))?;

        // Rejects the zero scalar and values at or above the curve order.
        let signer = PrivateKeySigner::from_slice(&bytes)
            .map_err(|e| KeyError::Generation(e.to_string()))?;
        Ok(PrivateKey { signer })
    }

    fn to_private_key(&self, bytes: &[u8]) -> Result<PrivateKey, KeyError> {
        PrivateKey::from_bytes(bytes)
    }
}
