//! Transaction construction and signing.
//!
//! # Responsibilities
//! - Syntactic verification of invocation and contract-creation payloads
//! - Deterministic encoding of the unsigned payload
//! - Signing with the sender's key and deriving the transaction ID
//!
//! # Encoding
//! ```text
//! unsigned = codec_version:u16 | chain_id:u64 | nonce:u64 | tx_type:u32
//!            | payload | sender:20
//! signed   = unsigned | signature:65
//! id       = sha256(signed)
//! ```
//! Variable-length fields are prefixed with their length as a `u32`; all
//! integers are big-endian.

use alloy::primitives::{Address, B256};
use alloy::signers::Signature;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::args::TypedArg;
use crate::chain::keys::PrivateKey;
use crate::chain::types::{BuildError, Id, TxStatus};
use crate::encoding::Cb58;

/// Codec version written at the start of every transaction.
pub const CODEC_VERSION: u16 = 0;

/// Maximum length of a function name in bytes.
pub const MAX_FUNCTION_LEN: usize = 256;

/// Maximum number of arguments to a single invocation.
pub const MAX_ARGS: usize = 64;

/// Wasm binary magic followed by format version 1.
pub const WASM_HEADER: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

const TX_TYPE_INVOKE: u32 = 0;
const TX_TYPE_CREATE_CONTRACT: u32 = 1;
const ARG_INT32: u8 = 0;
const ARG_INT64: u8 = 1;

/// What a transaction does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxKind {
    /// Call `function` on an already deployed contract.
    Invoke {
        contract_id: Id,
        function: String,
        args: Vec<TypedArg>,
        byte_args: Vec<u8>,
    },
    /// Deploy a new contract. Its ID is the ID of this transaction.
    CreateContract { contract: Vec<u8> },
}

/// A signed transaction.
#[derive(Debug, Clone)]
pub struct Tx {
    kind: TxKind,
    nonce: u64,
    sender: Address,
    signature: Signature,
    bytes: Vec<u8>,
    id: Id,
}

impl Tx {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> &TxKind {
        &self.kind
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Address of the key that signed this transaction.
    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The full signed encoding.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The contract this transaction targets or creates.
    pub fn contract_id(&self) -> Id {
        match &self.kind {
            TxKind::Invoke { contract_id, .. } => *contract_id,
            TxKind::CreateContract { .. } => self.id,
        }
    }

    /// The queryable view of this transaction.
    pub fn record(&self, status: TxStatus) -> TxRecord {
        let payload = match &self.kind {
            TxKind::Invoke {
                contract_id,
                function,
                args,
                byte_args,
            } => TxPayload::Invoke {
                contract_id: *contract_id,
                function: function.clone(),
                args: args.clone(),
                byte_args: Cb58::new(byte_args.clone()),
            },
            TxKind::CreateContract { contract } => TxPayload::CreateContract {
                contract_id: self.id,
                contract_size: contract.len(),
            },
        };

        TxRecord {
            id: self.id,
            sender: self.sender,
            nonce: self.nonce,
            payload,
            status,
        }
    }
}

/// Payload section of a [`TxRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TxPayload {
    #[serde(rename_all = "camelCase")]
    Invoke {
        #[serde(rename = "contractID")]
        contract_id: Id,
        function: String,
        args: Vec<TypedArg>,
        byte_args: Cb58,
    },
    #[serde(rename_all = "camelCase")]
    CreateContract {
        #[serde(rename = "contractID")]
        contract_id: Id,
        contract_size: usize,
    },
}

/// Stored representation of a transaction, returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    pub id: Id,
    pub sender: Address,
    pub nonce: u64,
    #[serde(flatten)]
    pub payload: TxPayload,
    pub status: TxStatus,
}

/// Builds signed transactions from validated inputs.
pub trait TxFactory: Send + Sync {
    /// Construct and sign a contract invocation.
    fn new_invoke_tx(
        &self,
        contract_id: Id,
        function: String,
        args: Vec<TypedArg>,
        byte_args: Vec<u8>,
        key: &PrivateKey,
    ) -> Result<Tx, BuildError>;

    /// Construct and sign a contract deployment.
    fn new_create_contract_tx(&self, contract: Vec<u8>, key: &PrivateKey) -> Result<Tx, BuildError>;
}

/// Transaction factory that signs with secp256k1 over a sha256 digest.
#[derive(Debug)]
pub struct SignedTxFactory {
    chain_id: u64,
    nonce: AtomicU64,
}

impl SignedTxFactory {
    /// Create a factory for the given chain.
    ///
    /// Nonces start from a random offset and increase by one per
    /// transaction, so identical requests still yield distinct IDs.
    pub fn new(chain_id: u64) -> Self {
        Self::with_nonce(chain_id, fastrand::u64(..))
    }

    pub fn with_nonce(chain_id: u64, start: u64) -> Self {
        Self {
            chain_id,
            nonce: AtomicU64::new(start),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn sign(&self, kind: TxKind, key: &PrivateKey) -> Result<Tx, BuildError> {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let sender = key.address();

        let mut bytes = encode_unsigned(self.chain_id, nonce, &kind, &sender)?;
        let hash = B256::from(<[u8; 32]>::from(Sha256::digest(&bytes)));
        let signature = key.sign_hash(&hash)?;
        bytes.extend_from_slice(&signature.as_bytes());
        let id = Id::digest(&bytes);

        tracing::debug!(tx_id = %id, sender = %sender, nonce = nonce, "Transaction signed");

        Ok(Tx {
            kind,
            nonce,
            sender,
            signature,
            bytes,
            id,
        })
    }
}

impl TxFactory for SignedTxFactory {
    fn new_invoke_tx(
        &self,
        contract_id: Id,
        function: String,
        args: Vec<TypedArg>,
        byte_args: Vec<u8>,
        key: &PrivateKey,
    ) -> Result<Tx, BuildError> {
        if function.len() > MAX_FUNCTION_LEN {
            return Err(BuildError::FunctionTooLong {
                len: function.len(),
                max: MAX_FUNCTION_LEN,
            });
        }
        if args.len() > MAX_ARGS {
            return Err(BuildError::TooManyArgs {
                count: args.len(),
                max: MAX_ARGS,
            });
        }

        let kind = TxKind::Invoke {
            contract_id,
            function,
            args,
            byte_args,
        };
        self.sign(kind, key)
    }

    fn new_create_contract_tx(&self, contract: Vec<u8>, key: &PrivateKey) -> Result<Tx, BuildError> {
        verify_module_header(&contract)?;
        self.sign(TxKind::CreateContract { contract }, key)
    }
}

/// Cheap syntactic check that `contract` is a wasm binary.
pub fn verify_module_header(contract: &[u8]) -> Result<(), BuildError> {
    if contract.is_empty() {
        return Err(BuildError::EmptyContract);
    }
    if !contract.starts_with(&WASM_HEADER[..4]) {
        return Err(BuildError::InvalidModule("missing \\0asm magic".to_string()));
    }
    if contract.len() < WASM_HEADER.len() || contract[4..8] != WASM_HEADER[4..] {
        return Err(BuildError::InvalidModule("unsupported binary version".to_string()));
    }
    Ok(())
}

fn encode_unsigned(
    chain_id: u64,
    nonce: u64,
    kind: &TxKind,
    sender: &Address,
) -> Result<Vec<u8>, BuildError> {
    let mut data = Vec::new();
    data.extend_from_slice(&CODEC_VERSION.to_be_bytes());
    data.extend_from_slice(&chain_id.to_be_bytes());
    data.extend_from_slice(&nonce.to_be_bytes());

    match kind {
        TxKind::Invoke {
            contract_id,
            function,
            args,
            byte_args,
        } => {
            data.extend_from_slice(&TX_TYPE_INVOKE.to_be_bytes());
            data.extend_from_slice(contract_id.as_bytes());
            put_bytes(&mut data, function.as_bytes())?;
            put_len(&mut data, args.len())?;
            for arg in args {
                match arg {
                    TypedArg::Int32(v) => {
                        data.push(ARG_INT32);
                        data.extend_from_slice(&v.to_be_bytes());
                    }
                    TypedArg::Int64(v) => {
                        data.push(ARG_INT64);
                        data.extend_from_slice(&v.to_be_bytes());
                    }
                }
            }
            put_bytes(&mut data, byte_args)?;
        }
        TxKind::CreateContract { contract } => {
            data.extend_from_slice(&TX_TYPE_CREATE_CONTRACT.to_be_bytes());
            put_bytes(&mut data, contract)?;
        }
    }

    data.extend_from_slice(sender.as_slice());
    Ok(data)
}

fn put_len(data: &mut Vec<u8>, len: usize) -> Result<(), BuildError> {
    let prefix = u32::try_from(len).map_err(|_| BuildError::FieldTooLarge { len })?;
    data.extend_from_slice(&prefix.to_be_bytes());
    Ok(())
}

fn put_bytes(data: &mut Vec<u8>, bytes: &[u8]) -> Result<(), BuildError> {
    put_len(data, bytes.len())?;
    data.extend_from_slice(bytes);
    Ok(())
}
