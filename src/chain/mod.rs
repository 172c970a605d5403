//! Chain-side collaborators of the submission pipeline.
//!
//! # Data Flow
//! ```text
//! keys.rs (parse / generate secp256k1 keys)
//!     → tx.rs (encode, sign, derive ID)
//!     → pool.rs (pending transactions, append-only for submitters)
//!     → notify.rs (block-ready signal, never blocks)
//!     → producer.rs (drain pool into blocks)
//!     → store.rs (accepted transactions, lookup by ID)
//! ```
//!
//! # Security Constraints
//! - Private keys are never logged or serialized by this module
//! - Every transaction is signed before it reaches the pool

pub mod keys;
pub mod notify;
pub mod pool;
pub mod producer;
pub mod store;
pub mod tx;
pub mod types;

pub use keys::{KeyFactory, PrivateKey, Secp256k1KeyFactory};
pub use notify::{BlockNotifier, ChannelNotifier};
pub use pool::PendingPool;
pub use producer::BlockProducer;
pub use store::{MemoryTxStore, TxStore};
pub use tx::{SignedTxFactory, Tx, TxFactory, TxKind, TxPayload, TxRecord};
pub use types::{BuildError, Id, KeyError, TxStatus};
