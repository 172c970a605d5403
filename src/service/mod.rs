//! Submission and query service.
//!
//! # Data Flow
//! ```text
//! RPC params
//!     → types.rs (InvokeArgs, CreateContractArgs, GetTxArgs)
//!     → builder.rs (validate → coerce → resolve key → sign)
//!     → submit.rs (append to pending pool → notify block producer)
//! ```
//!
//! Calls flow strictly downward: service → builder → argument coercion.

pub mod builder;
pub mod error;
pub mod submit;
pub mod types;

pub use builder::TxBuilder;
pub use error::ServiceError;
pub use submit::Service;
pub use types::{
    CreateAccountArgs, CreateAccountResponse, CreateContractArgs, CreateContractResponse,
    GetTxArgs, GetTxResponse, InvokeArgs, InvokeResponse,
};
