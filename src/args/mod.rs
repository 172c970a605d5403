//! Contract function arguments.
//!
//! # Data Flow
//! ```text
//! JSON {"type": ..., "value": ...}
//!     → types.rs (ArgApi / WireValue)
//!     → coerce.rs (declared type + wire value → TypedArg)
//!     → transaction builder
//! ```

pub mod coerce;
pub mod types;

pub use coerce::{coerce, CoerceError, SUPPORTED_TYPES};
pub use types::{ArgApi, TypedArg, WireValue};
