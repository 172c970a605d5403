//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware: request ID, trace, timeout, body limit)
//!     → rpc.rs (JSON-RPC 2.0 envelope → method dispatch → Service)
//!     → JSON-RPC response
//! ```

pub mod request;
pub mod rpc;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use rpc::{RpcError, RpcRequest, RpcResponse};
pub use server::{AppState, HttpServer};
