//! WASM VM node service library.
//!
//! Accepts contract deployments and invocations over JSON-RPC, coerces their
//! loosely typed arguments, signs them into transactions and queues them for
//! the block producer.

pub mod args;
pub mod chain;
pub mod config;
pub mod encoding;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod service;

pub use config::schema::NodeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::Service;
