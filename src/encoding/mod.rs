//! Text encodings for binary values that cross the RPC boundary.

pub mod cb58;

pub use cb58::{Cb58, Cb58Error};
