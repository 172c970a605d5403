//! Coercion of wire values into typed function arguments.
//!
//! The VM accepts exactly two argument types. Each declared type has one arm
//! in [`coerce`]; supporting a new type means adding an arm here and a
//! variant to [`TypedArg`], nothing else in the pipeline changes.
//!
//! Narrowing follows Rust `as` semantics: integers wrap (two's complement),
//! floats truncate toward zero and saturate at the target bounds, NaN is 0.

use thiserror::Error;

use crate::args::types::{TypedArg, WireValue};

/// Declared types accepted by the VM.
pub const SUPPORTED_TYPES: &[&str] = &["int32", "int64"];

/// Errors produced while coercing a single argument.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoerceError {
    /// The declared type is not one the VM understands.
    #[error("arg type must be one of: int32, int64")]
    UnsupportedType(String),

    /// The value cannot be represented as the declared type.
    #[error("value '{value}' is not convertible to {target}")]
    NotConvertible {
        value: WireValue,
        target: &'static str,
    },
}

/// Coerce a `(type, value)` pair into a typed argument.
///
/// The type tag is matched case-insensitively.
pub fn coerce(type_tag: &str, raw: &WireValue) -> Result<TypedArg, CoerceError> {
    match type_tag.to_ascii_lowercase().as_str() {
        "int32" => match *raw {
            WireValue::Int32(v) => Ok(TypedArg::Int32(v)),
            WireValue::Int64(v) => Ok(TypedArg::Int32(v as i32)),
            WireValue::Float32(v) => Ok(TypedArg::Int32(v as i32)),
            WireValue::Float64(v) => Ok(TypedArg::Int32(v as i32)),
            WireValue::Other(_) => Err(not_convertible(raw, "int32")),
        },
        "int64" => match *raw {
            WireValue::Int32(v) => Ok(TypedArg::Int64(i64::from(v))),
            WireValue::Int64(v) => Ok(TypedArg::Int64(v)),
            WireValue::Float32(v) => Ok(TypedArg::Int64(v as i64)),
            WireValue::Float64(v) => Ok(TypedArg::Int64(v as i64)),
            WireValue::Other(_) => Err(not_convertible(raw, "int64")),
        },
        _ => Err(CoerceError::UnsupportedType(type_tag.to_string())),
    }
}

fn not_convertible(raw: &WireValue, target: &'static str) -> CoerceError {
    CoerceError::NotConvertible {
        value: raw.clone(),
        target,
    }
}
