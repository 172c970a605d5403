//! Wire and typed representations of contract function arguments.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

use crate::args::coerce::{coerce, CoerceError};

/// A raw argument value as it arrives from the caller.
///
/// JSON integers that fit in 32 bits decode as `Int32`, wider integers as
/// `Int64`, and everything else numeric as `Float64`. Non-numeric values are
/// kept in `Other` so they can be reported back when coercion rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum WireValue {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Other(Value),
}

impl From<Value> for WireValue {
    fn from(value: Value) -> Self {
        let n = match value {
            Value::Number(n) => n,
            other => return WireValue::Other(other),
        };

        if let Some(v) = n.as_i64() {
            return match i32::try_from(v) {
                Ok(small) => WireValue::Int32(small),
                Err(_) => WireValue::Int64(v),
            };
        }
        match n.as_f64() {
            Some(f) => WireValue::Float64(f),
            None => WireValue::Other(Value::Number(n)),
        }
    }
}

impl From<WireValue> for Value {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Int32(v) => Value::from(v),
            WireValue::Int64(v) => Value::from(v),
            WireValue::Float32(v) => Number::from_f64(f64::from(v)).map_or(Value::Null, Value::Number),
            WireValue::Float64(v) => Number::from_f64(v).map_or(Value::Null, Value::Number),
            WireValue::Other(v) => v,
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Int32(v) => write!(f, "{}", v),
            WireValue::Int64(v) => write!(f, "{}", v),
            WireValue::Float32(v) => write!(f, "{}", v),
            WireValue::Float64(v) => write!(f, "{}", v),
            WireValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// A function argument after coercion to a VM type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedArg {
    Int32(i32),
    Int64(i64),
}

impl TypedArg {
    /// The declared type name of this argument.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedArg::Int32(_) => "int32",
            TypedArg::Int64(_) => "int64",
        }
    }
}

/// API representation of a function argument: a declared type and a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgApi {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: WireValue,
}

impl ArgApi {
    pub fn new(type_tag: impl Into<String>, value: WireValue) -> Self {
        Self {
            type_tag: type_tag.into(),
            value,
        }
    }

    /// Convert to the typed argument passed to the contract function.
    pub fn to_fn_arg(&self) -> Result<TypedArg, CoerceError> {
        coerce(&self.type_tag, &self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_value_from_json() {
        assert_eq!(WireValue::from(serde_json::json!(7)), WireValue::Int32(7));
        assert_eq!(
            WireValue::from(serde_json::json!(5_000_000_000i64)),
            WireValue::Int64(5_000_000_000)
        );
        assert_eq!(WireValue::from(serde_json::json!(3.5)), WireValue::Float64(3.5));
        assert_eq!(
            WireValue::from(serde_json::json!("x")),
            WireValue::Other(serde_json::json!("x"))
        );
    }

    #[test]
    fn test_u64_beyond_i64_is_float() {
        let value = WireValue::from(serde_json::json!(u64::MAX));
        assert!(matches!(value, WireValue::Float64(_)));
    }

    #[test]
    fn test_arg_api_deserialize() {
        let arg: ArgApi = serde_json::from_str(r#"{"type":"int32","value":7}"#).unwrap();
        assert_eq!(arg.type_tag, "int32");
        assert_eq!(arg.to_fn_arg().unwrap(), TypedArg::Int32(7));
    }

    #[test]
    fn test_typed_arg_json_shape() {
        let json = serde_json::to_value(TypedArg::Int64(-4)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "int64", "value": -4}));
    }
}
