//! JSON-RPC 2.0 envelope and method dispatch.
//!
//! Params may be given as an object or as a one-element array holding the
//! object; `null` or missing params count as `{}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::service::{CreateAccountArgs, Service, ServiceError};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const SERVER_ERROR: i64 = -32000;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: impl Into<Value>) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Value,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(PARSE_ERROR, format!("parse error: {detail}"))
    }

    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        Self::new(INVALID_REQUEST, format!("invalid request: {detail}"))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("method not found: {method}"))
    }

    pub fn invalid_params(detail: impl std::fmt::Display) -> Self {
        Self::new(INVALID_PARAMS, format!("invalid params: {detail}"))
    }

    pub fn server(detail: impl std::fmt::Display) -> Self {
        Self::new(SERVER_ERROR, detail.to_string())
    }
}

impl From<ServiceError> for RpcError {
    fn from(err: ServiceError) -> Self {
        let code = if err.is_caller_error() {
            INVALID_PARAMS
        } else {
            SERVER_ERROR
        };
        Self {
            code,
            message: err.to_string(),
            data: Some(json!({ "kind": err.kind() })),
        }
    }
}

/// Route one request to its service operation.
pub fn dispatch(service: &Service, request: RpcRequest) -> RpcResponse {
    let RpcRequest {
        jsonrpc,
        method,
        params,
        id,
    } = request;

    if jsonrpc.as_deref() != Some("2.0") {
        return RpcResponse::failure(id, RpcError::invalid_request("jsonrpc must be \"2.0\""));
    }

    let result = match method.as_str() {
        "wasm.createAccount" => call(params, |_: CreateAccountArgs| service.create_account()),
        "wasm.invoke" => call(params, |args| service.invoke(args)),
        "wasm.createContract" => call(params, |args| service.create_contract(args)),
        "wasm.getTx" => call(params, |args| service.get_tx(args)),
        other => Err(RpcError::method_not_found(other)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(error) => RpcResponse::failure(id, error),
    }
}

fn call<A, R, F>(params: Value, op: F) -> Result<Value, RpcError>
where
    A: DeserializeOwned,
    R: Serialize,
    F: FnOnce(A) -> Result<R, ServiceError>,
{
    let args = parse_params(params)?;
    let reply = op(args)?;
    serde_json::to_value(reply).map_err(RpcError::server)
}

fn parse_params<A: DeserializeOwned>(params: Value) -> Result<A, RpcError> {
    let params = match params {
        Value::Array(mut items) => match items.len() {
            0 => Value::Null,
            1 => items.remove(0),
            n => {
                return Err(RpcError::invalid_params(format!(
                    "expected one params object, got {n}"
                )))
            }
        },
        other => other,
    };
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params).map_err(RpcError::invalid_params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{GetTxArgs, InvokeArgs};

    #[test]
    fn test_params_forms() {
        let id = crate::chain::Id::digest(b"tx").to_string();
        let from_object: GetTxArgs = parse_params(json!({"id": id})).unwrap();
        let from_array: GetTxArgs = parse_params(json!([{"id": id}])).unwrap();
        assert_eq!(from_object.id, from_array.id);

        let _: CreateAccountArgs = parse_params(Value::Null).unwrap();
        let _: CreateAccountArgs = parse_params(json!([])).unwrap();
        let _: CreateAccountArgs = parse_params(json!([null])).unwrap();
    }

    #[test]
    fn test_too_many_positional_params() {
        let err = parse_params::<InvokeArgs>(json!([{}, {}])).unwrap_err();
        assert_eq!(err.code, INVALID_PARAMS);
    }

    #[test]
    fn test_malformed_params() {
        let err = parse_params::<InvokeArgs>(json!({"args": "not-a-list"})).unwrap_err();
        assert_eq!(err.code, INVALID_PARAMS);
        assert!(err.message.starts_with("invalid params: "));
    }

    #[test]
    fn test_service_error_codes() {
        let caller: RpcError = ServiceError::Validation("function not specified".into()).into();
        assert_eq!(caller.code, INVALID_PARAMS);
        assert_eq!(caller.message, "arguments failed validation: function not specified");
        assert_eq!(caller.data, Some(json!({"kind": "validation"})));

        let missing: RpcError = ServiceError::NotFound(crate::chain::Id::EMPTY).into();
        assert_eq!(missing.code, SERVER_ERROR);
    }

    #[test]
    fn test_response_shape() {
        let ok = serde_json::to_value(RpcResponse::success(json!(1), json!({"a": 1}))).unwrap();
        assert_eq!(ok, json!({"jsonrpc": "2.0", "result": {"a": 1}, "id": 1}));

        let err = serde_json::to_value(RpcResponse::failure(
            Value::Null,
            RpcError::method_not_found("wasm.nope"),
        ))
        .unwrap();
        assert_eq!(err["error"]["code"], json!(METHOD_NOT_FOUND));
        assert!(err.get("result").is_none());
    }
}
