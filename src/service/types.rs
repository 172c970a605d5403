//! Request and response payloads of the service operations.

use serde::{Deserialize, Serialize};

use crate::args::ArgApi;
use crate::chain::tx::TxRecord;
use crate::chain::types::Id;
use crate::encoding::Cb58;
use crate::service::error::ServiceError;

/// Parameters of `createAccount`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateAccountArgs {}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountResponse {
    /// The new private key.
    pub private_key: Cb58,
}

/// Parameters of `invoke`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeArgs {
    /// Contract to invoke.
    #[serde(rename = "contractID", default)]
    pub contract_id: Id,

    /// Function in the contract to invoke.
    #[serde(default)]
    pub function: String,

    /// Key signing the invocation; its address is the sender.
    /// Must be the 32-byte scalar of a secp256k1 key.
    #[serde(default)]
    pub private_key: Cb58,

    /// Integer arguments to the function.
    #[serde(default)]
    pub args: Vec<ArgApi>,

    /// Byte arguments to the function.
    #[serde(default)]
    pub byte_args: Cb58,
}

impl InvokeArgs {
    /// Structural checks that need no coercion or key parsing.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.contract_id.is_empty() {
            return Err(ServiceError::Validation("contractID not specified".to_string()));
        }
        if self.function.is_empty() {
            return Err(ServiceError::Validation("function not specified".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvokeResponse {
    #[serde(rename = "txID")]
    pub tx_id: Id,
}

/// Parameters of `createContract`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractArgs {
    /// The contract's wasm module.
    #[serde(default)]
    pub contract: Cb58,

    /// Key of the sender of this transaction.
    #[serde(default)]
    pub private_key: Cb58,
}

/// The contract's ID is the ID of the transaction that creates it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateContractResponse {
    #[serde(rename = "txID")]
    pub tx_id: Id,
}

/// Parameters of `getTx`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GetTxArgs {
    pub id: Id,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GetTxResponse {
    pub tx: TxRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_args_defaults() {
        let args: InvokeArgs = serde_json::from_str("{}").unwrap();
        assert!(args.contract_id.is_empty());
        assert!(args.args.is_empty());
        assert!(args.byte_args.is_empty());
    }

    #[test]
    fn test_validate_contract_id() {
        let args = InvokeArgs {
            function: "main".to_string(),
            ..Default::default()
        };
        let err = args.validate().unwrap_err();
        assert!(err.to_string().contains("contractID not specified"));
    }

    #[test]
    fn test_validate_function() {
        let args = InvokeArgs {
            contract_id: Id::digest(b"c"),
            ..Default::default()
        };
        let err = args.validate().unwrap_err();
        assert!(err.to_string().contains("function not specified"));
    }

    #[test]
    fn test_invoke_args_wire_names() {
        let id = Id::digest(b"c");
        let json = serde_json::json!({
            "contractID": id.to_string(),
            "function": "add",
            "privateKey": "",
            "args": [{"type": "int32", "value": 1}],
            "byteArgs": "",
        });
        let args: InvokeArgs = serde_json::from_value(json).unwrap();
        assert_eq!(args.contract_id, id);
        assert_eq!(args.function, "add");
        assert_eq!(args.args.len(), 1);
        assert!(args.validate().is_ok());
    }
}
