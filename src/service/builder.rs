//! Transaction builder: request → signed transaction.
//!
//! # Invocation steps
//! 1. Structural validation (no coercion or key parsing before this passes)
//! 2. Coerce every argument in order, stopping at the first failure
//! 3. Parse the signing key
//! 4. Delegate to the transaction factory
//!
//! Contract creation skips steps 1 and 2.

use std::sync::Arc;

use crate::args::{ArgApi, TypedArg};
use crate::chain::keys::KeyFactory;
use crate::chain::tx::{Tx, TxFactory};
use crate::service::error::ServiceError;
use crate::service::types::{CreateContractArgs, InvokeArgs};

/// Turns submission requests into signed transactions.
#[derive(Clone)]
pub struct TxBuilder {
    keys: Arc<dyn KeyFactory>,
    txs: Arc<dyn TxFactory>,
}

impl TxBuilder {
    pub fn new(keys: Arc<dyn KeyFactory>, txs: Arc<dyn TxFactory>) -> Self {
        Self { keys, txs }
    }

    /// The key factory this builder resolves signing keys with.
    pub fn keys(&self) -> &dyn KeyFactory {
        self.keys.as_ref()
    }

    /// Build a signed contract invocation.
    pub fn build_invocation(&self, req: InvokeArgs) -> Result<Tx, ServiceError> {
        req.validate()?;

        let args = coerce_args(&req.args)?;

        let key = self
            .keys
            .to_private_key(req.private_key.as_bytes())
            .map_err(ServiceError::Key)?;

        let tx = self.txs.new_invoke_tx(
            req.contract_id,
            req.function,
            args,
            req.byte_args.into_bytes(),
            &key,
        )?;
        Ok(tx)
    }

    /// Build a signed contract deployment.
    pub fn build_creation(&self, req: CreateContractArgs) -> Result<Tx, ServiceError> {
        let key = self
            .keys
            .to_private_key(req.private_key.as_bytes())
            .map_err(ServiceError::Key)?;

        let tx = self.txs.new_create_contract_tx(req.contract.into_bytes(), &key)?;
        Ok(tx)
    }
}

/// Coerce arguments in order, failing on the first one that does not convert.
pub fn coerce_args(args: &[ArgApi]) -> Result<Vec<TypedArg>, ServiceError> {
    args.iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.to_fn_arg().map_err(|source| ServiceError::Argument {
                index,
                type_tag: arg.type_tag.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{CoerceError, WireValue};
    use crate::chain::keys::{PrivateKey, Secp256k1KeyFactory};
    use crate::chain::tx::{SignedTxFactory, TxKind, WASM_HEADER};
    use crate::chain::types::{BuildError, Id, KeyError};
    use crate::encoding::Cb58;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts key parses so tests can tell whether a step was reached.
    #[derive(Default)]
    struct CountingKeys {
        parsed: AtomicUsize,
    }

    impl KeyFactory for CountingKeys {
        fn new_private_key(&self) -> Result<PrivateKey, KeyError> {
            Secp256k1KeyFactory.new_private_key()
        }

        fn to_private_key(&self, bytes: &[u8]) -> Result<PrivateKey, KeyError> {
            self.parsed.fetch_add(1, Ordering::SeqCst);
            Secp256k1KeyFactory.to_private_key(bytes)
        }
    }

    fn builder() -> (TxBuilder, Arc<CountingKeys>) {
        let keys = Arc::new(CountingKeys::default());
        let builder = TxBuilder::new(keys.clone(), Arc::new(SignedTxFactory::new(1)));
        (builder, keys)
    }

    fn key_bytes() -> Cb58 {
        Cb58::new(Secp256k1KeyFactory.new_private_key().unwrap().to_bytes())
    }

    fn invoke_args(args: Vec<ArgApi>) -> InvokeArgs {
        InvokeArgs {
            contract_id: Id::digest(b"contract"),
            function: "f".to_string(),
            private_key: key_bytes(),
            args,
            byte_args: Cb58::new(vec![0xde, 0xad]),
        }
    }

    #[test]
    fn test_build_invocation() {
        let (builder, _) = builder();
        let req = invoke_args(vec![
            ArgApi::new("int32", WireValue::Float64(3.9)),
            ArgApi::new("INT64", WireValue::Int32(-2)),
        ]);

        let tx = builder.build_invocation(req).unwrap();
        match tx.kind() {
            TxKind::Invoke { function, args, byte_args, .. } => {
                assert_eq!(function, "f");
                assert_eq!(args, &vec![TypedArg::Int32(3), TypedArg::Int64(-2)]);
                assert_eq!(byte_args, &vec![0xde, 0xad]);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_fail_fast_reports_index() {
        let (builder, keys) = builder();
        let req = invoke_args(vec![
            ArgApi::new("int32", WireValue::Int32(5)),
            ArgApi::new("int64", WireValue::Other(json!("bad"))),
            ArgApi::new("float", WireValue::Int32(1)),
        ]);

        let err = builder.build_invocation(req).unwrap_err();
        match err {
            ServiceError::Argument { index, type_tag, source } => {
                assert_eq!(index, 1);
                assert_eq!(type_tag, "int64");
                assert!(matches!(source, CoerceError::NotConvertible { .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(keys.parsed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_validation_precedes_coercion() {
        let (builder, keys) = builder();
        let mut req = invoke_args(vec![ArgApi::new("string", WireValue::Other(json!("x")))]);
        req.function = String::new();

        let err = builder.build_invocation(req).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(keys.parsed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bad_key() {
        let (builder, _) = builder();
        let mut req = invoke_args(vec![]);
        req.private_key = Cb58::new(vec![1, 2, 3]);

        let err = builder.build_invocation(req).unwrap_err();
        assert!(matches!(err, ServiceError::Key(KeyError::Malformed(_))));
    }

    #[test]
    fn test_build_error_propagates() {
        let (builder, _) = builder();
        let mut req = invoke_args(vec![]);
        req.function = "f".repeat(1000);

        let err = builder.build_invocation(req).unwrap_err();
        assert!(matches!(err, ServiceError::Build(BuildError::FunctionTooLong { .. })));
    }

    #[test]
    fn test_build_creation() {
        let (builder, keys) = builder();
        let req = CreateContractArgs {
            contract: Cb58::new(WASM_HEADER.to_vec()),
            private_key: key_bytes(),
        };
        let tx = builder.build_creation(req).unwrap();
        assert_eq!(tx.contract_id(), tx.id());
        assert_eq!(keys.parsed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_build_creation_rejects_non_wasm() {
        let (builder, _) = builder();
        let req = CreateContractArgs {
            contract: Cb58::new(b"hello".to_vec()),
            private_key: key_bytes(),
        };
        let err = builder.build_creation(req).unwrap_err();
        assert!(matches!(err, ServiceError::Build(BuildError::InvalidModule(_))));
    }

    #[test]
    fn test_build_creation_bad_key_before_module_check() {
        let (builder, _) = builder();
        let req = CreateContractArgs {
            contract: Cb58::default(),
            private_key: Cb58::default(),
        };
        let err = builder.build_creation(req).unwrap_err();
        assert!(matches!(err, ServiceError::Key(_)));
    }
}
