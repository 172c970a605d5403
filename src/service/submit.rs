//! Submission and query service.
//!
//! # Submission lifecycle
//! ```text
//! Received → Validated → ArgsCoerced → KeyResolved → Built → Admitted(Notified)
//!     any step may short-circuit to Rejected(reason)
//! ```
//! Admission is all-or-nothing: the pool is touched only after a transaction
//! has been fully built and signed, and every admission sends exactly one
//! block-ready signal.

use std::sync::Arc;

use crate::chain::keys::KeyFactory;
use crate::chain::notify::BlockNotifier;
use crate::chain::pool::PendingPool;
use crate::chain::store::TxStore;
use crate::chain::tx::{Tx, TxFactory};
use crate::chain::types::{Id, TxStatus};
use crate::encoding::Cb58;
use crate::observability::metrics;
use crate::service::builder::TxBuilder;
use crate::service::error::ServiceError;
use crate::service::types::{
    CreateAccountResponse, CreateContractArgs, CreateContractResponse, GetTxArgs, GetTxResponse,
    InvokeArgs, InvokeResponse,
};

/// The wasm VM's API service.
///
/// Cheap to clone; clones share the pool and collaborators.
#[derive(Clone)]
pub struct Service {
    builder: TxBuilder,
    pool: PendingPool,
    notifier: Arc<dyn BlockNotifier>,
    store: Arc<dyn TxStore>,
}

impl Service {
    pub fn new(
        keys: Arc<dyn KeyFactory>,
        txs: Arc<dyn TxFactory>,
        pool: PendingPool,
        notifier: Arc<dyn BlockNotifier>,
        store: Arc<dyn TxStore>,
    ) -> Self {
        Self {
            builder: TxBuilder::new(keys, txs),
            pool,
            notifier,
            store,
        }
    }

    /// The pending pool this service admits into.
    pub fn pool(&self) -> &PendingPool {
        &self.pool
    }

    /// Generate a new private key.
    pub fn create_account(&self) -> Result<CreateAccountResponse, ServiceError> {
        let result = self
            .builder
            .keys()
            .new_private_key()
            .map(|key| CreateAccountResponse {
                private_key: Cb58::new(key.to_bytes()),
            })
            .map_err(ServiceError::KeyGeneration);
        observe("create_account", result)
    }

    /// Build, sign and admit a contract invocation.
    pub fn invoke(&self, args: InvokeArgs) -> Result<InvokeResponse, ServiceError> {
        tracing::debug!(contract_id = %args.contract_id, function = %args.function, "in invoke");

        let result = self
            .builder
            .build_invocation(args)
            .map(|tx| InvokeResponse { tx_id: self.admit(tx) });
        observe("invoke", result)
    }

    /// Build, sign and admit a contract deployment.
    ///
    /// The returned transaction ID is also the new contract's ID.
    pub fn create_contract(&self, args: CreateContractArgs) -> Result<CreateContractResponse, ServiceError> {
        tracing::debug!(contract_size = args.contract.as_bytes().len(), "in createContract");

        let result = self
            .builder
            .build_creation(args)
            .map(|tx| CreateContractResponse { tx_id: self.admit(tx) });
        observe("create_contract", result)
    }

    /// Look up a transaction. Block-included ones come from the store;
    /// still-pending ones report `Processing`.
    ///
    /// The producer stores a batch before removing it from the pool, so a
    /// transaction that leaves the pool between the first two reads is in
    /// the store by the third.
    pub fn get_tx(&self, args: GetTxArgs) -> Result<GetTxResponse, ServiceError> {
        let result = self
            .store
            .get(&args.id)
            .or_else(|| {
                self.pool
                    .get(&args.id)
                    .map(|tx| tx.record(TxStatus::Processing))
            })
            .or_else(|| self.store.get(&args.id))
            .map(|tx| GetTxResponse { tx })
            .ok_or(ServiceError::NotFound(args.id));
        observe("get_tx", result)
    }

    fn admit(&self, tx: Tx) -> Id {
        let id = tx.id();
        let pool_size = self.pool.append(tx);
        self.notifier.notify_block_ready();

        tracing::info!(tx_id = %id, pool_size = pool_size, "Transaction admitted to pending pool");
        id
    }
}

fn observe<T>(op: &'static str, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
    match &result {
        Ok(_) => metrics::record_submission(op, "ok"),
        Err(e) => {
            metrics::record_submission(op, e.kind());
            if e.is_caller_error() || matches!(e, ServiceError::NotFound(_)) {
                tracing::debug!(op = op, error = %e, "Request rejected");
            } else {
                tracing::warn!(op = op, error = %e, "Request failed");
            }
        }
    }
    result
}
