//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wasmvm_service::args::{ArgApi, WireValue};
use wasmvm_service::chain::{
    BlockNotifier, Id, KeyFactory, MemoryTxStore, PendingPool, Secp256k1KeyFactory,
    SignedTxFactory, TxStore,
};
use wasmvm_service::chain::tx::WASM_HEADER;
use wasmvm_service::encoding::Cb58;
use wasmvm_service::service::{CreateContractArgs, InvokeArgs, Service};

/// Notifier that only counts signals.
#[derive(Default)]
pub struct CountingNotifier {
    count: AtomicUsize,
}

impl CountingNotifier {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl BlockNotifier for CountingNotifier {
    fn notify_block_ready(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// A service wired to in-memory collaborators.
pub struct Harness {
    pub service: Service,
    pub pool: PendingPool,
    pub notifier: Arc<CountingNotifier>,
    pub store: Arc<MemoryTxStore>,
}

pub fn harness() -> Harness {
    harness_with_store(MemoryTxStore::new(None))
}

pub fn harness_with_store(store: MemoryTxStore) -> Harness {
    let pool = PendingPool::new();
    let notifier = Arc::new(CountingNotifier::default());
    let store = Arc::new(store);
    let service = Service::new(
        Arc::new(Secp256k1KeyFactory),
        Arc::new(SignedTxFactory::new(1)),
        pool.clone(),
        notifier.clone(),
        store.clone() as Arc<dyn TxStore>,
    );
    Harness {
        service,
        pool,
        notifier,
        store,
    }
}

/// Smallest valid wasm module: header only.
pub fn wasm_module() -> Vec<u8> {
    WASM_HEADER.to_vec()
}

pub fn private_key() -> Cb58 {
    let key = Secp256k1KeyFactory.new_private_key().unwrap();
    Cb58::new(key.to_bytes())
}

pub fn invoke_args(contract_id: Id, private_key: Cb58, args: Vec<ArgApi>) -> InvokeArgs {
    InvokeArgs {
        contract_id,
        function: "add".to_string(),
        private_key,
        args,
        byte_args: Cb58::default(),
    }
}

pub fn create_contract_args(private_key: Cb58) -> CreateContractArgs {
    CreateContractArgs {
        contract: Cb58::new(wasm_module()),
        private_key,
    }
}

pub fn int_arg(type_tag: &str, value: i64) -> ArgApi {
    ArgApi::new(type_tag, WireValue::Int64(value))
}
