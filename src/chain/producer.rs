//! Block producer.
//!
//! Waits for block-ready signals, drains the pending pool into blocks of at
//! most `max_block_txs`, and records every included transaction in the store
//! as accepted. The store is flushed after each signal that built a block. Execution of the included transactions is outside this
//! crate; the producer only moves them from pending to stored.

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use crate::chain::pool::PendingPool;
use crate::chain::store::TxStore;
use crate::chain::types::TxStatus;
use crate::observability::metrics;

pub struct BlockProducer {
    pool: PendingPool,
    store: Arc<dyn TxStore>,
    ready: mpsc::Receiver<()>,
    max_block_txs: usize,
    height: u64,
}

impl BlockProducer {
    pub fn new(
        pool: PendingPool,
        store: Arc<dyn TxStore>,
        ready: mpsc::Receiver<()>,
        max_block_txs: usize,
    ) -> Self {
        Self {
            pool,
            store,
            ready,
            max_block_txs: max_block_txs.max(1),
            height: 0,
        }
    }

    /// Height of the last block built.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Run until shutdown or until every notifier is dropped.
    ///
    /// The store is flushed after every signal that produced a block.
    /// Whatever is still pending at exit goes into a final block, then the
    /// store is flushed once more.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(max_block_txs = self.max_block_txs, "Block producer starting");

        loop {
            tokio::select! {
                signal = self.ready.recv() => {
                    if signal.is_none() {
                        tracing::info!("Block-ready channel closed, stopping producer");
                        break;
                    }
                    if self.build_pending() > 0 {
                        self.flush();
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Block producer received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        self.build_pending();
        self.flush();
    }

    /// Move the pool into as many blocks as needed. Returns the number of
    /// transactions included.
    ///
    /// Each batch is stored before it leaves the pool, so a lookup always
    /// finds a transaction in one place or the other.
    pub fn build_pending(&mut self) -> usize {
        let mut included = 0;
        loop {
            let batch = self.pool.peek(self.max_block_txs);
            if batch.is_empty() {
                break;
            }

            self.height += 1;
            for tx in &batch {
                self.store.put(tx.record(TxStatus::Accepted));
            }
            self.pool.drain(batch.len());
            metrics::record_block(batch.len());
            tracing::info!(height = self.height, txs = batch.len(), "Block built");
            included += batch.len();
        }
        included
    }

    fn flush(&self) {
        if let Err(e) = self.store.flush() {
            tracing::error!(error = %e, "Failed to flush transaction store");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::keys::{KeyFactory, Secp256k1KeyFactory};
    use crate::chain::notify::{BlockNotifier, ChannelNotifier};
    use crate::chain::store::MemoryTxStore;
    use crate::chain::tx::{SignedTxFactory, TxFactory, WASM_HEADER};
    use crate::chain::types::Id;
    use std::time::Duration;

    fn fill(pool: &PendingPool, n: usize) -> Vec<Id> {
        let key = Secp256k1KeyFactory.new_private_key().unwrap();
        let factory = SignedTxFactory::new(1);
        (0..n)
            .map(|_| {
                let tx = factory.new_create_contract_tx(WASM_HEADER.to_vec(), &key).unwrap();
                let id = tx.id();
                pool.append(tx);
                id
            })
            .collect()
    }

    #[test]
    fn test_build_pending_splits_blocks() {
        let pool = PendingPool::new();
        let store = Arc::new(MemoryTxStore::new(None));
        let (_notifier, rx) = ChannelNotifier::channel(1);
        let mut producer = BlockProducer::new(pool.clone(), store.clone(), rx, 2);

        let ids = fill(&pool, 5);
        assert_eq!(producer.build_pending(), 5);
        assert_eq!(producer.height(), 3);
        assert!(pool.is_empty());

        for id in ids {
            let record = store.get(&id).unwrap();
            assert_eq!(record.status, TxStatus::Accepted);
        }
    }

    #[tokio::test]
    async fn test_run_drains_on_signal_and_shutdown() {
        let pool = PendingPool::new();
        let store = Arc::new(MemoryTxStore::new(None));
        let (notifier, rx) = ChannelNotifier::channel(1);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let producer = BlockProducer::new(pool.clone(), store.clone(), rx, 10);
        let handle = tokio::spawn(producer.run(shutdown_rx));

        let ids = fill(&pool, 3);
        notifier.notify_block_ready();

        for _ in 0..50 {
            if store.len() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(store.len(), 3);

        // Left pending without a signal; picked up by the final block.
        let late = fill(&pool, 1);
        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();

        for id in ids.iter().chain(late.iter()) {
            assert!(store.get(id).is_some());
        }
    }

    #[tokio::test]
    async fn test_run_flushes_after_each_block() {
        let path = std::env::temp_dir().join(format!("wasmvm-producer-{}.json", fastrand::u64(..)));
        let pool = PendingPool::new();
        let store = Arc::new(MemoryTxStore::new(Some(path.clone())));
        let (notifier, rx) = ChannelNotifier::channel(1);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let producer = BlockProducer::new(pool.clone(), store.clone(), rx, 10);
        let handle = tokio::spawn(producer.run(shutdown_rx));

        let ids = fill(&pool, 3);
        notifier.notify_block_ready();

        // On disk while the producer is still running.
        let mut persisted = 0;
        for _ in 0..100 {
            if let Ok(reloaded) = MemoryTxStore::load_from_file(&path) {
                persisted = reloaded.len();
                if persisted == ids.len() {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(persisted, ids.len());
        assert!(!handle.is_finished());

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
        let _ = std::fs::remove_file(&path);
    }
}
