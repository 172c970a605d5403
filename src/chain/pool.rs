//! Pending transaction pool.
//!
//! # Responsibilities
//! - Hold admitted transactions until the block producer takes them
//! - Serialize concurrent appends so none are lost or interleaved
//!
//! The submission path only appends. Removal belongs to the block producer
//! through [`PendingPool::drain`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::chain::tx::Tx;
use crate::chain::types::Id;
use crate::observability::metrics;

/// Append-only queue of pending transactions shared by all submitters.
#[derive(Debug, Clone, Default)]
pub struct PendingPool {
    inner: Arc<Mutex<Vec<Tx>>>,
}

impl PendingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transaction, returning the pool length after the append.
    pub fn append(&self, tx: Tx) -> usize {
        let len = {
            let mut pending = self.lock();
            pending.push(tx);
            pending.len()
        };
        metrics::record_pool_size(len);
        len
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// IDs of pending transactions in admission order.
    pub fn snapshot(&self) -> Vec<Id> {
        self.lock().iter().map(Tx::id).collect()
    }

    /// Copy of the pending transaction with `id`, if still queued.
    pub fn get(&self, id: &Id) -> Option<Tx> {
        self.lock().iter().find(|tx| tx.id() == *id).cloned()
    }

    /// Copies of up to `max` transactions from the front of the pool,
    /// left in place.
    ///
    /// Submitters only append, so the front stays stable until the block
    /// producer drains it.
    pub fn peek(&self, max: usize) -> Vec<Tx> {
        self.lock().iter().take(max).cloned().collect()
    }

    /// Remove and return up to `max` transactions from the front of the pool.
    pub fn drain(&self, max: usize) -> Vec<Tx> {
        let (taken, remaining) = {
            let mut pending = self.lock();
            let n = max.min(pending.len());
            let taken: Vec<Tx> = pending.drain(..n).collect();
            (taken, pending.len())
        };
        metrics::record_pool_size(remaining);
        taken
    }

    // A panic while holding the lock cannot leave a half-written Vec, so a
    // poisoned pool is still consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<Tx>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
