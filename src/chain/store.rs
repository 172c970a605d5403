//! Transaction record storage and persistence.

use dashmap::DashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::chain::tx::TxRecord;
use crate::chain::types::Id;

/// Persistent lookup of transactions by ID.
pub trait TxStore: Send + Sync {
    /// Fetch a stored transaction.
    fn get(&self, id: &Id) -> Option<TxRecord>;

    /// Insert or replace a transaction record.
    fn put(&self, record: TxRecord);

    /// Write buffered state to durable storage.
    fn flush(&self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A concurrent in-memory store with optional JSON file persistence.
#[derive(Clone, Default)]
pub struct MemoryTxStore {
    inner: Arc<DashMap<Id, TxRecord>>,
    persistence_path: Option<PathBuf>,
}

impl MemoryTxStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load from file if it exists; the file is also where [`save_to_file`](Self::save_to_file) writes.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let records: Vec<TxRecord> = serde_json::from_reader(reader)?;

            for record in records {
                store.inner.insert(record.id, record);
            }
            tracing::info!(path = ?path, txs = store.inner.len(), "Loaded transaction store");
        }
        Ok(store)
    }

    /// Save to the configured file. A store without a path is a no-op.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);

            let records: Vec<TxRecord> = self.inner.iter().map(|r| r.value().clone()).collect();

            serde_json::to_writer(writer, &records)?;
            tracing::info!(path = ?path, txs = records.len(), "Saved transaction store");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl TxStore for MemoryTxStore {
    fn get(&self, id: &Id) -> Option<TxRecord> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    fn put(&self, record: TxRecord) {
        self.inner.insert(record.id, record);
    }

    fn flush(&self) -> std::io::Result<()> {
        self.save_to_file()
    }
}
