//! # Outbound Ports (Driven Ports)
//!
//! The storage engine contract the indexer store is written against.
//!
//! Production: `RocksDbStore` (adapters/storage/rocksdb_adapter.rs)
//! Testing: `InMemoryKVStore` (adapters/storage/memory.rs)

use crate::domain::errors::KVStoreError;
use crate::domain::value_objects::Partition;

/// One stored key/value pair.
pub type Entry = (Vec<u8>, Vec<u8>);

/// Key/value pairs returned by a partition scan, ascending by key.
pub type ScanResult = Vec<Entry>;

/// Partitioned key-value storage engine.
///
/// Implementations are shared between readers and the single writer, so
/// every method takes `&self`.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, partition: Partition, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Read every entry of a partition from one consistent snapshot,
    /// ordered ascending by key bytes.
    fn scan(&self, partition: Partition) -> Result<ScanResult, KVStoreError>;

    /// Entry with the smallest key, if the partition is not empty.
    fn first(&self, partition: Partition) -> Result<Option<Entry>, KVStoreError>;

    /// Entry with the largest key, if the partition is not empty.
    fn last(&self, partition: Partition) -> Result<Option<Entry>, KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Operations apply in order. Either ALL of them become visible, or NONE.
    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put {
        partition: Partition,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    /// Delete a key.
    Delete { partition: Partition, key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(partition: Partition, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            partition,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(partition: Partition, key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete {
            partition,
            key: key.into(),
        }
    }

    pub fn partition(&self) -> Partition {
        match self {
            BatchOperation::Put { partition, .. } | BatchOperation::Delete { partition, .. } => {
                *partition
            }
        }
    }

    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key, .. } => key,
        }
    }
}
