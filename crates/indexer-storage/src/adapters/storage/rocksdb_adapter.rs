//! # RocksDB Storage Adapter
//!
//! Production implementation of the `KeyValueStore` trait.
//!
//! ## Column Families
//!
//! One column family per partition:
//!
//! - `latest_block_point` - singleton checkpoint
//! - `tx_outputs` - UTXO set keyed by spend-key
//! - `unprocessed_blocks` - pending blocks keyed by big-endian number
//!
//! Batches are committed through a single `WriteBatch`; scans iterate a
//! snapshot so they never observe half of a concurrent commit.

use crate::domain::errors::KVStoreError;
use crate::domain::value_objects::Partition;
use crate::ports::outbound::{BatchOperation, Entry, KeyValueStore, ScanResult};
use rocksdb::{
    BlockBasedOptions, Cache, ColumnFamily, ColumnFamilyDescriptor, DBCompressionType,
    IteratorMode, Options, WriteBatch, WriteOptions, DB,
};
use std::path::{Path, PathBuf};

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 32MB)
    pub write_buffer_size: usize,
    /// Maximum number of write buffers (default: 3)
    pub max_write_buffer_number: i32,
    /// fsync every commit (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/indexer"),
            block_cache_size: 64 * 1024 * 1024,  // 64MB
            write_buffer_size: 32 * 1024 * 1024, // 32MB
            max_write_buffer_number: 3,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Default configuration at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,  // 8MB
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            max_write_buffer_number: 2,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed key-value store implementing the `KeyValueStore` trait.
pub struct RocksDbStore {
    db: DB,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create the database, provisioning missing column families.
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = Partition::ALL
            .iter()
            .map(|partition| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(partition.name(), cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors).map_err(|e| {
            KVStoreError::IOError {
                message: format!("Failed to open RocksDB: {}", e),
            }
        })?;

        tracing::info!("[utxo-db] 💾 Opened RocksDB at {}", config.path.display());

        Ok(Self { db, config })
    }

    /// Open with default tuning at `path`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        Self::open(RocksDbConfig::new(path.as_ref()))
    }

    pub fn config(&self) -> &RocksDbConfig {
        &self.config
    }

    fn cf(&self, partition: Partition) -> Result<&ColumnFamily, KVStoreError> {
        self.db
            .cf_handle(partition.name())
            .ok_or(KVStoreError::MissingPartition(partition))
    }

    fn edge(
        &self,
        partition: Partition,
        mode: IteratorMode<'_>,
    ) -> Result<Option<Entry>, KVStoreError> {
        let cf = self.cf(partition)?;
        match self.db.iterator_cf(cf, mode).next() {
            None => Ok(None),
            Some(Ok((key, value))) => Ok(Some((key.to_vec(), value.to_vec()))),
            Some(Err(e)) => Err(KVStoreError::IOError {
                message: format!("RocksDB seek failed: {}", e),
            }),
        }
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, partition: Partition, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let cf = self.cf(partition)?;
        self.db.get_cf(cf, key).map_err(|e| KVStoreError::IOError {
            message: format!("RocksDB get failed: {}", e),
        })
    }

    fn scan(&self, partition: Partition) -> Result<ScanResult, KVStoreError> {
        let cf = self.cf(partition)?;
        let snapshot = self.db.snapshot();
        let mut results = Vec::new();

        for item in snapshot.iterator_cf(cf, IteratorMode::Start) {
            match item {
                Ok((key, value)) => results.push((key.to_vec(), value.to_vec())),
                Err(e) => {
                    return Err(KVStoreError::IOError {
                        message: format!("RocksDB scan failed: {}", e),
                    });
                }
            }
        }

        Ok(results)
    }

    fn first(&self, partition: Partition) -> Result<Option<Entry>, KVStoreError> {
        self.edge(partition, IteratorMode::Start)
    }

    fn last(&self, partition: Partition) -> Result<Option<Entry>, KVStoreError> {
        self.edge(partition, IteratorMode::End)
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut batch = WriteBatch::default();

        for op in operations {
            match op {
                BatchOperation::Put {
                    partition,
                    key,
                    value,
                } => batch.put_cf(self.cf(partition)?, key, value),
                BatchOperation::Delete { partition, key } => {
                    batch.delete_cf(self.cf(partition)?, key)
                }
            }
        }

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);

        self.db
            .write_opt(batch, &write_opts)
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB batch write failed: {}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, RocksDbStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = RocksDbStore::open(RocksDbConfig::for_testing(temp_dir.path())).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_rocksdb_batch_write() {
        let (_dir, store) = open_temp();

        let ops = vec![
            BatchOperation::put(Partition::TxOutputs, b"batch1".to_vec(), b"value1".to_vec()),
            BatchOperation::put(
                Partition::LatestBlockPoint,
                b"batch1".to_vec(),
                b"value2".to_vec(),
            ),
            BatchOperation::delete(Partition::TxOutputs, b"batch1".to_vec()),
        ];
        store.atomic_batch_write(ops).unwrap();

        assert_eq!(store.get(Partition::TxOutputs, b"batch1").unwrap(), None);
        assert_eq!(
            store.get(Partition::LatestBlockPoint, b"batch1").unwrap(),
            Some(b"value2".to_vec())
        );
    }

    #[test]
    fn test_rocksdb_partitions_are_isolated() {
        let (_dir, store) = open_temp();

        store
            .atomic_batch_write(vec![BatchOperation::put(
                Partition::UnprocessedBlocks,
                b"k".to_vec(),
                b"v".to_vec(),
            )])
            .unwrap();

        assert!(store.get(Partition::TxOutputs, b"k").unwrap().is_none());
        assert_eq!(store.scan(Partition::UnprocessedBlocks).unwrap().len(), 1);
        assert!(store.scan(Partition::TxOutputs).unwrap().is_empty());
    }

    #[test]
    fn test_rocksdb_scan_orders_big_endian_keys() {
        let (_dir, store) = open_temp();

        let ops = [300u64, 2, 17]
            .iter()
            .map(|n| BatchOperation::put(Partition::UnprocessedBlocks, n.to_be_bytes(), vec![1]))
            .collect();
        store.atomic_batch_write(ops).unwrap();

        let numbers: Vec<u64> = store
            .scan(Partition::UnprocessedBlocks)
            .unwrap()
            .into_iter()
            .map(|(k, _)| u64::from_be_bytes(k.try_into().unwrap()))
            .collect();
        assert_eq!(numbers, vec![2, 17, 300]);

        let (last, _) = store.last(Partition::UnprocessedBlocks).unwrap().unwrap();
        assert_eq!(last, 300u64.to_be_bytes().to_vec());
        let (first, _) = store.first(Partition::UnprocessedBlocks).unwrap().unwrap();
        assert_eq!(first, 2u64.to_be_bytes().to_vec());
        assert!(store.first(Partition::TxOutputs).unwrap().is_none());
    }

    #[test]
    fn test_rocksdb_reopen_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = RocksDbStore::open(RocksDbConfig::for_testing(temp_dir.path())).unwrap();
            store
                .atomic_batch_write(vec![BatchOperation::put(
                    Partition::TxOutputs,
                    b"tx1_0".to_vec(),
                    b"out".to_vec(),
                )])
                .unwrap();
        }

        let store = RocksDbStore::open(RocksDbConfig::for_testing(temp_dir.path())).unwrap();
        assert_eq!(
            store.get(Partition::TxOutputs, b"tx1_0").unwrap(),
            Some(b"out".to_vec())
        );
    }
}
