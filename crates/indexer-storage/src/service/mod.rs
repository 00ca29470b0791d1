//! # Indexer Store Service
//!
//! `IndexerDb` binds the store contract (`BlockIndexerDb` + `Database`) to a
//! concrete `KeyValueStore`. `BlockIndexer` drives the ingest/apply pipeline
//! on top of any `Database`.
//!
//! ## Commit model
//!
//! Every commit takes the store-wide commit lock, stages the writer's
//! mutations into partition operations and hands them to the engine as one
//! atomic batch. Reads never take the commit lock.

mod pipeline;
mod writer;

pub use pipeline::{ApplySummary, BlockIndexer};
pub use writer::TxWriter;

use crate::adapters::serializer::decode_record;
use crate::adapters::storage::InMemoryKVStore;
use crate::domain::errors::StorageError;
use crate::domain::mutation::Mutation;
use crate::domain::value_objects::{Partition, LATEST_POINT_KEY};
use crate::ports::inbound::{BlockIndexerDb, Database, DbTransactionWriter};
use crate::ports::outbound::KeyValueStore;
use indexer_types::{decode_block_number, Block, ChainPoint, TxInput, TxOutput};
use parking_lot::Mutex;

#[cfg(feature = "rocksdb")]
use crate::adapters::storage::{RocksDbConfig, RocksDbStore};

/// The indexer store.
pub struct IndexerDb<S: KeyValueStore> {
    pub(crate) store: S,
    /// Serializes commits: one writer batch in flight at a time.
    pub(crate) commit_lock: Mutex<()>,
}

impl<S: KeyValueStore> IndexerDb<S> {
    /// Wrap an already opened engine.
    pub fn new(store: S) -> Self {
        Self {
            store,
            commit_lock: Mutex::new(()),
        }
    }

    /// The underlying engine.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stage and atomically commit a batch.
    pub(crate) fn commit(&self, mutations: Vec<Mutation>) -> Result<(), StorageError> {
        if mutations.is_empty() {
            return Ok(());
        }

        let _guard = self.commit_lock.lock();

        let operations = match writer::stage(&self.store, &mutations) {
            Ok(operations) => operations,
            Err(e) => {
                tracing::warn!("[utxo-db] ✗ Commit aborted while staging: {}", e);
                return Err(e);
            }
        };
        let op_count = operations.len();

        self.store
            .atomic_batch_write(operations)
            .map_err(StorageError::database(
                "execute",
                format!("batch of {} mutations", mutations.len()),
            ))
            .inspect_err(|e| tracing::warn!("[utxo-db] ✗ Commit failed: {}", e))?;

        tracing::debug!(
            "[utxo-db] ✓ Committed {} mutations ({} operations)",
            mutations.len(),
            op_count
        );
        Ok(())
    }
}

impl IndexerDb<InMemoryKVStore> {
    /// Store backed by memory only.
    pub fn in_memory() -> Self {
        Self::new(InMemoryKVStore::new())
    }
}

#[cfg(feature = "rocksdb")]
impl IndexerDb<RocksDbStore> {
    /// Open or create the store at `path` with default tuning.
    pub fn init(path: impl AsRef<std::path::Path>) -> Result<Self, StorageError> {
        Self::open(RocksDbConfig::new(path.as_ref()))
    }

    /// Open or create the store, provisioning every partition.
    pub fn open(config: RocksDbConfig) -> Result<Self, StorageError> {
        let path = config.path.display().to_string();
        let store = RocksDbStore::open(config).map_err(|e| StorageError::Init {
            path,
            message: e.to_string(),
        })?;
        Ok(Self::new(store))
    }
}

impl<S: KeyValueStore> BlockIndexerDb for IndexerDb<S> {
    type Writer<'a>
        = TxWriter<'a, S>
    where
        Self: 'a;

    fn open_tx(&self) -> TxWriter<'_, S> {
        TxWriter::new(self)
    }

    fn get_tx_output(&self, input: &TxInput) -> Result<Option<TxOutput>, StorageError> {
        const OP: &str = "get tx output";
        let key = input.to_string();

        self.store
            .get(Partition::TxOutputs, key.as_bytes())
            .map_err(StorageError::database(OP, key.as_str()))?
            .map(|data| decode_record(&data, OP, &key))
            .transpose()
    }

    fn get_latest_block_point(&self) -> Result<Option<ChainPoint>, StorageError> {
        const OP: &str = "get latest block point";

        self.store
            .get(Partition::LatestBlockPoint, LATEST_POINT_KEY.as_bytes())
            .map_err(StorageError::database(OP, LATEST_POINT_KEY))?
            .map(|data| decode_record(&data, OP, LATEST_POINT_KEY))
            .transpose()
    }
}

impl<S: KeyValueStore> Database for IndexerDb<S> {
    fn mark_confirmed_block_processed(&self, block: &Block) -> Result<(), StorageError> {
        self.open_tx().remove_confirmed_block(block.number).execute()
    }

    fn get_unprocessed_confirmed_blocks(&self) -> Result<Vec<Block>, StorageError> {
        const OP: &str = "get unprocessed confirmed blocks";

        self.store
            .scan(Partition::UnprocessedBlocks)
            .map_err(StorageError::database(OP, Partition::UnprocessedBlocks.name()))?
            .into_iter()
            .map(|(key, data)| {
                let key = decode_block_number(&key)
                    .map_or_else(|| hex::encode(&key), |n| n.to_string());
                decode_record(&data, OP, &key)
            })
            .collect()
    }

    fn get_unprocessed_block_range(&self) -> Result<Option<(u64, u64)>, StorageError> {
        const OP: &str = "get unprocessed block range";
        let partition = Partition::UnprocessedBlocks;

        let first = self
            .store
            .first(partition)
            .map_err(StorageError::database(OP, partition.name()))?;
        let last = self
            .store
            .last(partition)
            .map_err(StorageError::database(OP, partition.name()))?;

        match (first, last) {
            (Some((first, _)), Some((last, _))) => {
                let first = block_number_key(&first, OP)?;
                let last = block_number_key(&last, OP)?;
                Ok(Some((first, last)))
            }
            _ => Ok(None),
        }
    }
}

fn block_number_key(key: &[u8], operation: &'static str) -> Result<u64, StorageError> {
    decode_block_number(key).ok_or_else(|| StorageError::Serialization {
        operation,
        key: hex::encode(key),
        message: "not a block number key".to_string(),
    })
}
