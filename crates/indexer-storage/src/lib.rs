//! # UTXO Indexer Storage
//!
//! Durable storage core of a chain-following UTXO indexer: the current
//! unspent-output set, the pending (ingested but not yet applied) confirmed
//! blocks and the checkpoint of the last applied block.
//!
//! ## Architecture
//!
//! ```text
//! sync client ──map──→ Block ──ingest──→ unprocessed_blocks
//!                                              │
//!                                            apply  (one atomic commit)
//!                                              ↓
//!                         tx_outputs  +  latest_block_point
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Sequential Blocks | Each ingested block is the successor of the last known one |
//! | 2 | Atomic Commits | A writer batch is applied entirely or not at all |
//! | 3 | Single Writer | Commits are serialized by the store's commit lock |
//! | 4 | Ordered Pending Set | Pending blocks are returned ascending by number |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Errors, mutation descriptors, partitions and configuration
//! - `ports/` - Store/writer traits (inbound), key-value engine (outbound)
//! - `adapters/` - RocksDB and in-memory engines, JSON record encoding
//! - `service/` - `IndexerDb` store and the `BlockIndexer` pipeline
//!
//! ## Usage
//!
//! ```ignore
//! use indexer_storage::{BlockIndexer, IndexerConfig, IndexerDb};
//!
//! let db = IndexerDb::init("/var/lib/indexer")?;
//! let indexer = BlockIndexer::new(db, IndexerConfig::default())?;
//! indexer.recover()?;
//!
//! let block = indexer.map_confirmed_block(block_type, &header, &txs)?;
//! indexer.process_confirmed_block(&block)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use domain::errors::{KVStoreError, StorageError};
pub use domain::mutation::Mutation;
pub use domain::value_objects::{IndexerConfig, Partition, LATEST_POINT_KEY};
pub use ports::inbound::{BlockIndexerDb, Database, DbTransactionWriter};
pub use ports::outbound::{BatchOperation, Entry, KeyValueStore, ScanResult};
pub use service::{ApplySummary, BlockIndexer, IndexerDb, TxWriter};

// Re-export storage adapters
pub use adapters::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
