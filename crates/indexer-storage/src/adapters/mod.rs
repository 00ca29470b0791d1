//! # Adapters Module
//!
//! Concrete implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `serializer`: JSON record encoding for partition values
//! - `storage`: RocksDB (production) and in-memory (tests) key-value stores

pub mod serializer;
pub mod storage;

pub use storage::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbConfig, RocksDbStore};
