//! # Domain Errors
//!
//! Error types for the indexer store, the transaction writer and the
//! ingest/apply pipeline.
//!
//! Not-found is never an error here: point reads return `Ok(None)`.

use crate::domain::value_objects::Partition;
use indexer_types::MappingError;
use thiserror::Error;

/// Errors that can occur during store, writer or pipeline operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Block number is not the successor of the last known block.
    #[error("Invalid number of block: expected {expected} vs {actual}")]
    NumberingMismatch { expected: u64, actual: u64 },

    /// The last known block number has no successor.
    #[error("Block number {number} has no successor")]
    BlockNumberOverflow { number: u64 },

    /// A record could not be encoded or decoded.
    #[error("Serialization error in {operation} (key {key}): {message}")]
    Serialization {
        operation: &'static str,
        key: String,
        message: String,
    },

    /// The storage engine rejected a read or write.
    #[error("Database error in {operation} (key {key}): {source}")]
    Database {
        operation: &'static str,
        key: String,
        #[source]
        source: KVStoreError,
    },

    /// A removal target was missing where the removal had to succeed.
    #[error("{operation}: no {partition} entry for key {key}")]
    MissingEntry {
        operation: &'static str,
        partition: Partition,
        key: String,
    },

    /// The store could not be opened or provisioned.
    #[error("Failed to initialize database at {path}: {message}")]
    Init { path: String, message: String },

    /// The native block could not be mapped.
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl StorageError {
    /// Returns `true` for expected/actual block number disagreements, whether
    /// detected by the mapper or by the pipeline.
    pub fn is_numbering_mismatch(&self) -> bool {
        matches!(
            self,
            Self::NumberingMismatch { .. } | Self::Mapping(MappingError::NumberingMismatch { .. })
        )
    }

    pub(crate) fn database(
        operation: &'static str,
        key: impl Into<String>,
    ) -> impl FnOnce(KVStoreError) -> Self {
        let key = key.into();
        move |source| Self::Database {
            operation,
            key,
            source,
        }
    }
}

/// Key-value backend errors.
#[derive(Debug, Clone, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// A partition was not provisioned in the backend.
    #[error("KV store partition missing: {0}")]
    MissingPartition(Partition),
}
