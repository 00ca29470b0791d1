//! Error types for mapping native chain objects into indexer records.

use crate::era::{BlockType, HeaderFamily};
use thiserror::Error;

/// Errors returned by the mapper. None of them are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The header's embedded block number disagrees with the expected one.
    #[error("Invalid number of block: expected {expected} vs {actual}")]
    NumberingMismatch { expected: u64, actual: u64 },

    /// The header hash is not valid hex.
    #[error("Invalid block hash {hash:?}: {message}")]
    InvalidHash { hash: String, message: String },

    /// The discriminator selects a different header family than the one supplied.
    #[error("Block type {block_type} expects a {expected} header, got {actual}")]
    HeaderMismatch {
        block_type: BlockType,
        expected: HeaderFamily,
        actual: HeaderFamily,
    },

    /// The raw discriminator does not name a known block type.
    #[error("Unknown block type: {0}")]
    UnknownBlockType(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_mismatch_names_both_values() {
        let err = MappingError::NumberingMismatch {
            expected: 3,
            actual: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 3"));
        assert!(msg.contains('4'));
    }
}
