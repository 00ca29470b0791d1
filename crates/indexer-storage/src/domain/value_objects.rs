//! # Value Objects
//!
//! Partition layout, fixed keys and pipeline configuration.

use indexer_types::ChainPoint;
use std::collections::HashSet;
use std::fmt;

/// Key of the singleton checkpoint record.
pub const LATEST_POINT_KEY: &str = "default";

/// Logical partitions of the store.
///
/// The RocksDB backend maps each partition to a column family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    /// Singleton checkpoint record under [`LATEST_POINT_KEY`].
    LatestBlockPoint,
    /// Spend-key `"<hash>_<index>"` -> `TxOutput`.
    TxOutputs,
    /// Big-endian block number -> `Block`.
    UnprocessedBlocks,
}

impl Partition {
    /// Every partition provisioned on open.
    pub const ALL: [Partition; 3] = [
        Partition::LatestBlockPoint,
        Partition::TxOutputs,
        Partition::UnprocessedBlocks,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Partition::LatestBlockPoint => "latest_block_point",
            Partition::TxOutputs => "tx_outputs",
            Partition::UnprocessedBlocks => "unprocessed_blocks",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the ingest/apply pipeline.
#[derive(Debug, Clone, Default)]
pub struct IndexerConfig {
    /// Checkpoint written when the store has none yet.
    ///
    /// The first ingested block must then be its successor. Without it the
    /// first block may carry any number.
    pub starting_block_point: Option<ChainPoint>,

    /// Addresses whose outputs enter the UTXO set (default: empty = all).
    pub addresses_of_interest: HashSet<String>,
}

impl IndexerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the checkpoint used to bootstrap an empty store.
    pub fn with_starting_block_point(mut self, point: ChainPoint) -> Self {
        self.starting_block_point = Some(point);
        self
    }

    /// Restrict the UTXO set to outputs paying one of `addresses`.
    pub fn with_addresses_of_interest<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addresses_of_interest = addresses.into_iter().map(Into::into).collect();
        self
    }

    /// Whether an output paying `address` is tracked.
    pub fn tracks_address(&self, address: &str) -> bool {
        self.addresses_of_interest.is_empty() || self.addresses_of_interest.contains(address)
    }
}
