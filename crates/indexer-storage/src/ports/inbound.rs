//! # Inbound Ports (Driving Ports)
//!
//! The API the pipeline and the external sync driver call into.

use crate::domain::errors::StorageError;
use indexer_types::{Block, ChainPoint, TxInput, TxOutput};

/// Fluent builder that queues mutations and commits them as one atomic unit.
///
/// Not meant to be shared between concurrent callers; each caller opens its
/// own writer.
pub trait DbTransactionWriter {
    /// Queue a checkpoint overwrite.
    fn set_latest_block_point(&mut self, point: ChainPoint) -> &mut Self;

    /// Queue insertion (or overwrite) of the UTXO entry for `input`.
    fn add_tx_output(&mut self, input: TxInput, output: TxOutput) -> &mut Self;

    /// Queue persistence of a confirmed block into the pending-blocks table.
    fn add_confirmed_block(&mut self, block: Block) -> &mut Self;

    /// Queue removal of UTXO entries; absent entries are skipped.
    fn remove_tx_outputs(&mut self, inputs: Vec<TxInput>) -> &mut Self;

    /// Queue removal of UTXO entries that must exist; an absent entry aborts
    /// the whole commit.
    fn consume_tx_outputs(&mut self, inputs: Vec<TxInput>) -> &mut Self;

    /// Queue removal of a block from the pending-blocks table.
    fn remove_confirmed_block(&mut self, number: u64) -> &mut Self;

    /// Commit every queued mutation atomically, in enqueue order.
    ///
    /// The queue is cleared whether or not the commit succeeds.
    fn execute(&mut self) -> Result<(), StorageError>;
}

/// Read path plus the entry point of the write path.
pub trait BlockIndexerDb {
    type Writer<'a>: DbTransactionWriter
    where
        Self: 'a;

    /// Open a fresh writer bound to this store.
    fn open_tx(&self) -> Self::Writer<'_>;

    /// Unspent output currently stored under `input`'s spend-key.
    fn get_tx_output(&self, input: &TxInput) -> Result<Option<TxOutput>, StorageError>;

    /// Current checkpoint, `None` before the first one is written.
    fn get_latest_block_point(&self) -> Result<Option<ChainPoint>, StorageError>;
}

/// Full store contract used by the ingest/apply pipeline.
pub trait Database: BlockIndexerDb {
    /// Drop a block's pending entry once its effects are durable.
    fn mark_confirmed_block_processed(&self, block: &Block) -> Result<(), StorageError>;

    /// Every pending block, ascending by block number.
    fn get_unprocessed_confirmed_blocks(&self) -> Result<Vec<Block>, StorageError>;

    /// Lowest and highest pending block numbers, read from keys only.
    fn get_unprocessed_block_range(&self) -> Result<Option<(u64, u64)>, StorageError>;
}
