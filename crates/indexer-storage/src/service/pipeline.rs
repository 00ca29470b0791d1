//! # Ingest/Apply Pipeline
//!
//! Each confirmed block moves through `Unseen -> Ingested -> Applied`:
//!
//! 1. **Ingest**: numbering is validated and the block is persisted into the
//!    pending-blocks table in its own commit.
//! 2. **Apply**: spent inputs are removed, new outputs added, the checkpoint
//!    advanced and the pending entry dropped, all in one commit.
//!
//! A crash between the two steps leaves the block pending; [`BlockIndexer::recover`]
//! replays it on restart.
//!
//! Numbering checks and the commits they guard run under one pipeline lock, so
//! callers sharing a `BlockIndexer` across threads cannot both ingest the same
//! number. Separate `BlockIndexer`s over one store are not coordinated.

use crate::domain::errors::StorageError;
use crate::domain::value_objects::IndexerConfig;
use crate::ports::inbound::{Database, DbTransactionWriter};
use indexer_types::{
    txs_from_ledger, Block, BlockHeader, BlockType, HeaderView, LedgerTransaction, NativeHeader,
};
use parking_lot::Mutex;

/// Effects of applying one block to the UTXO set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Number of the applied block.
    pub number: u64,
    /// Spent inputs queued for removal.
    pub spent: usize,
    /// Outputs added to the UTXO set.
    pub created: usize,
}

/// Drives confirmed blocks from the sync client into the store.
pub struct BlockIndexer<D: Database> {
    db: D,
    config: IndexerConfig,
    /// Held from a numbering check until its commit returns.
    pipeline_lock: Mutex<()>,
}

impl<D: Database> BlockIndexer<D> {
    /// Bind the pipeline to `db`.
    ///
    /// An empty store is bootstrapped with the configured starting point.
    pub fn new(db: D, config: IndexerConfig) -> Result<Self, StorageError> {
        if db.get_latest_block_point()?.is_none() {
            if let Some(point) = &config.starting_block_point {
                db.open_tx().set_latest_block_point(point.clone()).execute()?;
                tracing::info!("[indexer] 🏁 Bootstrapped checkpoint at {}", point);
            }
        }
        Ok(Self {
            db,
            config,
            pipeline_lock: Mutex::new(()),
        })
    }

    pub fn db(&self) -> &D {
        &self.db
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn into_inner(self) -> D {
        self.db
    }

    /// Number the next ingested block must carry.
    ///
    /// `None` when neither a pending block nor a checkpoint exists.
    pub fn next_block_number(&self) -> Result<Option<u64>, StorageError> {
        let last_pending = self
            .db
            .get_unprocessed_block_range()?
            .map(|(_, last)| last);
        let checkpoint = self.db.get_latest_block_point()?.map(|point| point.number);

        last_pending.max(checkpoint).map(successor).transpose()
    }

    /// Map a native block into an indexer [`Block`] numbered against the
    /// store.
    pub fn map_confirmed_block<T: LedgerTransaction>(
        &self,
        block_type: BlockType,
        header: &NativeHeader,
        txs: &[T],
    ) -> Result<Block, StorageError> {
        let expected = match self.next_block_number()? {
            Some(n) => n,
            None => header.block_number(),
        };
        let header = BlockHeader::from_native(block_type, header, expected)?;
        Ok(Block::new(header, txs_from_ledger(txs)))
    }

    /// Persist `block` as pending.
    pub fn ingest_confirmed_block(&self, block: &Block) -> Result<(), StorageError> {
        let _guard = self.pipeline_lock.lock();
        self.ingest(block)
    }

    /// Apply a pending block's effects to the UTXO set and advance the
    /// checkpoint.
    ///
    /// The block must follow the checkpoint or, on a store without one, be
    /// the lowest pending block.
    pub fn apply_confirmed_block(&self, block: &Block) -> Result<ApplySummary, StorageError> {
        let _guard = self.pipeline_lock.lock();
        self.apply(block)
    }

    /// Ingest then apply.
    pub fn process_confirmed_block(&self, block: &Block) -> Result<ApplySummary, StorageError> {
        let _guard = self.pipeline_lock.lock();
        self.ingest(block)?;
        self.apply(block)
    }

    /// Finish every block left pending by an interrupted run.
    ///
    /// Returns the number of blocks applied.
    pub fn recover(&self) -> Result<usize, StorageError> {
        let _guard = self.pipeline_lock.lock();

        let pending = self.db.get_unprocessed_confirmed_blocks()?;
        if pending.is_empty() {
            return Ok(0);
        }

        tracing::info!("[indexer] 🔄 Recovering {} pending blocks", pending.len());

        let mut replayed = 0;
        for block in &pending {
            let checkpoint = self.db.get_latest_block_point()?.map(|point| point.number);
            if checkpoint.is_some_and(|n| block.number <= n) {
                // Effects already durable, only the pending entry survived.
                self.db.mark_confirmed_block_processed(block)?;
                continue;
            }
            self.apply(block)?;
            replayed += 1;
        }

        tracing::info!("[indexer] ✓ Recovery replayed {} blocks", replayed);
        Ok(replayed)
    }

    fn ingest(&self, block: &Block) -> Result<(), StorageError> {
        if let Some(expected) = self.next_block_number()? {
            expect_number(expected, block.number)?;
        }

        self.db.open_tx().add_confirmed_block(block.clone()).execute()?;

        tracing::info!(
            "[indexer] 📦 Ingested block #{} ({} txs, slot {})",
            block.number,
            block.txs.len(),
            block.slot
        );
        Ok(())
    }

    fn apply(&self, block: &Block) -> Result<ApplySummary, StorageError> {
        match self.db.get_latest_block_point()? {
            Some(point) => expect_number(successor(point.number)?, block.number)?,
            None => {
                if let Some((first, _)) = self.db.get_unprocessed_block_range()? {
                    expect_number(first, block.number)?;
                }
            }
        }

        let mut summary = ApplySummary {
            number: block.number,
            ..Default::default()
        };
        let mut writer = self.db.open_tx();

        for tx in &block.txs {
            let spent = tx.spent_inputs();
            if !spent.is_empty() {
                summary.spent += spent.len();
                writer.remove_tx_outputs(spent.to_vec());
            }
            for (input, output) in tx.output_refs() {
                if self.config.tracks_address(&output.address) {
                    summary.created += 1;
                    writer.add_tx_output(input, output.clone());
                }
            }
        }

        writer
            .set_latest_block_point(block.point())
            .remove_confirmed_block(block.number)
            .execute()?;

        tracing::info!(
            "[indexer] ✅ Applied block #{}: {} spent, {} created",
            summary.number,
            summary.spent,
            summary.created
        );
        Ok(summary)
    }
}

fn expect_number(expected: u64, actual: u64) -> Result<(), StorageError> {
    if expected != actual {
        tracing::warn!(
            "[indexer] ✗ Block numbering mismatch: expected {} vs {}",
            expected,
            actual
        );
        return Err(StorageError::NumberingMismatch { expected, actual });
    }
    Ok(())
}

fn successor(number: u64) -> Result<u64, StorageError> {
    number
        .checked_add(1)
        .ok_or(StorageError::BlockNumberOverflow { number })
}
