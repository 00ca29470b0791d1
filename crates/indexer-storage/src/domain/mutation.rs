//! # Mutation Descriptors
//!
//! A writer batch is an ordered list of these descriptors. Nothing touches the
//! store until the batch is interpreted at commit time.

use indexer_types::{Block, ChainPoint, TxInput, TxOutput};

/// One queued store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Overwrite the singleton checkpoint.
    SetLatestBlockPoint(ChainPoint),
    /// Insert or overwrite the UTXO entry for `input`'s spend-key.
    AddTxOutput { input: TxInput, output: TxOutput },
    /// Persist a confirmed block into the pending-blocks table.
    AddConfirmedBlock(Block),
    /// Delete UTXO entries. With `strict`, a missing entry aborts the commit.
    RemoveTxOutputs { inputs: Vec<TxInput>, strict: bool },
    /// Delete a block from the pending-blocks table.
    RemoveConfirmedBlock { number: u64 },
}

impl Mutation {
    /// Operation name used in error context and logs.
    pub const fn operation(&self) -> &'static str {
        match self {
            Mutation::SetLatestBlockPoint(_) => "set latest block point",
            Mutation::AddTxOutput { .. } => "add tx output",
            Mutation::AddConfirmedBlock(_) => "add confirmed block",
            Mutation::RemoveTxOutputs { strict: false, .. } => "remove tx outputs",
            Mutation::RemoveTxOutputs { strict: true, .. } => "consume tx outputs",
            Mutation::RemoveConfirmedBlock { .. } => "remove confirmed block",
        }
    }
}
