//! # Transaction Writer
//!
//! Queues [`Mutation`] descriptors and commits them through
//! [`IndexerDb::commit`] as one atomic unit.

use super::IndexerDb;
use crate::adapters::serializer::encode_record;
use crate::domain::errors::StorageError;
use crate::domain::mutation::Mutation;
use crate::domain::value_objects::{Partition, LATEST_POINT_KEY};
use crate::ports::inbound::DbTransactionWriter;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use indexer_types::{encode_block_number, Block, ChainPoint, TxInput, TxOutput};
use std::collections::HashMap;

/// Writer batch bound to an [`IndexerDb`].
pub struct TxWriter<'a, S: KeyValueStore> {
    db: &'a IndexerDb<S>,
    mutations: Vec<Mutation>,
}

impl<'a, S: KeyValueStore> TxWriter<'a, S> {
    pub(crate) fn new(db: &'a IndexerDb<S>) -> Self {
        Self {
            db,
            mutations: Vec::new(),
        }
    }

    /// Mutations queued so far, in enqueue order.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Queue an arbitrary mutation descriptor.
    pub fn push(&mut self, mutation: Mutation) -> &mut Self {
        self.mutations.push(mutation);
        self
    }
}

impl<S: KeyValueStore> DbTransactionWriter for TxWriter<'_, S> {
    fn set_latest_block_point(&mut self, point: ChainPoint) -> &mut Self {
        self.push(Mutation::SetLatestBlockPoint(point))
    }

    fn add_tx_output(&mut self, input: TxInput, output: TxOutput) -> &mut Self {
        self.push(Mutation::AddTxOutput { input, output })
    }

    fn add_confirmed_block(&mut self, block: Block) -> &mut Self {
        self.push(Mutation::AddConfirmedBlock(block))
    }

    fn remove_tx_outputs(&mut self, inputs: Vec<TxInput>) -> &mut Self {
        self.push(Mutation::RemoveTxOutputs {
            inputs,
            strict: false,
        })
    }

    fn consume_tx_outputs(&mut self, inputs: Vec<TxInput>) -> &mut Self {
        self.push(Mutation::RemoveTxOutputs {
            inputs,
            strict: true,
        })
    }

    fn remove_confirmed_block(&mut self, number: u64) -> &mut Self {
        self.push(Mutation::RemoveConfirmedBlock { number })
    }

    fn execute(&mut self) -> Result<(), StorageError> {
        let mutations = std::mem::take(&mut self.mutations);
        self.db.commit(mutations)
    }
}

// =============================================================================
// STAGING
// =============================================================================

/// Interpret `mutations` in order into partition operations.
///
/// Strict removals see the effect of earlier mutations in the same batch
/// before falling back to the committed state.
pub(crate) fn stage<S: KeyValueStore>(
    store: &S,
    mutations: &[Mutation],
) -> Result<Vec<BatchOperation>, StorageError> {
    let mut staged: HashMap<Vec<u8>, bool> = HashMap::new();
    let mut operations = Vec::with_capacity(mutations.len());

    for mutation in mutations {
        let op = mutation.operation();

        match mutation {
            Mutation::SetLatestBlockPoint(point) => {
                let value = encode_record(point, op, LATEST_POINT_KEY)?;
                operations.push(BatchOperation::put(
                    Partition::LatestBlockPoint,
                    LATEST_POINT_KEY.as_bytes(),
                    value,
                ));
            }
            Mutation::AddTxOutput { input, output } => {
                let key = input.key();
                let value = encode_record(output, op, &input.to_string())?;
                staged.insert(key.clone(), true);
                operations.push(BatchOperation::put(Partition::TxOutputs, key, value));
            }
            Mutation::AddConfirmedBlock(block) => {
                let value = encode_record(block, op, &block.number.to_string())?;
                operations.push(BatchOperation::put(
                    Partition::UnprocessedBlocks,
                    block.key(),
                    value,
                ));
            }
            Mutation::RemoveTxOutputs { inputs, strict } => {
                for input in inputs {
                    let key = input.key();
                    if *strict && !is_present(store, &staged, &key, op, input)? {
                        return Err(StorageError::MissingEntry {
                            operation: op,
                            partition: Partition::TxOutputs,
                            key: input.to_string(),
                        });
                    }
                    staged.insert(key.clone(), false);
                    operations.push(BatchOperation::delete(Partition::TxOutputs, key));
                }
            }
            Mutation::RemoveConfirmedBlock { number } => {
                operations.push(BatchOperation::delete(
                    Partition::UnprocessedBlocks,
                    encode_block_number(*number),
                ));
            }
        }
    }

    Ok(operations)
}

fn is_present<S: KeyValueStore>(
    store: &S,
    staged: &HashMap<Vec<u8>, bool>,
    key: &[u8],
    operation: &'static str,
    input: &TxInput,
) -> Result<bool, StorageError> {
    if let Some(present) = staged.get(key) {
        return Ok(*present);
    }
    store
        .get(Partition::TxOutputs, key)
        .map(|value| value.is_some())
        .map_err(StorageError::database(operation, input.to_string()))
}
