//! Commit atomicity of writer batches.

use indexer_storage::{BlockIndexerDb, DbTransactionWriter, IndexerDb, Partition, StorageError};
use indexer_types::{ChainPoint, TxInput, TxOutput};
use proptest::prelude::*;

proptest! {
    /// A strict removal of an absent entry at any position aborts the whole
    /// batch, including the mutations queued before it.
    #[test]
    fn failing_mutation_aborts_batch(outputs in 1usize..16, position in 0usize..16) {
        let db = IndexerDb::in_memory();
        let position = position % (outputs + 1);

        let mut writer = db.open_tx();
        for i in 0..outputs {
            if i == position {
                writer.consume_tx_outputs(vec![TxInput::new("absent", 0)]);
            }
            writer.add_tx_output(TxInput::new("tx", i as u32), TxOutput::new("addr", i as u64));
        }
        if position == outputs {
            writer.consume_tx_outputs(vec![TxInput::new("absent", 0)]);
        }
        writer.set_latest_block_point(ChainPoint::new(1, vec![1; 32], 1));

        let result = writer.execute();
        prop_assert!(
            matches!(result, Err(StorageError::MissingEntry { .. })),
            "unexpected result: {:?}",
            result
        );
        prop_assert!(writer.is_empty());

        for partition in Partition::ALL {
            prop_assert_eq!(db.store().len(partition), 0);
        }
        prop_assert_eq!(db.get_latest_block_point().unwrap(), None);
    }

    /// The last write to a spend-key within one batch wins.
    #[test]
    fn last_write_wins(amounts in prop::collection::vec(any::<u64>(), 1..8), remove in any::<bool>()) {
        let db = IndexerDb::in_memory();
        let input = TxInput::new("tx", 0);

        let mut writer = db.open_tx();
        for amount in &amounts {
            writer.add_tx_output(input.clone(), TxOutput::new("addr", *amount));
        }
        if remove {
            writer.remove_tx_outputs(vec![input.clone()]);
        }
        writer.execute().unwrap();

        let expected = (!remove).then(|| TxOutput::new("addr", *amounts.last().unwrap()));
        prop_assert_eq!(db.get_tx_output(&input).unwrap(), expected);
    }
}
