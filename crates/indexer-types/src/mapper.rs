//! # Native Object Mapper
//!
//! Pure conversion of the chain-sync client's native headers and ledger
//! transactions into indexer records.

use crate::entities::{BlockHeader, Tx, TxInput, TxOutput};
use crate::era::{BlockType, HeaderView, NativeHeader};
use crate::errors::MappingError;

/// Ledger transaction surface the mapper depends on.
pub trait LedgerTransaction {
    fn hash(&self) -> String;
    fn fee(&self) -> u64;
    /// CBOR-encoded auxiliary metadata, when the transaction carries any.
    fn metadata_cbor(&self) -> Option<&[u8]>;
    fn inputs(&self) -> Vec<TxInput>;
    fn outputs(&self) -> Vec<TxOutput>;
}

impl BlockHeader {
    /// Validate a native header against the expected next block number.
    ///
    /// A zero embedded number means the shape is not self-describing and the
    /// expected number is used instead.
    pub fn from_native(
        block_type: BlockType,
        header: &NativeHeader,
        next_block_number: u64,
    ) -> Result<Self, MappingError> {
        if block_type.family() != header.family() {
            return Err(MappingError::HeaderMismatch {
                block_type,
                expected: block_type.family(),
                actual: header.family(),
            });
        }

        let view = header.view();
        let hash = hex::decode(view.hash()).map_err(|e| MappingError::InvalidHash {
            hash: view.hash().to_string(),
            message: e.to_string(),
        })?;

        let number = match view.block_number() {
            0 => next_block_number,
            n if n != next_block_number => {
                return Err(MappingError::NumberingMismatch {
                    expected: next_block_number,
                    actual: n,
                })
            }
            n => n,
        };

        let era = view.era();
        Ok(Self {
            slot: view.slot(),
            hash,
            number,
            era_id: era.id,
            era_name: era.name.clone(),
        })
    }
}

impl Tx {
    /// Flatten a ledger transaction. Empty input/output lists become `None`.
    pub fn from_ledger<T: LedgerTransaction + ?Sized>(ledger_tx: &T) -> Self {
        let inputs = ledger_tx.inputs();
        let outputs = ledger_tx.outputs();

        Self {
            hash: ledger_tx.hash(),
            metadata: ledger_tx.metadata_cbor().map(<[u8]>::to_vec),
            inputs: (!inputs.is_empty()).then_some(inputs),
            outputs: (!outputs.is_empty()).then_some(outputs),
            fee: ledger_tx.fee(),
        }
    }
}

/// Map a block body's transactions, preserving order.
pub fn txs_from_ledger<T: LedgerTransaction>(ledger_txs: &[T]) -> Vec<Tx> {
    ledger_txs.iter().map(Tx::from_ledger).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Block;
    use crate::era::{BabbageFamilyHeader, EbbHeader, ShelleyFamilyHeader};

    struct FakeTx {
        hash: &'static str,
        fee: u64,
        metadata: Option<Vec<u8>>,
        inputs: Vec<(&'static str, u32)>,
        outputs: Vec<(&'static str, u64)>,
    }

    impl LedgerTransaction for FakeTx {
        fn hash(&self) -> String {
            self.hash.to_string()
        }

        fn fee(&self) -> u64 {
            self.fee
        }

        fn metadata_cbor(&self) -> Option<&[u8]> {
            self.metadata.as_deref()
        }

        fn inputs(&self) -> Vec<TxInput> {
            self.inputs
                .iter()
                .map(|(h, i)| TxInput::new(*h, *i))
                .collect()
        }

        fn outputs(&self) -> Vec<TxOutput> {
            self.outputs
                .iter()
                .map(|(a, v)| TxOutput::new(*a, *v))
                .collect()
        }
    }

    fn shelley(block_number: u64) -> NativeHeader {
        NativeHeader::ShelleyFamily(ShelleyFamilyHeader {
            hash: "a1b2".to_string(),
            slot: 1000,
            block_number,
            era: BlockType::Alonzo.era(),
        })
    }

    #[test]
    fn test_header_mapping() {
        let header = BlockHeader::from_native(BlockType::Alonzo, &shelley(10), 10).unwrap();
        assert_eq!(header.slot, 1000);
        assert_eq!(header.hash, vec![0xa1, 0xb2]);
        assert_eq!(header.number, 10);
        assert_eq!(header.era_id, 4);
        assert_eq!(header.era_name, "Alonzo");
    }

    #[test]
    fn test_numbering_mismatch() {
        let err = BlockHeader::from_native(BlockType::Alonzo, &shelley(11), 10).unwrap_err();
        assert_eq!(
            err,
            MappingError::NumberingMismatch {
                expected: 10,
                actual: 11
            }
        );
    }

    #[test]
    fn test_zero_number_uses_expected() {
        let ebb = NativeHeader::Ebb(EbbHeader {
            hash: "ff".to_string(),
            epoch: 1,
            era: BlockType::ByronEbb.era(),
        });
        let header = BlockHeader::from_native(BlockType::ByronEbb, &ebb, 21).unwrap();
        assert_eq!(header.number, 21);
        assert_eq!(header.slot, 21_600);
    }

    #[test]
    fn test_header_family_mismatch() {
        let err = BlockHeader::from_native(BlockType::Babbage, &shelley(1), 1).unwrap_err();
        assert!(matches!(err, MappingError::HeaderMismatch { .. }));
    }

    #[test]
    fn test_invalid_hash() {
        let header = NativeHeader::BabbageFamily(BabbageFamilyHeader {
            hash: "not-hex".to_string(),
            slot: 1,
            block_number: 1,
            protocol_version: (8, 0),
            era: BlockType::Babbage.era(),
        });
        let err = BlockHeader::from_native(BlockType::Babbage, &header, 1).unwrap_err();
        assert!(matches!(err, MappingError::InvalidHash { .. }));
    }

    #[test]
    fn test_transaction_mapping() {
        let txs = txs_from_ledger(&[
            FakeTx {
                hash: "tx1",
                fee: 3,
                metadata: Some(vec![0xa0]),
                inputs: vec![],
                outputs: vec![("addrA", 100)],
            },
            FakeTx {
                hash: "tx2",
                fee: 4,
                metadata: None,
                inputs: vec![("tx1", 0)],
                outputs: vec![],
            },
        ]);

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].hash, "tx1");
        assert_eq!(txs[0].metadata, Some(vec![0xa0]));
        assert_eq!(txs[0].inputs, None);
        assert_eq!(txs[0].outputs, Some(vec![TxOutput::new("addrA", 100)]));
        assert_eq!(txs[1].inputs, Some(vec![TxInput::new("tx1", 0)]));
        assert_eq!(txs[1].outputs, None);
        assert_eq!(txs[1].fee, 4);
    }

    #[test]
    fn test_block_assembly() {
        let header = BlockHeader::from_native(BlockType::Alonzo, &shelley(3), 3).unwrap();
        let block = Block::new(header.clone(), txs_from_ledger::<FakeTx>(&[]));
        assert_eq!(block.number, 3);
        assert_eq!(block.hash, header.hash);
        assert_eq!(block.era_name, "Alonzo");
        assert!(block.txs.is_empty());
    }
}
