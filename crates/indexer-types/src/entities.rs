//! # Core Domain Entities
//!
//! Records persisted by the indexer. Every record is encoded with a
//! self-describing, field-tagged format; byte fields travel as hex strings.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use std::fmt;

// =============================================================================
// KEYS
// =============================================================================

/// Encode a block number as the big-endian key of the pending-blocks table.
///
/// Big-endian keeps lexicographic key order equal to numeric order.
pub fn encode_block_number(number: u64) -> [u8; 8] {
    number.to_be_bytes()
}

/// Decode a pending-blocks key back into a block number.
pub fn decode_block_number(key: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

// =============================================================================
// CHAIN POINT
// =============================================================================

/// Cursor into the chain: the indexer's resume position.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPoint {
    pub slot: u64,
    #[serde_as(as = "Hex")]
    pub hash: Vec<u8>,
    pub number: u64,
}

impl ChainPoint {
    pub fn new(slot: u64, hash: impl Into<Vec<u8>>, number: u64) -> Self {
        Self {
            slot,
            hash: hash.into(),
            number,
        }
    }
}

impl fmt::Display for ChainPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "number = {}, slot = {}, hash = {}",
            self.number,
            self.slot,
            hex::encode(&self.hash)
        )
    }
}

// =============================================================================
// BLOCK HEADER / BLOCK
// =============================================================================

/// Validated header of a native block.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub slot: u64,
    #[serde_as(as = "Hex")]
    pub hash: Vec<u8>,
    pub number: u64,
    pub era_id: u8,
    pub era_name: String,
}

/// A confirmed block with its transactions.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub slot: u64,
    #[serde_as(as = "Hex")]
    pub hash: Vec<u8>,
    pub number: u64,
    pub era_id: u8,
    pub era_name: String,
    pub txs: Vec<Tx>,
}

impl Block {
    /// Assemble a block from a validated header and its mapped transactions.
    pub fn new(header: BlockHeader, txs: Vec<Tx>) -> Self {
        Self {
            slot: header.slot,
            hash: header.hash,
            number: header.number,
            era_id: header.era_id,
            era_name: header.era_name,
            txs,
        }
    }

    /// Key of this block in the pending-blocks table.
    pub fn key(&self) -> [u8; 8] {
        encode_block_number(self.number)
    }

    /// The chain point naming this block.
    pub fn point(&self) -> ChainPoint {
        ChainPoint::new(self.slot, self.hash.clone(), self.number)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "number = {}, hash = {}, tx count = {}",
            self.number,
            hex::encode(&self.hash),
            self.txs.len()
        )?;

        for tx in &self.txs {
            let inputs = tx
                .inputs
                .iter()
                .flatten()
                .map(|inp| format!("[{}, {}]", inp.hash, inp.index))
                .collect::<Vec<_>>()
                .join(", ");
            let outputs = tx
                .outputs
                .iter()
                .flatten()
                .enumerate()
                .map(|(i, out)| format!("[{}, {}, {}]", i, out.address, out.amount))
                .collect::<Vec<_>>()
                .join(", ");

            writeln!(f, "  tx hash = {}, fee = {}", tx.hash, tx.fee)?;
            if let Some(metadata) = &tx.metadata {
                writeln!(f, "  meta = {}", String::from_utf8_lossy(metadata))?;
            }
            writeln!(f, "   inputs = {}", inputs)?;
            writeln!(f, "  outputs = {}", outputs)?;
        }

        Ok(())
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// A transaction within a block.
///
/// Empty input/output lists are stored as `None`, never as an empty list.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub hash: String,
    #[serde_as(as = "Option<Hex>")]
    #[serde(default)]
    pub metadata: Option<Vec<u8>>,
    #[serde(default)]
    pub inputs: Option<Vec<TxInput>>,
    #[serde(default)]
    pub outputs: Option<Vec<TxOutput>>,
    pub fee: u64,
}

impl Tx {
    /// Spend-key references under which each output of this transaction
    /// becomes spendable, paired with the output itself.
    pub fn output_refs(&self) -> impl Iterator<Item = (TxInput, &TxOutput)> + '_ {
        self.outputs
            .iter()
            .flatten()
            .enumerate()
            .map(move |(index, output)| (TxInput::new(self.hash.clone(), index as u32), output))
    }

    /// Inputs consumed by this transaction.
    pub fn spent_inputs(&self) -> &[TxInput] {
        self.inputs.as_deref().unwrap_or_default()
    }
}

/// Reference to a previously created output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxInput {
    #[serde(rename = "id")]
    pub hash: String,
    pub index: u32,
}

impl TxInput {
    pub fn new(hash: impl Into<String>, index: u32) -> Self {
        Self {
            hash: hash.into(),
            index,
        }
    }

    /// Spend-key `"<hash>_<index>"` into the UTXO set.
    pub fn key(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for TxInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.hash, self.index)
    }
}

/// A spendable value record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: String,
    pub amount: u64,
}

impl TxOutput {
    pub fn new(address: impl Into<String>, amount: u64) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }
}
