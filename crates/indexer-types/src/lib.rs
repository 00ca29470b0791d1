//! # Indexer Types Crate
//!
//! Flat, storage-friendly records for the UTXO indexer and the mapper that
//! builds them from the chain-sync client's era-specific native objects.
//!
//! ## Records
//!
//! | Record | Key |
//! |--------|-----|
//! | `ChainPoint` | singleton checkpoint |
//! | `Block` | big-endian 8-byte block number |
//! | `Tx` | transaction hash |
//! | `TxInput` | spend-key `"<hash>_<index>"` |
//! | `TxOutput` | addressed through the owning `TxInput` |
//!
//! ## Mapping
//!
//! ```text
//! (BlockType, NativeHeader) ──BlockHeader::from_native──→ BlockHeader ┐
//!                                                                       ├──→ Block::new
//! [LedgerTransaction] ─────────txs_from_ledger──────────→ Vec<Tx>     ┘
//! ```
//!
//! The mapper is pure: every failure is returned as a [`MappingError`].

pub mod entities;
pub mod era;
pub mod errors;
pub mod mapper;

pub use entities::{
    decode_block_number, encode_block_number, Block, BlockHeader, ChainPoint, Tx, TxInput,
    TxOutput,
};
pub use era::{
    BabbageFamilyHeader, BlockType, EbbHeader, Era, HeaderFamily, HeaderView, MainHeader,
    NativeHeader, ShelleyFamilyHeader,
};
pub use errors::MappingError;
pub use mapper::{txs_from_ledger, LedgerTransaction};
