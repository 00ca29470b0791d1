//! # Domain Layer
//!
//! Pure types for the indexer store: no storage engine dependencies.
//!
//! ## Modules
//!
//! - `errors` - Store, writer and pipeline error types
//! - `mutation` - Tagged mutation descriptors queued by the writer
//! - `value_objects` - Partition layout, fixed keys and configuration

pub mod errors;
pub mod mutation;
pub mod value_objects;
