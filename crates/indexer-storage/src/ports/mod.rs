//! # Ports Layer
//!
//! - `inbound` - Store, writer and database traits (driving ports)
//! - `outbound` - Partitioned key-value engine contract (driven ports)

pub mod inbound;
pub mod outbound;
