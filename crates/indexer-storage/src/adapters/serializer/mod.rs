//! Serializer Adapters
//!
//! Record encoding for every partition value.

mod json;

pub use self::json::{decode_record, encode_record};
