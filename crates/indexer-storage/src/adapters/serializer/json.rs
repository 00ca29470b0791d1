use crate::domain::errors::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a record as JSON.
///
/// JSON is field-tagged, so records written by older versions keep decoding
/// when fields are added with `#[serde(default)]`.
pub fn encode_record<T: Serialize>(
    value: &T,
    operation: &'static str,
    key: &str,
) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(value).map_err(|e| StorageError::Serialization {
        operation,
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Decode a record previously written by [`encode_record`].
pub fn decode_record<T: DeserializeOwned>(
    data: &[u8],
    operation: &'static str,
    key: &str,
) -> Result<T, StorageError> {
    serde_json::from_slice(data).map_err(|e| StorageError::Serialization {
        operation,
        key: key.to_string(),
        message: e.to_string(),
    })
}
