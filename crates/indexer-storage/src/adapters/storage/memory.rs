use crate::domain::errors::KVStoreError;
use crate::domain::value_objects::Partition;
use crate::ports::outbound::{BatchOperation, Entry, KeyValueStore, ScanResult};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

type PartitionData = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory key-value store for unit tests and ephemeral indexers.
///
/// A batch is applied under a single write lock, so readers observe all of
/// it or none of it.
pub struct InMemoryKVStore {
    data: RwLock<HashMap<Partition, PartitionData>>,
}

impl Default for InMemoryKVStore {
    fn default() -> Self {
        let data = Partition::ALL
            .iter()
            .map(|p| (*p, PartitionData::new()))
            .collect();
        Self {
            data: RwLock::new(data),
        }
    }
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries stored in `partition`.
    pub fn len(&self, partition: Partition) -> usize {
        self.data.read().get(&partition).map_or(0, BTreeMap::len)
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, partition: Partition, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let data = self.data.read();
        let table = data
            .get(&partition)
            .ok_or(KVStoreError::MissingPartition(partition))?;
        Ok(table.get(key).cloned())
    }

    fn scan(&self, partition: Partition) -> Result<ScanResult, KVStoreError> {
        let data = self.data.read();
        let table = data
            .get(&partition)
            .ok_or(KVStoreError::MissingPartition(partition))?;
        Ok(table.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn first(&self, partition: Partition) -> Result<Option<Entry>, KVStoreError> {
        let data = self.data.read();
        let table = data
            .get(&partition)
            .ok_or(KVStoreError::MissingPartition(partition))?;
        Ok(table.first_key_value().map(|(k, v)| (k.clone(), v.clone())))
    }

    fn last(&self, partition: Partition) -> Result<Option<Entry>, KVStoreError> {
        let data = self.data.read();
        let table = data
            .get(&partition)
            .ok_or(KVStoreError::MissingPartition(partition))?;
        Ok(table.last_key_value().map(|(k, v)| (k.clone(), v.clone())))
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut data = self.data.write();

        // Every partition must exist before anything is applied.
        if let Some(op) = operations.iter().find(|op| !data.contains_key(&op.partition())) {
            return Err(KVStoreError::MissingPartition(op.partition()));
        }

        for op in operations {
            match op {
                BatchOperation::Put {
                    partition,
                    key,
                    value,
                } => {
                    if let Some(table) = data.get_mut(&partition) {
                        table.insert(key, value);
                    }
                }
                BatchOperation::Delete { partition, key } => {
                    if let Some(table) = data.get_mut(&partition) {
                        table.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }
}
