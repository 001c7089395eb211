use crate::core::store::KeyValueBackend;
use anyhow::Result;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "goals";

/// Backend over a fjall keyspace. Every write is flushed to disk before returning.
/// Clones share the same keyspace.
#[derive(Clone)]
pub struct DiskBackend {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskBackend {
    pub fn open(data_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_path)?;

        let keyspace = Config::new(data_path.join("store")).open()?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueBackend for DiskBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.partition.get(key)?.map(|slice| slice.to_vec());
        if value.is_some() {
            debug!("Storage HIT for key: {}", key);
        } else {
            debug!("Storage MISS for key: {}", key);
        }
        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.partition.insert(key, value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Storage PUT for key: {}", key);
        Ok(())
    }
}
