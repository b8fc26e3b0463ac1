//! Nullable store: in-memory key-value storage for testing.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tcr_store::{MetaStore, StoreError};

#[derive(Debug, Default)]
pub struct NullStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.entries()?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tcr_store::{load_snapshot, save_snapshot};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        values: Vec<u128>,
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = NullStore::new();
        assert!(matches!(store.get_meta("nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.get_schema_version(), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn snapshot_survives_save_and_load() {
        let store = NullStore::new();
        let sample = Sample {
            name: "registry".into(),
            values: vec![1, 2, u128::MAX],
        };
        save_snapshot(&store, "sample", &sample).unwrap();
        assert_eq!(store.get_schema_version().unwrap(), tcr_store::SCHEMA_VERSION);
        let loaded: Sample = load_snapshot(&store, "sample").unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn wrong_schema_version_is_rejected() {
        let store = NullStore::new();
        save_snapshot(&store, "sample", &7u32).unwrap();
        store.set_schema_version(99).unwrap();
        assert!(matches!(
            load_snapshot::<u32>(&store, "sample"),
            Err(StoreError::SchemaMismatch { found: 99, .. })
        ));
    }

    #[test]
    fn corrupted_version_is_reported() {
        let store = NullStore::new();
        store.put_meta("schema_version", &[1, 2]).unwrap();
        assert!(matches!(
            store.get_schema_version(),
            Err(StoreError::Corruption(_))
        ));
        store.delete_meta("schema_version").unwrap();
        assert!(store.is_empty());
    }
}
