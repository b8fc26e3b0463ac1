//! Typed snapshots on top of [`MetaStore`].

use crate::{MetaStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Version written alongside every snapshot.
pub const SCHEMA_VERSION: u32 = 1;

/// Encode `value` with bincode and store it under `key`.
pub fn save_snapshot<T: Serialize>(
    store: &dyn MetaStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = bincode::serialize(value)?;
    store.set_schema_version(SCHEMA_VERSION)?;
    store.put_meta(key, &bytes)
}

/// Load and decode the snapshot under `key`.
pub fn load_snapshot<T: DeserializeOwned>(store: &dyn MetaStore, key: &str) -> Result<T, StoreError> {
    let found = store.get_schema_version()?;
    if found != SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            found,
            expected: SCHEMA_VERSION,
        });
    }
    let bytes = store.get_meta(key)?;
    Ok(bincode::deserialize(&bytes)?)
}
