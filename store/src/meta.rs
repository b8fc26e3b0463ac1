//! Key-value storage trait.

use crate::StoreError;

const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Flat byte store keyed by string.
pub trait MetaStore {
    /// Store a value, replacing any previous one.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a value. Missing keys are `StoreError::NotFound`.
    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    fn delete_meta(&self, key: &str) -> Result<(), StoreError>;

    /// Stored schema version, or `NotFound` if none was written.
    fn get_schema_version(&self) -> Result<u32, StoreError> {
        let raw = self.get_meta(SCHEMA_VERSION_KEY)?;
        let bytes: [u8; 4] = raw
            .as_slice()
            .try_into()
            .map_err(|_| StoreError::Corruption(format!("schema version has {} bytes", raw.len())))?;
        Ok(u32::from_be_bytes(bytes))
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.put_meta(SCHEMA_VERSION_KEY, &version.to_be_bytes())
    }
}
