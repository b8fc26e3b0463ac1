//! Storage traits for persisting deployments.
//!
//! A backend only needs to implement [`MetaStore`], a flat key-value store.
//! Typed state goes through [`snapshot`], which encodes it with bincode under
//! a schema version.

pub mod error;
pub mod meta;
pub mod snapshot;

pub use error::StoreError;
pub use meta::MetaStore;
pub use snapshot::{load_snapshot, save_snapshot, SCHEMA_VERSION};
