//! Nullable infrastructure for deterministic testing.
//!
//! Time and storage sit behind traits ([`tcr_types::Clock`],
//! [`tcr_store::MetaStore`]). The implementations here are controlled
//! programmatically and never touch the system clock or the filesystem.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullStore;
