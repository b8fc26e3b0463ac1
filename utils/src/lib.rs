//! Shared utilities for the registry binaries.

pub mod logging;
pub mod time;

pub use logging::{init_tracing, LogFormat};
pub use time::format_duration;
