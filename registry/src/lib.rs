//! Token-curated registry.
//!
//! Applicants stake tokens to list an entry. Any holder may challenge by
//! matching the stake, which opens a ballot; the loser's stake is split
//! between the winner and the voters on the winning side. Resolution also
//! mints new supply for the majority bloc through the token's supply oracle,
//! which the registry holds once deployed.

pub mod engine;
pub mod error;
pub mod event;
pub mod listing;

pub use engine::{ChallengeOutcome, Registry, RegistryContext};
pub use error::RegistryError;
pub use event::RegistryEvent;
pub use listing::{Listing, ListingStatus};
pub use tcr_parameterizer::Challenge;
