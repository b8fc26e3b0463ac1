//! Parameter store for the registry's economic constants.
//!
//! Values change only through proposals: a proposal escrows a deposit, may be
//! challenged during its apply stage, and takes effect once processed. Reads
//! always return the committed value, never a pending one.
//!
//! [`reward`] holds the deposit-split arithmetic shared with the registry, and
//! [`Challenge`] the claim bookkeeping both use.

pub mod challenge;
pub mod engine;
pub mod error;
pub mod event;
pub mod proposal;
pub mod reward;

pub use challenge::Challenge;
pub use engine::{ParamContext, Parameterizer, PROCESS_BY_WINDOW};
pub use error::ParameterizerError;
pub use event::ParameterizerEvent;
pub use proposal::ParamProposal;
