use crate::config::ConfigError;
use tcr_parameterizer::ParameterizerError;
use tcr_registry::RegistryError;
use tcr_store::StoreError;
use tcr_token::TokenError;
use tcr_types::ErrorKind;
use tcr_voting::VotingError;
use thiserror::Error;

/// Any failure surfaced by a deployment.
#[derive(Debug, Error)]
pub enum TcrError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("voting error: {0}")]
    Voting(#[from] VotingError),

    #[error("parameterizer error: {0}")]
    Parameterizer(#[from] ParameterizerError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("deployment {0} has no registry")]
    NoRegistry(String),
}

impl TcrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::InvalidState,
            Self::Token(e) => e.kind(),
            Self::Voting(e) => e.kind(),
            Self::Parameterizer(e) => e.kind(),
            Self::Registry(e) => e.kind(),
            Self::Store(StoreError::NotFound(_)) | Self::NoRegistry(_) => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Invariant,
        }
    }
}
