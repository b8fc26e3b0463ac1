//! Wiring for complete registry deployments.
//!
//! A [`Deployment`] owns one token ledger, ballot engine, parameter store and
//! (optionally) registry, plus the clock every call is timed against. The
//! factories build deployments either around a freshly minted token or an
//! existing one; [`TcrConfig`] describes a deployment in TOML or JSON.

pub mod config;
pub mod deployment;
pub mod error;
pub mod event;
pub mod factory;

pub use config::{ConfigError, TcrConfig, TokenConfig, TokenHolder};
pub use deployment::{Deployment, DeploymentState};
pub use error::TcrError;
pub use event::TcrEvent;
pub use factory::{ParameterizerFactory, RegistryFactory};
