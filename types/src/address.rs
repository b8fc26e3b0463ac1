//! Account identity used for escrow accounting and authorization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account on the token ledger.
///
/// Externally owned parties and components (registry, ballot engine,
/// parameterizer) all hold balances under an `Address`. The string form is
/// opaque: the core only compares addresses for equality.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create a new address from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Address of a component inside a named deployment, e.g. `my-tcr/registry`.
    pub fn component(deployment: &str, component: &str) -> Self {
        Self(format!("{deployment}/{component}"))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed (non-empty, no whitespace).
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_address_joins_deployment_and_component() {
        let addr = Address::component("adchain", "registry");
        assert_eq!(addr.as_str(), "adchain/registry");
        assert!(addr.is_valid());
    }

    #[test]
    fn empty_or_spaced_addresses_are_invalid() {
        assert!(!Address::new("").is_valid());
        assert!(!Address::new("alice smith").is_valid());
        assert!(Address::new("alice").is_valid());
    }
}
