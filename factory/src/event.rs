use serde::{Deserialize, Serialize};
use tcr_parameterizer::ParameterizerEvent;
use tcr_registry::RegistryEvent;
use tcr_types::Address;
use tcr_voting::VotingEvent;

/// Events from every component of a deployment, in emission order per component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TcrEvent {
    DeploymentCreated {
        creator: Address,
        token: Address,
        voting: Address,
        parameterizer: Address,
        registry: Option<Address>,
    },
    Voting(VotingEvent),
    Parameterizer(ParameterizerEvent),
    Registry(RegistryEvent),
}
