//! Register Agent use case
//!
//! Admits a field agent into the registry after the reputation and
//! confidence-threshold checks pass.

use std::sync::Arc;
use swarm_domain::{Agent, AgentRegistry, RegistryError};
use tracing::{info, warn};

/// Use case for admitting agents into the swarm
pub struct RegisterAgentUseCase {
    registry: Arc<dyn AgentRegistry>,
}

impl RegisterAgentUseCase {
    pub fn new(registry: Arc<dyn AgentRegistry>) -> Self {
        Self { registry }
    }

    /// Run the admission check and register the agent
    ///
    /// Registration is idempotent by identifier: re-registering overwrites
    /// the previous record, which lets an agent update its position or
    /// capacity by re-announcing itself.
    pub async fn execute(&self, agent: Agent) -> Result<(), RegistryError> {
        if let Err(e) = agent.admission_check() {
            warn!("Agent {} rejected: {}", agent.id, e);
            return Err(e);
        }

        info!(
            "Registering agent {} (model {}, reputation {:.2})",
            agent.id, agent.model_version, agent.reputation
        );
        self.registry.register(agent).await
    }
}
