//! Apply Outcome use case
//!
//! Feeds ground truth back into agent reputations after a decision has
//! been verified. Every participant of the round receives the same
//! adjustment direction: the consensus they produced either matched the
//! verified class or it did not.

use std::sync::Arc;
use swarm_domain::{AgentId, AgentRegistry, ConsensusDecision, LandClass, RegistryError};
use tracing::{info, warn};

/// Use case for applying verified outcomes to agent reputations
pub struct ApplyOutcomeUseCase {
    registry: Arc<dyn AgentRegistry>,
}

impl ApplyOutcomeUseCase {
    pub fn new(registry: Arc<dyn AgentRegistry>) -> Self {
        Self { registry }
    }

    /// Adjust participant reputations against the verified class
    ///
    /// Rounds without ground truth leave reputations untouched; most
    /// parcels are never verified. Participants that have left the
    /// registry since the round are skipped with a warning rather than
    /// failing the whole batch. Returns each adjusted agent with its new
    /// reputation.
    pub async fn execute(
        &self,
        decision: &ConsensusDecision,
        ground_truth: Option<LandClass>,
    ) -> Result<Vec<(AgentId, f64)>, RegistryError> {
        let Some(class) = ground_truth else {
            return Ok(Vec::new());
        };
        let correct = decision.winning_class == class;

        info!(
            "Applying outcome for parcel {}: consensus {} judged {}",
            decision.parcel_id,
            decision.winning_class,
            if correct { "correct" } else { "incorrect" }
        );

        let mut adjusted = Vec::with_capacity(decision.participants.len());
        for agent_id in &decision.participants {
            match self.registry.apply_outcome(agent_id, correct).await {
                Ok(reputation) => adjusted.push((agent_id.clone(), reputation)),
                Err(RegistryError::NotFound(id)) => {
                    warn!("Agent {} no longer registered, skipping adjustment", id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(adjusted)
    }
}
