//! Agent registry port
//!
//! The registry is the only state shared across concurrent validation
//! rounds. Implementations (adapters) live in the infrastructure layer and
//! must serialize mutations per agent: two rounds finishing at the same
//! time may both adjust the same agent's reputation.

use super::entities::Agent;
use super::value_objects::AgentId;
use crate::core::error::RegistryError;
use async_trait::async_trait;

/// Registry of known agents
///
/// `register` is idempotent by identifier: re-registering an existing agent
/// overwrites the previous record. `apply_outcome` is the only mutation
/// path after registration.
#[async_trait]
pub trait AgentRegistry: Send + Sync {
    /// Insert or overwrite an agent after the admission check passes
    async fn register(&self, agent: Agent) -> Result<(), RegistryError>;

    /// Current state of one agent
    async fn lookup(&self, id: &AgentId) -> Result<Agent, RegistryError>;

    /// Snapshot of all registered agents
    async fn snapshot(&self) -> Vec<Agent>;

    /// Adjust one agent's reputation from a validation outcome
    ///
    /// `correct` means the consensus the agent participated in matched
    /// ground truth. Returns the new reputation. Must be atomic per agent;
    /// see [`crate::quorum::reputation::adjust`] for the delta rule.
    async fn apply_outcome(&self, id: &AgentId, correct: bool) -> Result<f64, RegistryError>;
}
