//! In-memory agent registry

use async_trait::async_trait;
use std::collections::BTreeMap;
use swarm_domain::{Agent, AgentId, AgentRegistry, RegistryError, quorum::reputation};
use tokio::sync::RwLock;
use tracing::debug;

/// Agent registry backed by an in-process map
///
/// The write lock serializes reputation adjustments, so two rounds
/// finishing at the same time cannot interleave their updates to the same
/// agent. Reads work on snapshots and never block mutation for long.
#[derive(Default)]
pub struct InMemoryAgentRegistry {
    agents: RwLock<BTreeMap<AgentId, Agent>>,
}

impl InMemoryAgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered agents
    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }
}

#[async_trait]
impl AgentRegistry for InMemoryAgentRegistry {
    async fn register(&self, agent: Agent) -> Result<(), RegistryError> {
        debug!("Registering agent {}", agent.id);
        self.agents
            .write()
            .await
            .insert(agent.id.clone(), agent);
        Ok(())
    }

    async fn lookup(&self, id: &AgentId) -> Result<Agent, RegistryError> {
        self.agents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    async fn snapshot(&self) -> Vec<Agent> {
        self.agents.read().await.values().cloned().collect()
    }

    async fn apply_outcome(&self, id: &AgentId, correct: bool) -> Result<f64, RegistryError> {
        let mut agents = self.agents.write().await;
        let agent = agents
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        agent.reputation = reputation::adjust(agent.reputation, correct);
        agent.touch();
        Ok(agent.reputation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use swarm_domain::GeoPoint;

    fn agent(id: &str, reputation: f64) -> Agent {
        Agent::new(id, "resnet-field-v3", GeoPoint::new(45.0, 10.0)).with_reputation(reputation)
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let registry = InMemoryAgentRegistry::new();
        registry.register(agent("drone-01", 0.7)).await.unwrap();

        let found = registry.lookup(&AgentId::new("drone-01")).await.unwrap();
        assert_eq!(found.reputation, 0.7);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_missing_agent() {
        let registry = InMemoryAgentRegistry::new();
        let err = registry.lookup(&AgentId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reregistration_overwrites() {
        let registry = InMemoryAgentRegistry::new();
        registry.register(agent("drone-01", 0.5)).await.unwrap();
        registry.register(agent("drone-01", 0.8)).await.unwrap();

        assert_eq!(registry.len().await, 1);
        let found = registry.lookup(&AgentId::new("drone-01")).await.unwrap();
        assert_eq!(found.reputation, 0.8);
    }

    #[tokio::test]
    async fn test_apply_outcome_adjusts_and_touches() {
        let registry = InMemoryAgentRegistry::new();
        registry.register(agent("drone-01", 0.5)).await.unwrap();

        let up = registry
            .apply_outcome(&AgentId::new("drone-01"), true)
            .await
            .unwrap();
        assert!((up - 0.52).abs() < 1e-12);

        let down = registry
            .apply_outcome(&AgentId::new("drone-01"), false)
            .await
            .unwrap();
        assert!((down - 0.51).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_concurrent_outcomes_never_interleave() {
        let registry = Arc::new(InMemoryAgentRegistry::new());
        registry.register(agent("drone-01", 0.5)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry
                    .apply_outcome(&AgentId::new("drone-01"), true)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // 20 serialized +0.02 steps from 0.5
        let agent = registry.lookup(&AgentId::new("drone-01")).await.unwrap();
        assert!((agent.reputation - 0.9).abs() < 1e-9);
    }
}
