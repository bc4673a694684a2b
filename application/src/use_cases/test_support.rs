//! Shared test doubles for use case tests

use crate::ports::classifier::{Classification, ClassifierError, ClassifierGateway, ParcelImagery};
use crate::ports::history::SessionHistory;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use swarm_domain::{
    Agent, AgentId, AgentRegistry, ConsensusDecision, DisputeRecord, LandClass, ParcelId,
    QualitySummary, RegistryError, quorum::reputation,
};

/// In-memory registry double
#[derive(Default)]
pub struct TestRegistry {
    agents: Mutex<BTreeMap<AgentId, Agent>>,
}

#[async_trait]
impl AgentRegistry for TestRegistry {
    async fn register(&self, agent: Agent) -> Result<(), RegistryError> {
        self.agents
            .lock()
            .unwrap()
            .insert(agent.id.clone(), agent);
        Ok(())
    }

    async fn lookup(&self, id: &AgentId) -> Result<Agent, RegistryError> {
        self.agents
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    async fn snapshot(&self) -> Vec<Agent> {
        self.agents.lock().unwrap().values().cloned().collect()
    }

    async fn apply_outcome(&self, id: &AgentId, correct: bool) -> Result<f64, RegistryError> {
        let mut agents = self.agents.lock().unwrap();
        let agent = agents
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        agent.reputation = reputation::adjust(agent.reputation, correct);
        Ok(agent.reputation)
    }
}

/// In-memory history double
#[derive(Default)]
pub struct TestHistory {
    decisions: Mutex<Vec<ConsensusDecision>>,
    disputes: Mutex<Vec<DisputeRecord>>,
}

impl SessionHistory for TestHistory {
    fn record_decision(&self, decision: ConsensusDecision) {
        self.decisions.lock().unwrap().push(decision);
    }

    fn record_dispute(&self, record: DisputeRecord) {
        self.disputes.lock().unwrap().push(record);
    }

    fn decisions(&self) -> Vec<ConsensusDecision> {
        self.decisions.lock().unwrap().clone()
    }

    fn disputes(&self) -> Vec<DisputeRecord> {
        self.disputes.lock().unwrap().clone()
    }
}

/// Scripted classifier double
///
/// Responds per agent id; unscripted agents fail with `Unavailable`.
/// An optional delay simulates slow inference for deadline tests.
#[derive(Default)]
pub struct TestClassifier {
    responses: Mutex<BTreeMap<AgentId, Classification>>,
    delays: Mutex<BTreeMap<AgentId, Duration>>,
}

impl TestClassifier {
    pub fn script(&self, agent_id: impl Into<AgentId>, classification: Classification) {
        self.responses
            .lock()
            .unwrap()
            .insert(agent_id.into(), classification);
    }

    pub fn delay(&self, agent_id: impl Into<AgentId>, delay: Duration) {
        self.delays.lock().unwrap().insert(agent_id.into(), delay);
    }
}

#[async_trait]
impl ClassifierGateway for TestClassifier {
    async fn classify(
        &self,
        agent: &Agent,
        _imagery: &ParcelImagery,
    ) -> Result<Classification, ClassifierError> {
        let delay = self.delays.lock().unwrap().get(&agent.id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let response = self.responses.lock().unwrap().get(&agent.id).cloned();
        response.ok_or_else(|| ClassifierError::Unavailable(agent.id.to_string()))
    }
}

/// A minimal undisputed decision for tests that only need participants
pub fn decision_for(parcel: &str, class: LandClass, participants: &[&str]) -> ConsensusDecision {
    ConsensusDecision {
        parcel_id: ParcelId::new(parcel),
        winning_class: class,
        consensus_confidence: 0.9,
        participants: participants.iter().map(|id| AgentId::new(*id)).collect(),
        vote_counts: BTreeMap::from([(class, participants.len())]),
        weighted_distribution: BTreeMap::from([(class, 1.0)]),
        decision_certainty: 0.9,
        disputed: false,
        dispute_reason: None,
        timestamp_ms: 1_700_000_000_000,
        round_duration_ms: 1000,
        quality: QualitySummary {
            mean_confidence: 0.85,
            mean_quality: 0.8,
            discarded_votes: 0,
        },
    }
}
