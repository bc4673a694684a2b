//! In-memory session history

use std::sync::Mutex;
use swarm_application::SessionHistory;
use swarm_domain::{ConsensusDecision, DisputeRecord};

/// Session history kept entirely in process memory
///
/// Appends take the lock briefly; reads clone a snapshot so concurrent
/// rounds never observe a half-written log.
#[derive(Default)]
pub struct InMemorySessionHistory {
    decisions: Mutex<Vec<ConsensusDecision>>,
    disputes: Mutex<Vec<DisputeRecord>>,
}

impl InMemorySessionHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionHistory for InMemorySessionHistory {
    fn record_decision(&self, decision: ConsensusDecision) {
        if let Ok(mut decisions) = self.decisions.lock() {
            decisions.push(decision);
        }
    }

    fn record_dispute(&self, record: DisputeRecord) {
        if let Ok(mut disputes) = self.disputes.lock() {
            disputes.push(record);
        }
    }

    fn decisions(&self) -> Vec<ConsensusDecision> {
        self.decisions.lock().map(|d| d.clone()).unwrap_or_default()
    }

    fn disputes(&self) -> Vec<DisputeRecord> {
        self.disputes.lock().map(|d| d.clone()).unwrap_or_default()
    }
}
