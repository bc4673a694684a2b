//! Aggregate session reporting
//!
//! Derives performance metrics on demand from the append-only decision and
//! dispute logs. Nothing here mutates state.

use crate::agent::value_objects::AgentId;
use crate::core::land::LandClass;
use crate::quorum::consensus::ConsensusDecision;
use crate::quorum::dispute::DisputeRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Letter grade summarizing session health
///
/// Graded on dispute rate and mean consensus confidence:
/// A: rate < 0.1 and confidence > 0.8; B: < 0.2 / > 0.7;
/// C: < 0.3 / > 0.6; otherwise D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceGrade {
    A,
    B,
    C,
    D,
}

impl PerformanceGrade {
    fn from_metrics(dispute_rate: f64, mean_confidence: f64) -> Self {
        if dispute_rate < 0.1 && mean_confidence > 0.8 {
            PerformanceGrade::A
        } else if dispute_rate < 0.2 && mean_confidence > 0.7 {
            PerformanceGrade::B
        } else if dispute_rate < 0.3 && mean_confidence > 0.6 {
            PerformanceGrade::C
        } else {
            PerformanceGrade::D
        }
    }
}

impl std::fmt::Display for PerformanceGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PerformanceGrade::A => "A",
            PerformanceGrade::B => "B",
            PerformanceGrade::C => "C",
            PerformanceGrade::D => "D",
        };
        write!(f, "{}", s)
    }
}

/// Aggregate metrics over a session's decisions and disputes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Total completed rounds
    pub rounds: usize,
    /// Total disputed rounds
    pub disputes: usize,
    /// Disputed rounds / total rounds
    pub dispute_rate: f64,
    /// Mean round duration, in milliseconds
    pub mean_duration_ms: f64,
    /// Mean decision certainty
    pub mean_certainty: f64,
    /// Mean consensus confidence
    pub mean_confidence: f64,
    /// Rounds each agent participated in
    pub participation: BTreeMap<AgentId, usize>,
    /// Decisions per winning class
    pub decisions_by_class: BTreeMap<LandClass, usize>,
    /// Letter grade from dispute rate and mean confidence
    pub grade: PerformanceGrade,
}

impl SessionReport {
    /// Build the report from log snapshots
    pub fn from_logs(decisions: &[ConsensusDecision], disputes: &[DisputeRecord]) -> Self {
        let rounds = decisions.len();
        let dispute_rate = if rounds == 0 {
            0.0
        } else {
            disputes.len() as f64 / rounds as f64
        };

        let mut participation: BTreeMap<AgentId, usize> = BTreeMap::new();
        let mut decisions_by_class: BTreeMap<LandClass, usize> = BTreeMap::new();
        let mut duration_total = 0.0;
        let mut certainty_total = 0.0;
        let mut confidence_total = 0.0;

        for decision in decisions {
            duration_total += decision.round_duration_ms as f64;
            certainty_total += decision.decision_certainty;
            confidence_total += decision.consensus_confidence;
            *decisions_by_class.entry(decision.winning_class).or_insert(0) += 1;
            for agent_id in &decision.participants {
                *participation.entry(agent_id.clone()).or_insert(0) += 1;
            }
        }

        let denom = rounds.max(1) as f64;
        let mean_confidence = confidence_total / denom;

        Self {
            rounds,
            disputes: disputes.len(),
            dispute_rate,
            mean_duration_ms: duration_total / denom,
            mean_certainty: certainty_total / denom,
            mean_confidence,
            participation,
            decisions_by_class,
            grade: PerformanceGrade::from_metrics(dispute_rate, mean_confidence),
        }
    }
}
