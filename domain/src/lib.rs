//! Domain layer for parcel-swarm
//!
//! Core entities and algorithms of the swarm validation consensus engine.
//! This crate has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Swarm validation
//!
//! Classification claims about land parcels are validated by collecting
//! independent votes from autonomous field agents (drones/satellites) and
//! reducing them through weighted quorum consensus:
//!
//! - **Eligibility**: which agents may participate in a round
//! - **Quorum**: how many of them must vote for the round to count
//! - **Weighted consensus**: one decision with a calibrated certainty
//! - **Dispute**: a remediation signal when the swarm disagrees
//! - **Reputation**: bounded trust feedback from ground truth

pub mod agent;
pub mod config;
pub mod core;
pub mod quorum;
pub mod report;

// Re-export commonly used types
pub use agent::{
    eligibility::{RankedAgent, eligible_agents},
    entities::{Agent, MAX_CONFIDENCE_THRESHOLD, MIN_REGISTRATION_REPUTATION},
    registry::AgentRegistry,
    value_objects::{AgentId, ParcelId},
};
pub use config::{ConsensusConfig, DisputeThresholds, EligibilityConfig};
pub use core::{error::RegistryError, geo::GeoPoint, land::LandClass};
pub use quorum::{
    ConsensusDecision, DisputeRecord, DisputeStatistics, Priority, QualitySummary, QuorumPlan,
    RemediationStrategy, RoundPhase, ValidationVote, WeightedTally, WeightedVote,
};
pub use report::{PerformanceGrade, SessionReport};
