//! Classifier gateway port
//!
//! Defines the interface to the external classification collaborator that
//! produces one prediction per agent per parcel. Implementations (adapters)
//! live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swarm_domain::{Agent, LandClass, ParcelId};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from the classification collaborator
///
/// Any of these is recovered locally: the affected agent's vote is dropped
/// and the round continues unless quorum becomes unmet.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Imagery not found: {0}")]
    ImageryNotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Reference to the imagery a round validates against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelImagery {
    /// Parcel the imagery covers
    pub parcel_id: ParcelId,
    /// Opaque reference into the acquisition/storage pipeline
    pub tile_uri: String,
    /// Capture timestamp (milliseconds since epoch), if known
    pub captured_at_ms: Option<u64>,
}

impl ParcelImagery {
    pub fn new(parcel_id: impl Into<ParcelId>, tile_uri: impl Into<String>) -> Self {
        Self {
            parcel_id: parcel_id.into(),
            tile_uri: tile_uri.into(),
            captured_at_ms: None,
        }
    }

    pub fn with_captured_at_ms(mut self, timestamp_ms: u64) -> Self {
        self.captured_at_ms = Some(timestamp_ms);
        self
    }
}

/// One classification result, before weighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Predicted land class
    pub predicted: LandClass,
    /// Scalar confidence, 0.0 to 1.0
    pub confidence: f64,
    /// Full probability distribution over land classes
    pub class_probabilities: BTreeMap<LandClass, f64>,
    /// Image/evidence quality score, 0.0 to 1.0
    pub quality_score: f64,
    /// Processing latency, in milliseconds
    pub latency_ms: f64,
}

impl Classification {
    pub fn new(predicted: LandClass, confidence: f64) -> Self {
        Self {
            predicted,
            confidence,
            class_probabilities: BTreeMap::new(),
            quality_score: 0.0,
            latency_ms: 0.0,
        }
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality_score = quality;
        self
    }

    pub fn with_probability(mut self, class: LandClass, probability: f64) -> Self {
        self.class_probabilities.insert(class, probability);
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: f64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

/// Gateway to the upstream image classifier
///
/// One call per agent per round; each call may block on remote inference,
/// so the round bounds total collection time and treats late results as
/// non-votes.
#[async_trait]
pub trait ClassifierGateway: Send + Sync {
    /// Classify the parcel imagery as seen by the given agent
    async fn classify(
        &self,
        agent: &Agent,
        imagery: &ParcelImagery,
    ) -> Result<Classification, ClassifierError>;
}
