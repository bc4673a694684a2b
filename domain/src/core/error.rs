//! Domain error types

use crate::agent::value_objects::AgentId;
use thiserror::Error;

/// Errors raised by agent registry operations
///
/// Registration rejections carry the compared values so callers can act
/// on them without inspecting registry internals.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Reputation {reputation:.2} below registration minimum {minimum:.2}")]
    LowReputation { reputation: f64, minimum: f64 },

    #[error("Confidence threshold {threshold:.2} above allowed maximum {maximum:.2}")]
    ThresholdTooHigh { threshold: f64, maximum: f64 },

    #[error("Agent not found: {0}")]
    NotFound(AgentId),
}

impl RegistryError {
    /// Whether the error is a registration rejection (caller must fix inputs)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            RegistryError::LowReputation { .. } | RegistryError::ThresholdTooHigh { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_reputation_display() {
        let err = RegistryError::LowReputation {
            reputation: 0.2,
            minimum: 0.3,
        };
        assert_eq!(
            err.to_string(),
            "Reputation 0.20 below registration minimum 0.30"
        );
    }

    #[test]
    fn test_is_rejection() {
        assert!(
            RegistryError::ThresholdTooHigh {
                threshold: 0.95,
                maximum: 0.9
            }
            .is_rejection()
        );
        assert!(!RegistryError::NotFound(AgentId::new("drone-1")).is_rejection());
    }
}
