//! Reputation feedback
//!
//! Once ground truth for a parcel is known, every participating agent's
//! trust score moves by a small bounded delta. Correct consensus pays
//! twice what incorrect consensus costs, so reliable agents climb faster
//! than unlucky ones fall.

/// Reputation gained when the consensus matched ground truth
pub const CORRECT_DELTA: f64 = 0.02;

/// Reputation lost when the consensus missed ground truth
pub const INCORRECT_PENALTY: f64 = 0.01;

/// Adjust a reputation score from one validation outcome
///
/// The result is always within [0.0, 1.0].
///
/// # Example
///
/// ```
/// use swarm_domain::quorum::reputation;
///
/// assert!((reputation::adjust(0.5, true) - 0.52).abs() < 1e-12);
/// assert!((reputation::adjust(0.5, false) - 0.49).abs() < 1e-12);
/// assert_eq!(reputation::adjust(0.995, true), 1.0);
/// ```
pub fn adjust(current: f64, correct: bool) -> f64 {
    let adjusted = if correct {
        current + CORRECT_DELTA
    } else {
        current - INCORRECT_PENALTY
    };
    adjusted.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_outcomes_increase_monotonically() {
        let mut reputation = 0.5;
        for _ in 0..100 {
            let next = adjust(reputation, true);
            assert!(next >= reputation);
            reputation = next;
        }
        assert_eq!(reputation, 1.0);
    }

    #[test]
    fn test_incorrect_outcomes_decrease_monotonically() {
        let mut reputation = 0.5;
        for _ in 0..100 {
            let next = adjust(reputation, false);
            assert!(next <= reputation);
            reputation = next;
        }
        assert_eq!(reputation, 0.0);
    }

    #[test]
    fn test_always_within_bounds() {
        assert_eq!(adjust(1.0, true), 1.0);
        assert_eq!(adjust(0.0, false), 0.0);
        assert!((adjust(0.99, true) - 1.0).abs() < 1e-12);
        assert!((adjust(0.005, false) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_deltas() {
        assert!((adjust(0.7, true) - 0.72).abs() < 1e-12);
        assert!((adjust(0.7, false) - 0.69).abs() < 1e-12);
    }
}
