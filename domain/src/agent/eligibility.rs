//! Eligibility filtering for one validation round
//!
//! Narrows the registry snapshot to agents capable of participating:
//! enough battery, recently active, and close enough to the target parcel.
//! Pure read; an empty result is not an error here, the quorum step
//! decides whether the round can proceed.

use super::entities::Agent;
use crate::config::EligibilityConfig;
use crate::core::geo::GeoPoint;
use crate::core::land::LandClass;
use serde::{Deserialize, Serialize};

/// Suitability boost for agents specializing in the hinted land class
const HINT_SPECIALIST_BONUS: f64 = 0.1;

/// An eligible agent with its round-specific ranking inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedAgent {
    pub agent: Agent,
    /// Great-circle distance to the target parcel, in km
    pub distance_km: f64,
    /// Composite ranking score used for participant selection
    pub suitability: f64,
}

/// Filter a registry snapshot down to the eligible pool for one target
///
/// Exclusions: capacity below the configured floor, inactive longer than
/// the idle bound, or farther than `max_distance_km` from the target.
/// The result is ordered by suitability descending, ties broken by
/// reputation descending.
pub fn eligible_agents(
    agents: &[Agent],
    target: &GeoPoint,
    hint: Option<LandClass>,
    config: &EligibilityConfig,
    now_ms: u64,
) -> Vec<RankedAgent> {
    let max_idle_ms = config.max_idle_secs.saturating_mul(1000);

    let mut ranked: Vec<RankedAgent> = agents
        .iter()
        .filter(|agent| agent.capacity >= config.min_capacity)
        .filter(|agent| now_ms.saturating_sub(agent.last_active_ms) <= max_idle_ms)
        .filter_map(|agent| {
            let distance_km = agent.position.distance_km(target);
            if distance_km > config.max_distance_km {
                return None;
            }
            let suitability = suitability(agent, distance_km, hint.as_ref(), config);
            Some(RankedAgent {
                agent: agent.clone(),
                distance_km,
                suitability,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.suitability
            .partial_cmp(&a.suitability)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.agent
                    .reputation
                    .partial_cmp(&a.agent.reputation)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    ranked
}

/// Composite suitability: half capacity, half proximity, plus a bonus when
/// the agent specializes in the hinted class. Reputation is deliberately
/// kept out of the score; it is the tiebreaker.
fn suitability(
    agent: &Agent,
    distance_km: f64,
    hint: Option<&LandClass>,
    config: &EligibilityConfig,
) -> f64 {
    let proximity = 1.0 - (distance_km / config.max_distance_km).clamp(0.0, 1.0);
    let mut score = 0.5 * agent.capacity + 0.5 * proximity;
    if let Some(class) = hint
        && agent.is_specialist(class)
    {
        score += HINT_SPECIALIST_BONUS;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: u64 = 1_700_000_000_000;

    fn target() -> GeoPoint {
        GeoPoint::new(45.0, 10.0)
    }

    fn nearby_agent(id: &str) -> Agent {
        // ~1.1 km from the target
        Agent::new(id, "resnet-field-v3", GeoPoint::new(45.01, 10.0))
            .with_reputation(0.7)
            .with_capacity(0.9)
            .with_last_active_ms(NOW_MS)
    }

    fn config() -> EligibilityConfig {
        EligibilityConfig::default()
    }

    #[test]
    fn test_excludes_low_capacity() {
        let agents = vec![
            nearby_agent("a").with_capacity(0.2),
            nearby_agent("b").with_capacity(0.31),
        ];
        let eligible = eligible_agents(&agents, &target(), None, &config(), NOW_MS);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].agent.id.as_str(), "b");
    }

    #[test]
    fn test_excludes_stale_agents() {
        let two_hours_ago = NOW_MS - 2 * 3600 * 1000;
        let agents = vec![
            nearby_agent("fresh"),
            nearby_agent("stale").with_last_active_ms(two_hours_ago),
        ];
        let eligible = eligible_agents(&agents, &target(), None, &config(), NOW_MS);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].agent.id.as_str(), "fresh");
    }

    #[test]
    fn test_excludes_distant_agents() {
        // ~111 km away, far beyond the 10 km default bound
        let distant = Agent::new("far", "resnet-field-v3", GeoPoint::new(46.0, 10.0))
            .with_capacity(1.0)
            .with_last_active_ms(NOW_MS);
        let agents = vec![nearby_agent("near"), distant];
        let eligible = eligible_agents(&agents, &target(), None, &config(), NOW_MS);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].agent.id.as_str(), "near");
    }

    #[test]
    fn test_ordering_prefers_higher_suitability() {
        let strong = nearby_agent("strong").with_capacity(1.0);
        let weak = nearby_agent("weak").with_capacity(0.4);
        let eligible = eligible_agents(
            &[weak.clone(), strong.clone()],
            &target(),
            None,
            &config(),
            NOW_MS,
        );
        assert_eq!(eligible[0].agent.id.as_str(), "strong");
        assert!(eligible[0].suitability > eligible[1].suitability);
    }

    #[test]
    fn test_ties_broken_by_reputation() {
        let low_rep = nearby_agent("low").with_reputation(0.5);
        let high_rep = nearby_agent("high").with_reputation(0.9);
        let eligible = eligible_agents(&[low_rep, high_rep], &target(), None, &config(), NOW_MS);
        assert_eq!(eligible[0].agent.id.as_str(), "high");
    }

    #[test]
    fn test_hint_specialists_rank_first() {
        let generalist = nearby_agent("generalist");
        let specialist = nearby_agent("specialist").with_specialization(LandClass::Forest);
        let eligible = eligible_agents(
            &[generalist, specialist],
            &target(),
            Some(LandClass::Forest),
            &config(),
            NOW_MS,
        );
        assert_eq!(eligible[0].agent.id.as_str(), "specialist");
    }

    #[test]
    fn test_empty_pool_is_not_an_error() {
        let eligible = eligible_agents(&[], &target(), None, &config(), NOW_MS);
        assert!(eligible.is_empty());
    }
}
