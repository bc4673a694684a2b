//! Session Report use case
//!
//! Summarizes everything the engine decided so far: dispute rate, round
//! timing, certainty, agent participation, and a session grade.

use crate::ports::history::SessionHistory;
use std::sync::Arc;
use swarm_domain::SessionReport;
use tracing::info;

/// Use case for producing a session summary
pub struct SessionReportUseCase {
    history: Arc<dyn SessionHistory>,
}

impl SessionReportUseCase {
    pub fn new(history: Arc<dyn SessionHistory>) -> Self {
        Self { history }
    }

    /// Summarize the recorded decisions and disputes
    ///
    /// An empty history is valid and yields a zeroed report.
    pub fn execute(&self) -> SessionReport {
        let decisions = self.history.decisions();
        let disputes = self.history.disputes();
        info!(
            "Generating session report over {} decisions, {} disputes",
            decisions.len(),
            disputes.len()
        );
        SessionReport::from_logs(&decisions, &disputes)
    }
}
