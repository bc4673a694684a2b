//! Application layer for parcel-swarm
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig};
pub use ports::{
    classifier::{Classification, ClassifierError, ClassifierGateway, ParcelImagery},
    history::SessionHistory,
    progress::{NoProgress, RoundProgress},
};
pub use use_cases::apply_outcome::ApplyOutcomeUseCase;
pub use use_cases::register_agent::RegisterAgentUseCase;
pub use use_cases::run_round::{RoundOutcome, RunRoundError, RunRoundInput, RunRoundUseCase};
pub use use_cases::session_report::SessionReportUseCase;
