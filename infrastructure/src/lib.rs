//! Infrastructure layer for parcel-swarm
//!
//! Adapters implementing the application-layer ports: the in-memory agent
//! registry, session history (in-memory and JSONL), the simulated
//! classifier, and configuration loading.

pub mod classifier;
pub mod config;
pub mod history;
pub mod registry;

// Re-export commonly used types
pub use classifier::SimulatedClassifier;
pub use config::{ConfigLoader, FileConfig};
pub use history::{InMemorySessionHistory, JsonlSessionHistory};
pub use registry::{InMemoryAgentRegistry, Roster, RosterError};
