//! Configuration loading

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileConfig, FileHistoryConfig, FileSimulationConfig, FileSwarmConfig,
};
pub use loader::ConfigLoader;
