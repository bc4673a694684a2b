//! Session history adapters

pub mod in_memory;
pub mod jsonl;

pub use in_memory::InMemorySessionHistory;
pub use jsonl::{JsonlSessionHistory, replay};
