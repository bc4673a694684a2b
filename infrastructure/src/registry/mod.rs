//! Agent registry adapters

pub mod in_memory;
pub mod roster;

pub use in_memory::InMemoryAgentRegistry;
pub use roster::{Roster, RosterEntry, RosterError};
