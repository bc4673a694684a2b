//! Agent entity, registry port, and eligibility filtering

pub mod eligibility;
pub mod entities;
pub mod registry;
pub mod value_objects;
