//! Core domain primitives shared across modules

pub mod error;
pub mod geo;
pub mod land;
