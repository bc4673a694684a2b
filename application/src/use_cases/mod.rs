//! Use cases orchestrating the validation pipeline

pub mod apply_outcome;
pub mod register_agent;
pub mod run_round;
pub mod session_report;

#[cfg(test)]
pub mod test_support;
