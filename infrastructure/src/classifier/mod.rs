//! Classifier gateway adapters

pub mod fixture;

pub use fixture::SimulatedClassifier;
