//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod auth;
mod prediction;
mod triage;

pub use auth::{AuthError, AuthService};
pub use prediction::{ModelStatus, PredictionError, PredictionService};
pub use triage::TriageService;

#[cfg(test)]
pub(crate) use auth::tests::MemoryStore;
#[cfg(test)]
pub(crate) use prediction::tests::service_with_all;
