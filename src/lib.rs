//! # MediPredict
//!
//! Terminal health screening front-end.
//!
//! This crate provides:
//! - Account signup and login against a local credential store
//! - Symptom triage over a fixed condition catalog
//! - Diabetes, heart disease and Parkinson's risk prediction with exported
//!   linear models
//! - A keyword FAQ assistant
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and pure logic (conditions, triage, features, sessions)
//! - `ports`: Trait definitions for credential storage and classifiers
//! - `adapters`: Concrete implementations (JSON file, SQLite, linear models)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{DiseaseModel, Prediction, Session};

/// Result type for MediPredict operations
pub type Result<T> = std::result::Result<T, MediPredictError>;

/// Main error type for MediPredict
#[derive(Debug, thiserror::Error)]
pub enum MediPredictError {
    #[error(transparent)]
    Auth(#[from] application::AuthError),

    #[error(transparent)]
    Triage(#[from] domain::TriageError),

    #[error(transparent)]
    Model(#[from] ports::ModelError),

    #[error(transparent)]
    Prediction(#[from] application::PredictionError),

    #[error("Storage operation failed: {0}")]
    Store(#[from] adapters::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
