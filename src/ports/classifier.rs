//! Classifier port: Trait for the externally trained prediction models.
//!
//! The models are opaque: the application only knows how many features a
//! model takes and that it returns a 0/1 label.

use crate::domain::DiseaseModel;

/// Errors that can occur while loading or invoking a model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{0} model is unavailable: {1}")]
    Unavailable(DiseaseModel, String),

    #[error("Feature count mismatch: got {got}, expected {expected}")]
    FeatureCountMismatch { expected: usize, got: usize },

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Model integrity check failed: {0}")]
    Integrity(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// A loaded binary classifier.
pub trait Classifier: Send + Sync {
    /// Number of features the model was trained on.
    fn feature_count(&self) -> usize;

    /// Predict a label for one feature vector.
    ///
    /// # Errors
    /// Returns `ModelError::FeatureCountMismatch` if `features` has the wrong
    /// length, or `ModelError::Inference` if the model cannot score it.
    fn predict(&self, features: &[f64]) -> Result<u8, ModelError>;
}
