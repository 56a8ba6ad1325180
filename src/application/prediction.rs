//! Prediction service: routes validated clinical input to the loaded models.
//!
//! Each of the three models is loaded independently; a missing or broken
//! artifact disables that tool only.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::adapters::linear_model::ModelLoader;
use crate::domain::{ClinicalInput, DiseaseModel, Prediction};
use crate::ports::{Classifier, ModelError};

/// Errors from a prediction request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Load state of one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStatus {
    Ready { feature_count: usize },
    Unavailable(String),
}

impl ModelStatus {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Service holding the three classifiers.
#[derive(Default)]
pub struct PredictionService {
    classifiers: BTreeMap<DiseaseModel, Arc<dyn Classifier>>,
    unavailable: BTreeMap<DiseaseModel, String>,
}

impl PredictionService {
    /// A service with no models loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every model the loader can find, recording failures per model.
    #[must_use]
    pub fn from_loader(loader: &ModelLoader) -> Self {
        let mut service = Self::new();
        for (model, result) in loader.load_all() {
            match result {
                Ok(linear) => service.insert(model, Arc::new(linear)),
                Err(e) => {
                    tracing::warn!("{} model disabled: {}", model, e);
                    service.mark_unavailable(model, e.to_string());
                }
            }
        }
        tracing::info!(
            "Prediction models ready: {}/{}",
            service.classifiers.len(),
            DiseaseModel::ALL.len()
        );
        service
    }

    /// Register a classifier for a model, replacing any previous one.
    pub fn insert(&mut self, model: DiseaseModel, classifier: Arc<dyn Classifier>) {
        self.unavailable.remove(&model);
        self.classifiers.insert(model, classifier);
    }

    #[must_use]
    pub fn with_classifier(mut self, model: DiseaseModel, classifier: Arc<dyn Classifier>) -> Self {
        self.insert(model, classifier);
        self
    }

    /// Record why a model could not be loaded.
    pub fn mark_unavailable(&mut self, model: DiseaseModel, reason: impl Into<String>) {
        self.classifiers.remove(&model);
        self.unavailable.insert(model, reason.into());
    }

    #[must_use]
    pub fn is_available(&self, model: DiseaseModel) -> bool {
        self.classifiers.contains_key(&model)
    }

    /// Load state of all three models, in menu order.
    #[must_use]
    pub fn status(&self) -> Vec<(DiseaseModel, ModelStatus)> {
        DiseaseModel::ALL
            .into_iter()
            .map(|model| {
                let status = match self.classifiers.get(&model) {
                    Some(c) => ModelStatus::Ready {
                        feature_count: c.feature_count(),
                    },
                    None => ModelStatus::Unavailable(
                        self.unavailable
                            .get(&model)
                            .cloned()
                            .unwrap_or_else(|| "not loaded".to_string()),
                    ),
                };
                (model, status)
            })
            .collect()
    }

    /// Run one model on a raw feature vector.
    ///
    /// # Errors
    /// `ModelError::Unavailable` if the model is not loaded,
    /// `ModelError::FeatureCountMismatch` for a wrong-length vector.
    pub fn predict(&self, model: DiseaseModel, features: &[f64]) -> Result<Prediction, ModelError> {
        let classifier = self.classifiers.get(&model).ok_or_else(|| {
            ModelError::Unavailable(
                model,
                self.unavailable
                    .get(&model)
                    .cloned()
                    .unwrap_or_else(|| "not loaded".to_string()),
            )
        })?;

        let expected = classifier.feature_count();
        if features.len() != expected {
            return Err(ModelError::FeatureCountMismatch {
                expected,
                got: features.len(),
            });
        }

        let label = classifier.predict(features)?;
        let prediction = Prediction::new(model, label);
        tracing::info!(
            "{} prediction complete: positive={}",
            model,
            prediction.is_positive()
        );
        Ok(prediction)
    }

    /// Validate a form submission and run its model.
    ///
    /// # Errors
    /// `PredictionError::InvalidInput` listing every out-of-range field, or the
    /// model error.
    pub fn predict_input(&self, input: &ClinicalInput) -> Result<Prediction, PredictionError> {
        input.validate().map_err(PredictionError::InvalidInput)?;

        if input.uses_placeholders() {
            tracing::warn!(
                "RPDE/DFA not supplied; using legacy placeholder values for the Parkinson's model"
            );
        }

        Ok(self.predict(input.model(), &input.to_vec())?)
    }
}
