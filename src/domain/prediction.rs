//! Prediction result types.
//!
//! Represents the output of one of the three binary disease classifiers.

use serde::{Deserialize, Serialize};

/// The three externally trained classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiseaseModel {
    Diabetes,
    HeartDisease,
    Parkinsons,
}

impl DiseaseModel {
    pub const ALL: [DiseaseModel; 3] = [Self::Diabetes, Self::HeartDisease, Self::Parkinsons];

    /// Length of the feature vector the model was trained on.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        match self {
            Self::Diabetes => 8,
            Self::HeartDisease => 13,
            Self::Parkinsons => 22,
        }
    }

    /// File name of the exported model inside the model directory.
    #[must_use]
    pub fn artifact_name(&self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes_model.json",
            Self::HeartDisease => "heart_disease_model.json",
            Self::Parkinsons => "parkinsons_model.json",
        }
    }

    /// Human-readable tool title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes Risk Prediction",
            Self::HeartDisease => "Heart Disease Risk Prediction",
            Self::Parkinsons => "Parkinson's Disease Prediction",
        }
    }

    /// Short label for menus and status panels.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes",
            Self::HeartDisease => "Heart Disease",
            Self::Parkinsons => "Parkinsons",
        }
    }
}

impl std::fmt::Display for DiseaseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Output of a classifier call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub model: DiseaseModel,

    /// Binary label (0 = negative, 1 = positive)
    pub label: u8,
}

impl Prediction {
    /// Create a new prediction. Any non-zero label is treated as positive.
    #[must_use]
    pub fn new(model: DiseaseModel, label: u8) -> Self {
        Self {
            model,
            label: u8::from(label != 0),
        }
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.label == 1
    }

    /// Result headline shown on the prediction screen.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match (self.model, self.is_positive()) {
            (DiseaseModel::Diabetes, true) => "Result: Positive for Diabetes Risk",
            (DiseaseModel::Diabetes, false) => "Result: Negative (Healthy)",
            (DiseaseModel::HeartDisease, true) => "Result: Heart Disease Detected",
            (DiseaseModel::HeartDisease, false) => "Result: Healthy Heart",
            (DiseaseModel::Parkinsons, true) => "Result: Parkinson's Detected",
            (DiseaseModel::Parkinsons, false) => "Result: Healthy Pattern",
        }
    }

    /// Follow-up text below the headline.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match (self.model, self.is_positive()) {
            (DiseaseModel::Diabetes, true) => {
                "The model has identified patterns consistent with diabetes."
            }
            (DiseaseModel::Diabetes, false) => "No significant risk factors identified.",
            (DiseaseModel::HeartDisease, true) => "Please consult a cardiologist immediately.",
            (DiseaseModel::HeartDisease, false) => "Cardiovascular metrics appear normal.",
            (DiseaseModel::Parkinsons, true) => {
                "Vocal biomarkers match the Parkinson's pattern. Consult a neurologist."
            }
            (DiseaseModel::Parkinsons, false) => "Vocal biomarkers are within the healthy pattern.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_counts() {
        assert_eq!(DiseaseModel::Diabetes.feature_count(), 8);
        assert_eq!(DiseaseModel::HeartDisease.feature_count(), 13);
        assert_eq!(DiseaseModel::Parkinsons.feature_count(), 22);
    }

    #[test]
    fn test_label_normalized() {
        assert!(Prediction::new(DiseaseModel::Diabetes, 1).is_positive());
        assert!(Prediction::new(DiseaseModel::Diabetes, 7).is_positive());
        assert!(!Prediction::new(DiseaseModel::Diabetes, 0).is_positive());
    }

    #[test]
    fn test_headlines() {
        let positive = Prediction::new(DiseaseModel::HeartDisease, 1);
        assert_eq!(positive.headline(), "Result: Heart Disease Detected");

        let negative = Prediction::new(DiseaseModel::Parkinsons, 0);
        assert_eq!(negative.headline(), "Result: Healthy Pattern");
    }
}
