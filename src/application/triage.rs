//! Triage service: symptom matching against the condition catalog.

use std::collections::BTreeSet;

use crate::domain::condition;
use crate::domain::triage::{self, TriageError, TriageReport};
use crate::domain::{ConditionEntry, DiseaseModel, CONDITIONS};

/// Ranks catalog conditions by symptom overlap.
pub struct TriageService {
    catalog: &'static [ConditionEntry],
}

impl Default for TriageService {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageService {
    /// Service over the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(&CONDITIONS)
    }

    #[must_use]
    pub fn with_catalog(catalog: &'static [ConditionEntry]) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &'static [ConditionEntry] {
        self.catalog
    }

    /// Options for the symptom multi-select, sorted and de-duplicated.
    #[must_use]
    pub fn all_symptoms(&self) -> Vec<&'static str> {
        condition::symptoms_of(self.catalog)
    }

    /// Rank conditions for the selected symptoms.
    ///
    /// # Errors
    /// Returns `TriageError::EmptySelection` if nothing is selected.
    pub fn analyze(&self, selected: &BTreeSet<String>) -> Result<TriageReport, TriageError> {
        let report = triage::analyze(self.catalog, selected)?;
        match report.top() {
            Some(top) => tracing::debug!(
                "Triage: {} candidate(s), top match_count={}",
                report.results.len(),
                top.match_count
            ),
            None => tracing::debug!("Triage: no matching condition"),
        }
        Ok(report)
    }

    /// Prediction tool suggested for the report's top condition.
    #[must_use]
    pub fn related_model(&self, report: &TriageReport) -> Option<DiseaseModel> {
        report.related_model(self.catalog)
    }
}
