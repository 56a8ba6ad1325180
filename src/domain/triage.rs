//! Symptom triage: rank catalog conditions by symptom overlap.

use std::collections::BTreeSet;

use serde::Serialize;

use super::condition::{ConditionEntry, Severity};
use super::prediction::DiseaseModel;

/// Match count at which the display confidence saturates.
///
/// Arbitrary display heuristic inherited from the UI; not a probability.
pub const CONFIDENCE_SATURATION: usize = 4;

/// How many runner-up conditions the result view lists.
pub const MAX_OTHER_CAUSES: usize = 3;

/// Errors raised by the symptom checker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriageError {
    #[error("Please select at least one symptom")]
    EmptySelection,
}

/// One candidate condition sharing at least one symptom with the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageResult {
    pub condition: &'static str,
    pub match_count: usize,
    /// Matched symptoms in catalog order.
    pub matched_symptoms: Vec<&'static str>,
    pub severity: Severity,
    pub advice: &'static str,
}

/// Ranked outcome of one symptom check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageReport {
    /// Results sorted by match count, descending; ties keep catalog order.
    pub results: Vec<TriageResult>,
}

impl TriageReport {
    /// Highest-ranked result, if any condition matched.
    #[must_use]
    pub fn top(&self) -> Option<&TriageResult> {
        self.results.first()
    }

    /// `min(match_count / 4, 1.0)` for the top result, 0.0 when nothing matched.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.top().map_or(0.0, |top| {
            (top.match_count as f64 / CONFIDENCE_SATURATION as f64).min(1.0)
        })
    }

    /// Runner-up conditions (ranks 2 to 4).
    #[must_use]
    pub fn other_causes(&self) -> &[TriageResult] {
        let end = self.results.len().min(1 + MAX_OTHER_CAUSES);
        if self.results.len() > 1 {
            &self.results[1..end]
        } else {
            &[]
        }
    }

    /// Whether no condition shared a symptom with the selection.
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        self.results.is_empty()
    }

    /// Prediction tool linked from the top result.
    #[must_use]
    pub fn related_model(&self, catalog: &[ConditionEntry]) -> Option<DiseaseModel> {
        let top = self.top()?;
        catalog
            .iter()
            .find(|c| c.name == top.condition)
            .and_then(ConditionEntry::related_model)
    }
}

/// Rank the catalog against the selected symptoms.
///
/// # Errors
/// Returns `TriageError::EmptySelection` if no symptom is selected.
pub fn analyze(
    catalog: &'static [ConditionEntry],
    selected: &BTreeSet<String>,
) -> Result<TriageReport, TriageError> {
    if selected.is_empty() {
        return Err(TriageError::EmptySelection);
    }

    let mut results: Vec<TriageResult> = catalog
        .iter()
        .filter_map(|entry| {
            let matched: Vec<&'static str> = entry
                .symptoms
                .iter()
                .copied()
                .filter(|s| selected.contains(*s))
                .collect();
            if matched.is_empty() {
                return None;
            }
            Some(TriageResult {
                condition: entry.name,
                match_count: matched.len(),
                matched_symptoms: matched,
                severity: entry.severity,
                advice: entry.advice,
            })
        })
        .collect();

    // `sort_by` is stable: equal counts keep catalog order.
    results.sort_by(|a, b| b.match_count.cmp(&a.match_count));

    Ok(TriageReport { results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::condition::CONDITIONS;

    fn select(symptoms: &[&str]) -> BTreeSet<String> {
        symptoms.iter().map(|s| (*s).to_string()).collect()
    }

    fn names(report: &TriageReport) -> Vec<&'static str> {
        report.results.iter().map(|r| r.condition).collect()
    }

    #[test]
    fn test_empty_selection() {
        let result = analyze(&CONDITIONS, &BTreeSet::new());
        assert_eq!(result, Err(TriageError::EmptySelection));
    }

    #[test]
    fn test_fever_and_tremors() {
        let report =
            analyze(&CONDITIONS, &select(&["Fever", "Tremors (Shaking)"])).expect("Should rank");

        // Every result matches at least one selected symptom
        assert!(report.results.iter().all(|r| r.match_count > 0));
        assert!(names(&report).contains(&"Parkinson's Disease"));
        assert!(names(&report).contains(&"COVID-19"));
        // Common Cold lists "Low Fever", not "Fever"
        assert!(!names(&report).contains(&"Common Cold"));

        // All tie at one match, so catalog order is kept
        assert_eq!(
            names(&report),
            vec![
                "Appendicitis",
                "Kidney Stones",
                "COVID-19",
                "Parkinson's Disease"
            ]
        );
    }

    #[test]
    fn test_ranked_by_match_count() {
        let report = analyze(
            &CONDITIONS,
            &select(&["Chest Pain", "Sweating", "Nausea", "Shortness of Breath", "Trembling"]),
        )
        .expect("Should rank");

        let top = report.top().expect("Should have a top result");
        assert_eq!(top.condition, "Heart Attack (Myocardial Infarction)");
        assert_eq!(top.match_count, 4);
        assert_eq!(top.severity, Severity::Critical);
        assert!((report.confidence() - 1.0).abs() < f64::EPSILON);

        // Anxiety matches Sweating, Shortness of Breath, Trembling
        assert_eq!(report.results[1].condition, "Anxiety/Panic Attack");
        assert_eq!(report.results[1].match_count, 3);

        let counts: Vec<usize> = report.results.iter().map(|r| r.match_count).collect();
        let mut sorted = counts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(counts, sorted);
    }

    #[test]
    fn test_confidence_scaling() {
        let report = analyze(&CONDITIONS, &select(&["Sneezing", "Runny Nose"])).expect("Should rank");
        assert_eq!(report.top().map(|t| t.condition), Some("Common Cold"));
        assert!((report.confidence() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let report = analyze(&CONDITIONS, &select(&["Hiccups"])).expect("Should not fail");
        assert!(report.is_no_match());
        assert!(report.top().is_none());
        assert_eq!(report.confidence(), 0.0);
        assert!(report.other_causes().is_empty());
    }

    #[test]
    fn test_other_causes_capped() {
        // Nausea alone matches five conditions
        let report = analyze(&CONDITIONS, &select(&["Nausea"])).expect("Should rank");
        assert_eq!(report.results.len(), 5);
        assert_eq!(report.other_causes().len(), MAX_OTHER_CAUSES);
        assert_eq!(report.other_causes()[0].condition, "Appendicitis");
    }

    #[test]
    fn test_idempotent() {
        let selection = select(&["Fever", "Nausea", "Fatigue"]);
        let first = analyze(&CONDITIONS, &selection).expect("Should rank");
        let second = analyze(&CONDITIONS, &selection).expect("Should rank");
        assert_eq!(first, second);
    }

    #[test]
    fn test_related_model_link() {
        let report = analyze(&CONDITIONS, &select(&["Increased Thirst", "Extreme Hunger"]))
            .expect("Should rank");
        assert_eq!(report.related_model(&CONDITIONS), Some(DiseaseModel::Diabetes));
    }
}
