//! Static condition catalog used by the symptom checker.
//!
//! The table order matters: triage ranks by match count with a stable sort, so
//! conditions listed earlier win ties. Emergencies are listed first.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::prediction::DiseaseModel;

/// Ordinal urgency attached to a condition. Drives display emphasis only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),       // Emerald (#10B981)
            Self::Medium => (251, 191, 36),    // Amber (#FBBF24)
            Self::High => (249, 115, 22),      // Orange (#F97316)
            Self::Critical => (244, 63, 94),   // Rose (#F43F5E)
        }
    }

    /// Priority banner shown next to the top triage result.
    #[must_use]
    pub fn priority_label(&self) -> String {
        format!("{} PRIORITY", self.to_string().to_uppercase())
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// One row of the condition catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionEntry {
    pub name: &'static str,
    pub symptoms: &'static [&'static str],
    pub severity: Severity,
    pub advice: &'static str,
}

impl ConditionEntry {
    /// Whether this condition lists the given symptom (exact, case-sensitive).
    #[must_use]
    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptoms.contains(&symptom)
    }

    /// Prediction tool the user is pointed to when this condition ranks first.
    #[must_use]
    pub fn related_model(&self) -> Option<DiseaseModel> {
        match self.name {
            "Diabetes (Type 2)" => Some(DiseaseModel::Diabetes),
            "Heart Attack (Myocardial Infarction)" => Some(DiseaseModel::HeartDisease),
            "Parkinson's Disease" => Some(DiseaseModel::Parkinsons),
            _ => None,
        }
    }
}

/// Red-flag symptoms that should bypass the checker entirely.
pub const EMERGENCY_SIGNS: [&str; 6] = [
    "Crushing Chest Pain",
    "Severe Difficulty Breathing",
    "Uncontrollable Bleeding",
    "Sudden Slurred Speech (Stroke signs)",
    "Severe Head Injury",
    "Loss of Consciousness",
];

/// The condition catalog, in ranking tie-break order.
pub static CONDITIONS: [ConditionEntry; 11] = [
    ConditionEntry {
        name: "Heart Attack (Myocardial Infarction)",
        symptoms: &[
            "Chest Pain",
            "Shortness of Breath",
            "Pain in Left Arm",
            "Sweating",
            "Nausea",
            "Lightheadedness",
        ],
        severity: Severity::Critical,
        advice: "CALL EMERGENCY SERVICES IMMEDIATELY. Do not drive yourself to the hospital.",
    },
    ConditionEntry {
        name: "Stroke",
        symptoms: &[
            "Sudden Numbness",
            "Slurred Speech",
            "Confusion",
            "Vision Trouble",
            "Severe Headache",
            "Balance Loss",
        ],
        severity: Severity::Critical,
        advice: "CALL EMERGENCY SERVICES. Time is brain. Note the time symptoms started.",
    },
    ConditionEntry {
        name: "Appendicitis",
        symptoms: &[
            "Sharp Pain Lower Right Abdomen",
            "Nausea",
            "Vomiting",
            "Fever",
            "Loss of Appetite",
        ],
        severity: Severity::High,
        advice: "Seek Immediate Medical Care. Appendicitis requires urgent evaluation.",
    },
    ConditionEntry {
        name: "Kidney Stones",
        symptoms: &[
            "Severe Side/Back Pain",
            "Blood in Urine",
            "Nausea",
            "Vomiting",
            "Fever",
            "Painful Urination",
        ],
        severity: Severity::High,
        advice: "Consult a Doctor. Severe pain may require ER visit for pain management.",
    },
    ConditionEntry {
        name: "Diabetes (Type 2)",
        symptoms: &[
            "Increased Thirst",
            "Frequent Urination",
            "Unexplained Weight Loss",
            "Extreme Hunger",
            "Blurred Vision",
            "Fatigue",
        ],
        severity: Severity::Medium,
        advice: "See a Doctor. Use the Diabetes Check tool for a risk calculation.",
    },
    ConditionEntry {
        name: "COVID-19",
        symptoms: &[
            "Fever",
            "Dry Cough",
            "Loss of Taste/Smell",
            "Shortness of Breath",
            "Fatigue",
            "Sore Throat",
        ],
        severity: Severity::Medium,
        advice: "Self-Isolate & Test. Monitor breathing. Seek care if breathing becomes difficult.",
    },
    ConditionEntry {
        name: "Migraine",
        symptoms: &[
            "Severe Pulsing Headache",
            "Sensitivity to Light",
            "Sensitivity to Sound",
            "Nausea",
            "Visual Aura",
        ],
        severity: Severity::Medium,
        advice: "Rest in a dark room. Take over-the-counter pain relief. Consult a neurologist if frequent.",
    },
    ConditionEntry {
        name: "Gastroenteritis (Stomach Flu)",
        symptoms: &[
            "Watery Diarrhea",
            "Abdominal Cramps",
            "Nausea",
            "Vomiting",
            "Low Fever",
        ],
        severity: Severity::Low,
        advice: "Stay Hydrated. Drink electrolytes. See a doctor if dehydration signs appear.",
    },
    ConditionEntry {
        name: "Common Cold",
        symptoms: &[
            "Sneezing",
            "Runny Nose",
            "Sore Throat",
            "Mild Cough",
            "Low Fever",
            "Watery Eyes",
        ],
        severity: Severity::Low,
        advice: "Rest & Fluids. Symptoms usually resolve in 7-10 days.",
    },
    ConditionEntry {
        name: "Anxiety/Panic Attack",
        symptoms: &[
            "Rapid Heart Rate",
            "Fear of Doom",
            "Sweating",
            "Trembling",
            "Shortness of Breath",
            "Chest Tightness",
        ],
        severity: Severity::Medium,
        advice: "Deep Breathing. If new symptoms, rule out heart issues first. Consult a mental health professional.",
    },
    ConditionEntry {
        name: "Parkinson's Disease",
        symptoms: &[
            "Tremors (Shaking)",
            "Slowed Movement",
            "Rigid Muscles",
            "Changes in Speech",
            "Impaired Balance",
        ],
        severity: Severity::Medium,
        advice: "Neurologist Consultation. Use the Parkinsons Check tool.",
    },
];

/// Every symptom in the built-in catalog, sorted and de-duplicated.
#[must_use]
pub fn all_symptoms() -> Vec<&'static str> {
    symptoms_of(&CONDITIONS)
}

/// Every symptom in `catalog`, sorted and de-duplicated.
#[must_use]
pub fn symptoms_of(catalog: &[ConditionEntry]) -> Vec<&'static str> {
    catalog
        .iter()
        .flat_map(|c| c.symptoms.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Look up a condition by its exact name.
#[must_use]
pub fn find_condition(name: &str) -> Option<&'static ConditionEntry> {
    CONDITIONS.iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_symptoms_sorted_and_unique() {
        let symptoms = all_symptoms();
        let mut sorted = symptoms.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(symptoms, sorted);
        // Nausea appears in five conditions but only once in the option list
        assert_eq!(symptoms.iter().filter(|s| **s == "Nausea").count(), 1);
    }

    #[test]
    fn test_symptoms_of_sub_catalog() {
        let first = &CONDITIONS[..1];
        let mut expected: Vec<&str> = first[0].symptoms.to_vec();
        expected.sort_unstable();
        assert_eq!(symptoms_of(first), expected);
        assert_eq!(symptoms_of(&CONDITIONS), all_symptoms());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(Severity::Critical.priority_label(), "CRITICAL PRIORITY");
    }

    #[test]
    fn test_related_model() {
        let diabetes = find_condition("Diabetes (Type 2)").expect("Should exist");
        assert_eq!(diabetes.related_model(), Some(DiseaseModel::Diabetes));

        let cold = find_condition("Common Cold").expect("Should exist");
        assert_eq!(cold.related_model(), None);
    }

    #[test]
    fn test_fever_vs_low_fever() {
        let cold = find_condition("Common Cold").expect("Should exist");
        assert!(!cold.has_symptom("Fever"));
        assert!(cold.has_symptom("Low Fever"));

        let covid = find_condition("COVID-19").expect("Should exist");
        assert!(covid.has_symptom("Fever"));
    }
}
