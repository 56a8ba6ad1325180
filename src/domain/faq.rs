//! Canned answers for the health assistant panel.
//!
//! Plain substring dispatch: the first keyword group that occurs anywhere in the
//! lower-cased query wins. Short keywords like "bp" or "hi" match inside other
//! words; group order keeps the specific answers ahead of the greeting.

/// Greeting shown at the top of a fresh transcript.
pub const GREETING: &str =
    "Hello! Pick a quick question or type one to learn about the health metrics.";

/// Shown above the chat panel.
pub const DISCLAIMER: &str =
    "I am an assistant providing definitions. I cannot provide a medical diagnosis.";

/// Answer when no keyword matches.
pub const FALLBACK: &str =
    "I can explain parameters like BMI, Glucose, Chest Pain, or Jitter. Try asking about those!";

const GLUCOSE: &str = "Glucose: Fasting blood sugar levels. Normal is <100 mg/dL. 100-125 is pre-diabetes, and >126 suggests diabetes.";
const BMI: &str = "BMI (Body Mass Index): A measure of body fat based on height and weight. Normal range is 18.5 - 24.9.";
const BLOOD_PRESSURE: &str = "Blood Pressure: 'Resting Blood Pressure' (trestbps). High BP (>130/80 mmHg) strains the heart.";
const CHEST_PAIN: &str = "Chest Pain (CP): Classified into 4 types. Type 0 (Typical Angina) is often the most serious indicator.";
const PARKINSONS: &str = "Parkinson's: A neurodegenerative disorder. We use vocal frequency variations (Jitter, Shimmer) to detect it.";
const JITTER: &str = "Jitter: Measures the variation in the pitch of the voice. High jitter is a sign of vocal impairment.";
const HELLO: &str =
    "Hello! I am your MediPredict Assistant. Ask me about any medical term on this page!";

/// Keyword groups in priority order.
const RULES: [(&[&str], &str); 7] = [
    (&["glucose", "sugar", "fbs"], GLUCOSE),
    (&["bmi"], BMI),
    (&["blood pressure", "bp", "trestbps"], BLOOD_PRESSURE),
    (&["chest pain", "cp"], CHEST_PAIN),
    (&["parkinson"], PARKINSONS),
    (&["jitter"], JITTER),
    (&["hello", "hi"], HELLO),
];

/// One-click questions offered above the input line.
pub const QUICK_QUESTIONS: [(&str, &str); 4] = [
    ("BMI?", "What is BMI?"),
    ("Glucose?", "Explain Glucose"),
    ("Chest Pain?", "What are Chest Pain types?"),
    ("Jitter?", "What is Jitter?"),
];

/// Answer a free-text question.
#[must_use]
pub fn respond(query: &str) -> &'static str {
    let query = query.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| query.contains(k)))
        .map_or(FALLBACK, |(_, answer)| *answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        assert_eq!(respond("what is my BMI?"), BMI);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(respond("xyz"), FALLBACK);
        assert_eq!(respond(""), FALLBACK);
    }

    #[test]
    fn test_first_match_wins() {
        // "sugar" and "bmi" both present: glucose group is checked first
        assert_eq!(respond("BMI and sugar"), GLUCOSE);
        // "this" contains "hi", but the chest pain group comes first
        assert_eq!(respond("this chest pain"), CHEST_PAIN);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(respond("JITTER"), JITTER);
        assert_eq!(respond("Parkinson's symptoms"), PARKINSONS);
    }

    #[test]
    fn test_greeting_substring() {
        assert_eq!(respond("Hi there"), HELLO);
        // "which" contains "hi"
        assert_eq!(respond("which one"), HELLO);
    }

    #[test]
    fn test_quick_questions_are_answered() {
        for (_, query) in QUICK_QUESTIONS {
            assert_ne!(respond(query), FALLBACK, "no answer for {query}");
        }
    }
}
