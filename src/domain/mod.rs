//! Domain layer: Core types and pure logic.
//!
//! No I/O happens here. The condition catalog, triage ranking, FAQ answers and
//! feature vectors are all plain data and functions.

pub mod condition;
mod credential;
pub mod faq;
mod features;
pub mod kdf;
mod prediction;
mod session;
pub mod triage;

pub use condition::{ConditionEntry, Severity, CONDITIONS};
pub use credential::CredentialRecord;
pub use features::{
    field_specs, ClinicalInput, DiabetesFeatures, FieldSpec, HeartFeatures, ParkinsonsFeatures,
    LEGACY_DFA_PLACEHOLDER, LEGACY_RPDE_PLACEHOLDER,
};
pub use prediction::{DiseaseModel, Prediction};
pub use session::{AuthenticatedUser, ChatMessage, Role, Session};
pub use triage::{TriageError, TriageReport, TriageResult};
