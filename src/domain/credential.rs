//! Stored user account.

use serde::{Deserialize, Serialize};

/// Credential record as persisted, keyed by username outside the record.
///
/// Field names match the on-disk JSON (`{"name": ..., "password": ...}`), so
/// files written by older versions load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(rename = "name")]
    pub display_name: String,

    /// Argon2id PHC string, or a legacy SHA-256 hex digest
    #[serde(rename = "password")]
    pub password_hash: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl CredentialRecord {
    #[must_use]
    pub fn new(display_name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            password_hash: password_hash.into(),
            created_at: Some(chrono::Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_json_shape() {
        let json = r#"{"name": "Ishita", "password": "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"}"#;
        let record: CredentialRecord = serde_json::from_str(json).expect("Should parse");
        assert_eq!(record.display_name, "Ishita");
        assert!(record.created_at.is_none());

        let out = serde_json::to_value(&record).expect("Should serialize");
        assert!(out.get("created_at").is_none());
        assert_eq!(out["name"], "Ishita");
    }
}
