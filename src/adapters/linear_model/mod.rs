//! Linear model adapter: Implementation of Classifier for exported models.
//!
//! Each disease model is a JSON export of a fitted linear classifier
//! (logistic regression or linear SVM) together with its standard scaler.
//!
//! # Security
//!
//! - When `manifest.json` and `model.sig` are present, the manifest must carry a
//!   valid Ed25519 signature and every loaded artifact must match its SHA-256
//!   digest in the manifest
//! - With `require_signed`, a directory without a manifest is refused
//! - The verifying key is read from a base64 file
//!   (`MEDIPREDICT_MODEL_SIGNING_PUBKEY_B64_FILE`) or supplied directly
//!
//! # Key Rotation
//!
//! 1. Generate new keypair: `cargo run --bin generate_keypair -- --out-seed <seed> --out-pub <pub>`
//! 2. Re-sign the model directory: `cargo run --bin sign_models -- <dir> --key-file <seed>`
//! 3. Point `MEDIPREDICT_MODEL_SIGNING_PUBKEY_B64_FILE` at the new public key

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::DiseaseModel;
use crate::ports::{Classifier, ModelError};

/// Signed list of artifact digests.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Raw 64-byte Ed25519 signature over the manifest bytes.
pub const SIGNATURE_FILE: &str = "model.sig";

pub const MANIFEST_VERSION: u32 = 1;

/// Allowed clock skew for manifest timestamps, in seconds.
const MAX_FUTURE_SKEW_SECS: i64 = 300;

/// Family of the exported classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Logistic,
    LinearSvm,
}

/// A fitted linear classifier as exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub kind: ModelKind,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler_scale: Option<Vec<f64>>,
    /// Decision threshold; label 1 iff the decision value reaches it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl LinearModel {
    /// Check that all parameter vectors agree in length and are finite.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` describing the first problem found.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ModelError::InvalidArtifact("model has no features".into()));
        }
        if self.coefficients.len() != n {
            return Err(ModelError::InvalidArtifact(format!(
                "coefficients length {} does not match {n} features",
                self.coefficients.len()
            )));
        }
        for (name, v) in [("scaler_mean", &self.scaler_mean), ("scaler_scale", &self.scaler_scale)] {
            if let Some(v) = v {
                if v.len() != n {
                    return Err(ModelError::InvalidArtifact(format!(
                        "{name} length {} does not match {n} features",
                        v.len()
                    )));
                }
            }
        }
        if let Some(scale) = &self.scaler_scale {
            if scale.iter().any(|s| *s == 0.0) {
                return Err(ModelError::InvalidArtifact("scaler_scale contains zero".into()));
            }
        }

        let all_finite = self
            .coefficients
            .iter()
            .chain(self.scaler_mean.iter().flatten())
            .chain(self.scaler_scale.iter().flatten())
            .chain(std::iter::once(&self.intercept))
            .chain(self.threshold.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ModelError::InvalidArtifact("non-finite parameter".into()));
        }
        Ok(())
    }

    /// Raw decision value `w · ((x - mean) / scale) + b`.
    ///
    /// # Errors
    /// Returns `ModelError::FeatureCountMismatch` for a wrong-length input.
    pub fn decision(&self, features: &[f64]) -> Result<f64, ModelError> {
        let n = self.coefficients.len();
        if features.len() != n {
            return Err(ModelError::FeatureCountMismatch {
                expected: n,
                got: features.len(),
            });
        }

        let mut acc = self.intercept;
        for (i, (&x, &w)) in features.iter().zip(&self.coefficients).enumerate() {
            let mean = self.scaler_mean.as_ref().map_or(0.0, |m| m[i]);
            let scale = self.scaler_scale.as_ref().map_or(1.0, |s| s[i]);
            acc += w * ((x - mean) / scale);
        }

        if acc.is_finite() {
            Ok(acc)
        } else {
            Err(ModelError::Inference("decision value is not finite".into()))
        }
    }

    /// Positive-class probability, only meaningful for logistic models.
    ///
    /// # Errors
    /// Propagates errors from [`LinearModel::decision`].
    pub fn probability(&self, features: &[f64]) -> Result<Option<f64>, ModelError> {
        match self.kind {
            ModelKind::Logistic => Ok(Some(sigmoid(self.decision(features)?))),
            ModelKind::LinearSvm => Ok(None),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for LinearModel {
    fn feature_count(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ModelError> {
        let decision = self.decision(features)?;
        let threshold = self.threshold.unwrap_or(0.0);
        tracing::debug!(decision, threshold, "Linear model evaluated");
        Ok(u8::from(decision >= threshold))
    }
}

/// Signed content binding model files to their digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// File name → lowercase hex SHA-256
    pub files: BTreeMap<String, String>,
}

/// Lowercase hex SHA-256 of a byte slice.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse a base64 Ed25519 verifying key.
///
/// # Errors
/// Returns `ModelError::Integrity` if the text is not a valid 32-byte key.
pub fn verifying_key_from_b64(b64: &str) -> Result<VerifyingKey, ModelError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|_| ModelError::Integrity("Invalid public key base64".into()))?;
    let pubkey: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| ModelError::Integrity("Invalid public key length (expected 32 bytes)".into()))?;
    VerifyingKey::from_bytes(&pubkey)
        .map_err(|_| ModelError::Integrity("Invalid verifying key".into()))
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Loads the three disease models from a directory.
pub struct ModelLoader {
    dir: PathBuf,
    require_signed: bool,
    verifying_key: Option<VerifyingKey>,
    pubkey_file: Option<PathBuf>,
}

impl ModelLoader {
    #[must_use]
    pub fn new<P: AsRef<Path>>(dir: P, require_signed: bool) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            require_signed,
            verifying_key: None,
            pubkey_file: None,
        }
    }

    /// Verify manifests with this key.
    #[must_use]
    pub fn with_verifying_key(mut self, key: VerifyingKey) -> Self {
        self.verifying_key = Some(key);
        self
    }

    /// Read the verifying key from a base64 file when a manifest is found.
    #[must_use]
    pub fn with_pubkey_file(mut self, path: Option<PathBuf>) -> Self {
        self.pubkey_file = path;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn resolve_verifying_key(&self) -> Result<VerifyingKey, ModelError> {
        if let Some(key) = self.verifying_key {
            return Ok(key);
        }

        let path = self.pubkey_file.as_ref().ok_or_else(|| {
            ModelError::Integrity(
                "Model directory is signed but no verifying key is configured".into(),
            )
        })?;
        let b64 = fs::read_to_string(path)
            .map_err(|e| ModelError::Integrity(format!("Failed reading pubkey file: {e}")))?;
        verifying_key_from_b64(&b64)
    }

    /// Verify the signed manifest, if the directory has one.
    ///
    /// # Returns
    /// `None` for an unsigned directory (allowed unless `require_signed`).
    ///
    /// # Errors
    /// Returns `ModelError::Integrity` for a bad signature, a malformed manifest,
    /// or a missing manifest when signing is required.
    pub fn verify_manifest(&self) -> Result<Option<ModelManifest>, ModelError> {
        let sig_path = self.dir.join(SIGNATURE_FILE);
        let manifest_path = self.dir.join(MANIFEST_FILE);

        if !sig_path.exists() || !manifest_path.exists() {
            if self.require_signed {
                tracing::error!(
                    "Model signature not found at {:?}; signed models are required",
                    sig_path
                );
                return Err(ModelError::Integrity("Signed model manifest required".into()));
            }
            tracing::warn!("Loading UNSIGNED models from {:?}", self.dir);
            return Ok(None);
        }

        let sig_bytes = fs::read(&sig_path)
            .map_err(|e| ModelError::Integrity(format!("Failed to read signature: {e}")))?;
        let sig_array: [u8; 64] = sig_bytes.as_slice().try_into().map_err(|_| {
            ModelError::Integrity("Invalid signature length (expected 64 bytes)".into())
        })?;
        let signature = Signature::from_bytes(&sig_array);

        let manifest_content = fs::read(&manifest_path)
            .map_err(|e| ModelError::Integrity(format!("Failed to read manifest: {e}")))?;

        self.resolve_verifying_key()?
            .verify(&manifest_content, &signature)
            .map_err(|_| ModelError::Integrity("Invalid model signature".into()))?;

        let manifest: ModelManifest = serde_json::from_slice(&manifest_content)
            .map_err(|e| ModelError::Integrity(format!("Invalid manifest.json format: {e}")))?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ModelError::Integrity(format!(
                "Unsupported manifest version: {}",
                manifest.version
            )));
        }
        if manifest.files.is_empty() {
            return Err(ModelError::Integrity("manifest.json contains no files".into()));
        }
        if let Some(rel) = manifest
            .files
            .keys()
            .find(|rel| rel.contains(['/', '\\']) || rel.as_str() == "..")
        {
            return Err(ModelError::Integrity(format!(
                "manifest.json entry {rel:?} escapes the model directory"
            )));
        }
        if let Some(created_at) = manifest.created_at {
            if created_at > unix_now() + MAX_FUTURE_SKEW_SECS {
                return Err(ModelError::Integrity("manifest created_at is in the future".into()));
            }
        }

        tracing::info!("Model manifest signature verified ({} files)", manifest.files.len());
        Ok(Some(manifest))
    }

    /// Load one model, verifying the manifest first.
    ///
    /// # Errors
    /// Returns `ModelError::Unavailable` if the artifact is missing, or the
    /// integrity/format error that prevented loading.
    pub fn load(&self, model: DiseaseModel) -> Result<LinearModel, ModelError> {
        let manifest = self.verify_manifest()?;
        self.load_with(model, manifest.as_ref())
    }

    /// Load every model, reporting each outcome separately.
    ///
    /// A manifest failure is reported against all three models.
    #[must_use]
    pub fn load_all(&self) -> Vec<(DiseaseModel, Result<LinearModel, ModelError>)> {
        let manifest = self.verify_manifest();
        DiseaseModel::ALL
            .into_iter()
            .map(|model| {
                let result = match &manifest {
                    Ok(m) => self.load_with(model, m.as_ref()),
                    Err(e) => Err(e.clone()),
                };
                (model, result)
            })
            .collect()
    }

    fn load_with(
        &self,
        model: DiseaseModel,
        manifest: Option<&ModelManifest>,
    ) -> Result<LinearModel, ModelError> {
        let name = model.artifact_name();
        let path = self.dir.join(name);

        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ModelError::Unavailable(model, format!("{} not found", path.display())));
            }
            Err(e) => return Err(ModelError::Unavailable(model, e.to_string())),
        };

        if let Some(manifest) = manifest {
            let expected = manifest.files.get(name).ok_or_else(|| {
                ModelError::Integrity(format!("{name} is not bound by the signed manifest"))
            })?;
            if !constant_time_eq_str(&sha256_hex(&bytes), &expected.to_ascii_lowercase()) {
                return Err(ModelError::Integrity(format!("File hash mismatch for {name}")));
            }
        }

        let parsed: LinearModel = serde_json::from_slice(&bytes)
            .map_err(|e| ModelError::InvalidArtifact(format!("{name}: {e}")))?;
        parsed.validate()?;

        if parsed.feature_count() != model.feature_count() {
            return Err(ModelError::InvalidArtifact(format!(
                "{name} has {} features, expected {}",
                parsed.feature_count(),
                model.feature_count()
            )));
        }

        tracing::info!(
            "Loaded {} model from {:?} (kind={:?}, n_features={})",
            model,
            path,
            parsed.kind,
            parsed.feature_count()
        );
        Ok(parsed)
    }
}
