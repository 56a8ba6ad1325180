//! Signs a MediPredict model directory.
//!
//! Hashes every model export present in the directory, writes `manifest.json`
//! and an Ed25519 signature over it to `model.sig`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin sign_models -- <model_dir> [--key-file <seed_b64_file>]
//! ```
//!
//! The seed file holds the base64 32-byte Ed25519 seed written by
//! `generate_keypair`. Without `--key-file`, the path is read from
//! `MEDIPREDICT_MODEL_SIGNING_KEY_B64_FILE`.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey};
use zeroize::{Zeroize, Zeroizing};

use medipredict::adapters::linear_model::{
    sha256_hex, LinearModel, ModelManifest, MANIFEST_FILE, MANIFEST_VERSION, SIGNATURE_FILE,
};
use medipredict::DiseaseModel;

const KEY_FILE_ENV: &str = "MEDIPREDICT_MODEL_SIGNING_KEY_B64_FILE";

const USAGE: &str = "Usage: sign_models <model_dir> [--key-file <seed_b64_file>]";

fn parse_args() -> Result<(PathBuf, PathBuf)> {
    let mut args = env::args().skip(1);
    let mut model_dir: Option<PathBuf> = None;
    let mut key_file: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--key-file" => {
                key_file = Some(PathBuf::from(args.next().context(USAGE)?));
            }
            "-h" | "--help" => bail!(USAGE),
            _ if model_dir.is_none() => model_dir = Some(PathBuf::from(arg)),
            _ => bail!("Unexpected argument {arg:?}\n{USAGE}"),
        }
    }

    let model_dir = model_dir.context(USAGE)?;
    let key_file = match key_file {
        Some(path) => path,
        None => env::var(KEY_FILE_ENV)
            .map(|v| PathBuf::from(v.trim()))
            .with_context(|| format!("No --key-file given and {KEY_FILE_ENV} is not set"))?,
    };
    Ok((model_dir, key_file))
}

fn read_signing_key(path: &Path) -> Result<SigningKey> {
    let content = Zeroizing::new(
        fs::read_to_string(path).with_context(|| format!("Failed reading {path:?}"))?,
    );
    let raw = Zeroizing::new(
        general_purpose::STANDARD
            .decode(content.trim())
            .context("Invalid base64 in signing key")?,
    );
    if raw.len() != 32 {
        bail!(
            "Signing key seed must be 32 bytes after base64 decode (got {})",
            raw.len()
        );
    }

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&raw);
    let key = SigningKey::from_bytes(&seed);
    seed.zeroize();
    Ok(key)
}

/// Digest every model export found, refusing files that do not parse.
fn hash_artifacts(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();
    for model in DiseaseModel::ALL {
        let name = model.artifact_name();
        let path = dir.join(name);
        if !path.exists() {
            eprintln!("Skipping {name}: not found");
            continue;
        }

        let bytes = fs::read(&path).with_context(|| format!("Failed reading {path:?}"))?;
        let parsed: LinearModel =
            serde_json::from_slice(&bytes).with_context(|| format!("{name} is not a model export"))?;
        parsed
            .validate()
            .with_context(|| format!("{name} failed validation"))?;
        if parsed.coefficients.len() != model.feature_count() {
            bail!(
                "{name} has {} coefficients, {} expects {}",
                parsed.coefficients.len(),
                model,
                model.feature_count()
            );
        }

        files.insert(name.to_string(), sha256_hex(&bytes));
    }

    if files.is_empty() {
        bail!("No model exports found in {dir:?}");
    }
    Ok(files)
}

fn main() -> Result<()> {
    let (model_dir, key_file) = parse_args()?;
    let signing_key = read_signing_key(&key_file)?;

    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .ok();

    let manifest = ModelManifest {
        version: MANIFEST_VERSION,
        created_at,
        files: hash_artifacts(&model_dir)?,
    };
    let manifest_bytes =
        serde_json::to_vec_pretty(&manifest).context("Failed to serialize manifest")?;

    let manifest_path = model_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, &manifest_bytes)
        .with_context(|| format!("Failed to write {manifest_path:?}"))?;

    let sig: Signature = signing_key.sign(&manifest_bytes);
    let sig_path = model_dir.join(SIGNATURE_FILE);
    fs::write(&sig_path, sig.to_bytes()).with_context(|| format!("Failed to write {sig_path:?}"))?;

    println!("Signed {} model files", manifest.files.len());
    println!("Manifest: {manifest_path:?}");
    println!("Signature: {sig_path:?}");
    println!(
        "Public key (base64)={}",
        general_purpose::STANDARD.encode(signing_key.verifying_key().as_bytes())
    );

    Ok(())
}
