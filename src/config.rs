//! Runtime configuration from environment variables.
//!
//! Every setting has a default, so a bare `medipredict` run works from a
//! directory holding `user_db.json` and a `models/` folder.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const USER_DB_ENV: &str = "MEDIPREDICT_USER_DB";
pub const MODEL_DIR_ENV: &str = "MEDIPREDICT_MODEL_DIR";
pub const REQUIRE_SIGNED_MODELS_ENV: &str = "MEDIPREDICT_REQUIRE_SIGNED_MODELS";
pub const PUBKEY_FILE_ENV: &str = "MEDIPREDICT_MODEL_SIGNING_PUBKEY_B64_FILE";
pub const PACING_MS_ENV: &str = "MEDIPREDICT_PACING_MS";
pub const LOG_MODE_ENV: &str = "MEDIPREDICT_LOG_MODE";
pub const LOG_FILE_ENV: &str = "MEDIPREDICT_LOG_FILE";

const DEFAULT_USER_DB: &str = "user_db.json";
const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_LOG_FILE: &str = "medipredict.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Credential store backend, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Json,
    Sqlite,
}

impl StoreBackend {
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("db") || ext.eq_ignore_ascii_case("sqlite") => {
                Self::Sqlite
            }
            _ => Self::Json,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub user_db: PathBuf,
    pub model_dir: PathBuf,
    pub require_signed_models: bool,
    pub signing_pubkey_file: Option<PathBuf>,
    /// Artificial delay before each prediction
    pub pacing: Duration,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_db: PathBuf::from(DEFAULT_USER_DB),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            require_signed_models: false,
            signing_pubkey_file: None,
            pacing: Duration::ZERO,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let pacing = match non_empty(PACING_MS_ENV).map(|v| v.trim().parse::<u64>()) {
            Some(Ok(ms)) => Duration::from_millis(ms),
            Some(Err(_)) => {
                tracing::warn!("Ignoring invalid {PACING_MS_ENV}");
                defaults.pacing
            }
            None => defaults.pacing,
        };

        Self {
            user_db: non_empty(USER_DB_ENV).map_or(defaults.user_db, PathBuf::from),
            model_dir: non_empty(MODEL_DIR_ENV).map_or(defaults.model_dir, PathBuf::from),
            require_signed_models: non_empty(REQUIRE_SIGNED_MODELS_ENV)
                .is_some_and(|v| parse_bool(&v)),
            signing_pubkey_file: non_empty(PUBKEY_FILE_ENV).map(|v| PathBuf::from(v.trim())),
            pacing,
            log_mode: non_empty(LOG_MODE_ENV).map_or(defaults.log_mode, |v| LogMode::parse(&v)),
            log_file: non_empty(LOG_FILE_ENV).map_or(defaults.log_file, PathBuf::from),
        }
    }

    #[must_use]
    pub fn store_backend(&self) -> StoreBackend {
        StoreBackend::for_path(&self.user_db)
    }
}

/// `1`, `true` or `yes`, in any case.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.user_db, PathBuf::from("user_db.json"));
        assert_eq!(config.store_backend(), StoreBackend::Json);
        assert_eq!(config.pacing, Duration::ZERO);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (USER_DB_ENV, "/data/users.sqlite"),
            (MODEL_DIR_ENV, "/opt/models"),
            (REQUIRE_SIGNED_MODELS_ENV, "YES"),
            (PUBKEY_FILE_ENV, "/run/secrets/pubkey.b64\n"),
            (PACING_MS_ENV, "250"),
            (LOG_MODE_ENV, "Stdout"),
        ]);
        assert_eq!(config.store_backend(), StoreBackend::Sqlite);
        assert_eq!(config.model_dir, PathBuf::from("/opt/models"));
        assert!(config.require_signed_models);
        assert_eq!(
            config.signing_pubkey_file,
            Some(PathBuf::from("/run/secrets/pubkey.b64"))
        );
        assert_eq!(config.pacing, Duration::from_millis(250));
        assert_eq!(config.log_mode, LogMode::Stdout);
    }

    #[test]
    fn test_bool_parsing() {
        for v in ["1", "true", "TRUE", "Yes"] {
            assert!(parse_bool(v), "{v}");
        }
        for v in ["0", "false", "no", "on"] {
            assert!(!parse_bool(v), "{v}");
        }
    }

    #[test]
    fn test_invalid_pacing_falls_back() {
        let config = config_from(&[(PACING_MS_ENV, "fast")]);
        assert_eq!(config.pacing, Duration::ZERO);
    }

    #[test]
    fn test_store_backend_by_extension() {
        assert_eq!(StoreBackend::for_path(Path::new("users.db")), StoreBackend::Sqlite);
        assert_eq!(StoreBackend::for_path(Path::new("users.SQLITE")), StoreBackend::Sqlite);
        assert_eq!(StoreBackend::for_path(Path::new("user_db.json")), StoreBackend::Json);
        assert_eq!(StoreBackend::for_path(Path::new("users")), StoreBackend::Json);
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
