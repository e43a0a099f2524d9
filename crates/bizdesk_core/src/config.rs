//! Application configuration loaded from TOML.
//!
//! # Invariants
//! - Missing keys take the documented defaults.
//! - `validate()` runs on every load path; an invalid config is never returned.

use crate::logging::normalize_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config syntax: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub default_currency: String,
    pub search_debounce_ms: u64,
    pub invoice_number_prefix: String,
    pub default_payment_terms_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            default_currency: "USD".to_string(),
            search_debounce_ms: 300,
            invoice_number_prefix: "INV".to_string(),
            default_payment_terms_days: 30,
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        let currency = self.default_currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Invalid(format!(
                "default_currency must be a 3-letter ISO code, got `{}`",
                self.default_currency
            )));
        }
        if self.invoice_number_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "invoice_number_prefix must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};

    #[test]
    fn missing_keys_take_defaults() {
        let config = AppConfig::from_toml_str("default_currency = \"EUR\"").unwrap();
        assert_eq!(config.default_currency, "EUR");
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.invoice_number_prefix, "INV");
        assert_eq!(config.default_payment_terms_days, 30);
    }

    #[test]
    fn rejects_bad_currency_and_level() {
        let err = AppConfig::from_toml_str("default_currency = \"euro\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::from_toml_str("log_level = \"loud\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bizdesk.toml");
        std::fs::write(&path, "invoice_number_prefix = \"ACME\"\nsearch_debounce_ms = 150\n")
            .unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.invoice_number_prefix, "ACME");
        assert_eq!(config.search_debounce().as_millis(), 150);
    }
}
