//! Environment-driven configuration for the `unify` binary.
//!
//! Environment variables (a `.env` file is loaded first if present):
//!   UNIFY_DATA_DIR            - directory holding the slot files (default: ./unify-data)
//!   UNIFY_SLOT_KEY            - slot name (default: unify_documents)
//!   UNIFY_MAX_DOCUMENT_BYTES  - largest accepted file in bytes (default: 5 MiB)
//!   LOG_FORMAT                - "json" or "text" (default: "text")
//!   LOG_FILE                  - path to log file (optional, enables file logging)
//!   RUST_LOG                  - standard env filter

use std::path::PathBuf;

use unify_core::{defaults, Error, Result};
use unify_vault::VaultConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub slot_key: String,
    pub max_document_bytes: usize,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
}

impl CliConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = lookup("UNIFY_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::DATA_DIR.to_string());

        let slot_key = lookup("UNIFY_SLOT_KEY")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::SLOT_KEY.to_string());

        let max_document_bytes = match lookup("UNIFY_MAX_DOCUMENT_BYTES") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                Error::Config(format!("UNIFY_MAX_DOCUMENT_BYTES '{}': {}", raw, e))
            })?,
            None => defaults::MAX_DOCUMENT_BYTES,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(Error::Config(format!(
                    "LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                )))
            }
        };

        let log_file = lookup("LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            slot_key,
            max_document_bytes,
            log_format,
            log_file,
        })
    }

    pub fn vault_config(&self) -> VaultConfig {
        VaultConfig::new()
            .slot_key(self.slot_key.clone())
            .max_document_bytes(self.max_document_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./unify-data"));
        assert_eq!(config.slot_key, "unify_documents");
        assert_eq!(config.max_document_bytes, defaults::MAX_DOCUMENT_BYTES);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::from_lookup(lookup(&[
            ("UNIFY_DATA_DIR", "/tmp/vault"),
            ("UNIFY_SLOT_KEY", "family"),
            ("UNIFY_MAX_DOCUMENT_BYTES", "1024"),
            ("LOG_FORMAT", "json"),
            ("LOG_FILE", "/tmp/unify.log"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/vault"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/unify.log")));

        let vault = config.vault_config();
        assert_eq!(vault.slot_key, "family");
        assert_eq!(vault.max_document_bytes, 1024);
    }

    #[test]
    fn test_malformed_max_bytes_is_config_error() {
        let err = CliConfig::from_lookup(lookup(&[("UNIFY_MAX_DOCUMENT_BYTES", "lots")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_log_format_is_config_error() {
        let err = CliConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
