//! Vault configuration.

use unify_core::defaults;

/// Vault configuration options.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Slot holding the serialized collection.
    pub slot_key: String,
    /// `chrono` format string for the display date captured at add time.
    pub date_format: String,
    /// Largest file accepted by `add`, in bytes.
    pub max_document_bytes: usize,
    /// Accepted media types, HTML `accept` syntax (`image/*`, `application/pdf`).
    pub accept: Vec<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            slot_key: defaults::SLOT_KEY.to_string(),
            date_format: defaults::DATE_FORMAT.to_string(),
            max_document_bytes: defaults::MAX_DOCUMENT_BYTES,
            accept: defaults::ACCEPTED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl VaultConfig {
    /// Create a new vault configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slot key.
    pub fn slot_key(mut self, key: impl Into<String>) -> Self {
        self.slot_key = key.into();
        self
    }

    /// Set the display date format.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the maximum accepted document size.
    pub fn max_document_bytes(mut self, n: usize) -> Self {
        self.max_document_bytes = n;
        self
    }

    /// Replace the accepted media type patterns.
    pub fn accept<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept = patterns.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VaultConfig::default();
        assert_eq!(config.slot_key, "unify_documents");
        assert_eq!(config.date_format, "%d/%m/%Y");
        assert_eq!(config.accept, vec!["image/*", "application/pdf"]);
    }

    #[test]
    fn test_builder() {
        let config = VaultConfig::new()
            .slot_key("other")
            .max_document_bytes(16)
            .accept(["*/*"]);
        assert_eq!(config.slot_key, "other");
        assert_eq!(config.max_document_bytes, 16);
        assert_eq!(config.accept, vec!["*/*"]);
    }
}
