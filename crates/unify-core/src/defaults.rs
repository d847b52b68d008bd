//! Centralized default constants for the unify vault.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// STORAGE
// =============================================================================

/// Name of the slot holding the serialized document collection.
pub const SLOT_KEY: &str = "unify_documents";

/// Largest single document accepted by the vault (5 MiB).
///
/// Browser origin storage is typically capped around 5 MiB per origin, so a
/// larger file could never be persisted there anyway.
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// File name suffix used by the filesystem slot store.
pub const SLOT_FILE_EXTENSION: &str = "json";

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Display format for the creation date of a stored document.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Media types accepted by the add flow, in HTML `accept` attribute syntax.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/*", "application/pdf"];

/// Media type recorded when the source does not declare one.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Extension used on export when none can be derived from the media type.
pub const FALLBACK_EXTENSION: &str = "bin";

// =============================================================================
// CLI
// =============================================================================

/// Default data directory for the filesystem-backed vault.
pub const DATA_DIR: &str = "./unify-data";

/// Default tracing filter when `RUST_LOG` is not set.
pub const LOG_FILTER: &str = "unify=info,unify_vault=info,unify_core=info";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_document_bytes_is_five_mebibytes() {
        assert_eq!(MAX_DOCUMENT_BYTES, 5_242_880);
    }

    #[test]
    fn test_accepted_mime_types_cover_images_and_pdf() {
        assert!(ACCEPTED_MIME_TYPES.contains(&"image/*"));
        assert!(ACCEPTED_MIME_TYPES.contains(&"application/pdf"));
    }
}
