//! Data model for the document vault.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data_uri;
use crate::error::Result;
use crate::file_safety;

// =============================================================================
// DOCUMENT CATEGORY
// =============================================================================

/// Fixed set of categories a stored document can be filed under.
///
/// Serialized as the English variant name. The Portuguese labels written by
/// the browser build are accepted on read so an existing slot can be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentCategory {
    #[default]
    #[serde(alias = "Identificação")]
    Identification,
    #[serde(alias = "Habitação")]
    Housing,
    #[serde(alias = "Saúde")]
    Health,
    #[serde(alias = "Trabalho")]
    Work,
    #[serde(alias = "Finanças")]
    Finance,
    #[serde(alias = "Educação")]
    Education,
    #[serde(alias = "Outros")]
    Other,
}

impl DocumentCategory {
    /// Every category, in form order.
    pub const ALL: [DocumentCategory; 7] = [
        Self::Identification,
        Self::Housing,
        Self::Health,
        Self::Work,
        Self::Finance,
        Self::Education,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identification => "Identification",
            Self::Housing => "Housing",
            Self::Health => "Health",
            Self::Work => "Work",
            Self::Finance => "Finance",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }

    /// Portuguese display label.
    pub fn label_pt(&self) -> &'static str {
        match self {
            Self::Identification => "Identificação",
            Self::Housing => "Habitação",
            Self::Health => "Saúde",
            Self::Work => "Trabalho",
            Self::Finance => "Finanças",
            Self::Education => "Educação",
            Self::Other => "Outros",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentCategory {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == needle || c.label_pt().to_lowercase() == needle)
            .ok_or_else(|| format!("Invalid document category: {}", s))
    }
}

// =============================================================================
// STORED DOCUMENT
// =============================================================================

/// One persisted record in the vault.
///
/// Field names on the wire match the browser build (`mimeType`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: Uuid,
    pub name: String,
    pub category: DocumentCategory,
    /// Creation date, already formatted for display.
    pub date: String,
    pub mime_type: String,
    /// `data:<mimeType>;base64,<payload>`
    pub data: String,
}

impl StoredDocument {
    /// Whether the document renders as an image preview rather than an icon.
    pub fn is_image(&self) -> bool {
        file_safety::is_image(&self.mime_type)
    }

    /// `<name>.<extension>` with the extension derived from the media type.
    pub fn export_filename(&self) -> String {
        file_safety::sanitize_filename(&format!(
            "{}.{}",
            self.name,
            file_safety::extension_for_mime(&self.mime_type)
        ))
    }

    /// Decode the stored payload back into the original bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(data_uri::decode(&self.data)?.bytes)
    }
}

// =============================================================================
// FILE BLOBS
// =============================================================================

/// Raw file content handed to the vault by a file source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// Original file name, if the source has one.
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileBlob {
    pub fn new(file_name: Option<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A downloadable artifact reconstructed from a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Default display name for a picked file: everything before the first `.`.
///
/// Returns `None` when that leaves nothing (e.g. `.bashrc`).
pub fn suggested_name(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = base.split('.').next().unwrap_or(base).trim();
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
