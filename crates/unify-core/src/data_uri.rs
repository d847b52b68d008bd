//! Self-describing `data:` URI payloads.
//!
//! Stored documents carry their bytes as `data:<mime>;base64,<payload>`, the
//! same shape a browser `FileReader::readAsDataURL` produces, so a persisted
//! collection stays readable by both the browser build and this crate.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::defaults::FALLBACK_MIME_TYPE;
use crate::error::{Error, Result};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Encode bytes as a base64 data URI.
///
/// An empty media type is recorded as `application/octet-stream`.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    let mime_type = if mime_type.trim().is_empty() {
        FALLBACK_MIME_TYPE
    } else {
        mime_type.trim()
    };
    format!(
        "{}{}{}{}",
        SCHEME,
        mime_type,
        BASE64_MARKER,
        STANDARD.encode(bytes)
    )
}

/// Decode a base64 data URI.
pub fn decode(uri: &str) -> Result<DataUri> {
    let rest = uri
        .strip_prefix(SCHEME)
        .ok_or_else(|| Error::Decode("missing 'data:' scheme".to_string()))?;
    let (mime_type, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or_else(|| Error::Decode("missing ';base64,' marker".to_string()))?;

    let bytes = STANDARD.decode(payload)?;
    let mime_type = if mime_type.is_empty() {
        FALLBACK_MIME_TYPE.to_string()
    } else {
        mime_type.to_string()
    };

    Ok(DataUri { mime_type, bytes })
}
