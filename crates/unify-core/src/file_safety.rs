//! Media type helpers for stored documents.
//!
//! Detection order for local files:
//! 1. Magic bytes (`infer`)
//! 2. Extension table for text formats that have no magic bytes
//! 3. `application/octet-stream`

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::defaults::{FALLBACK_EXTENSION, FALLBACK_MIME_TYPE};

/// Media types whose export extension is not simply their subtype.
static EXTENSION_OVERRIDES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("text/plain", "txt"),
        ("text/markdown", "md"),
        ("image/svg+xml", "svg"),
        ("image/x-icon", "ico"),
        ("image/vnd.microsoft.icon", "ico"),
        ("application/octet-stream", FALLBACK_EXTENSION),
        ("application/msword", "doc"),
        (
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "docx",
        ),
    ]
    .into_iter()
    .collect()
});

/// Detect the media type of a local file from its bytes, then its name.
pub fn detect_content_type(file_name: &str, data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    // Binary formats (jpg, png, pdf) are deliberately absent: if their magic
    // bytes did not match, the content is not what the extension claims.
    if let Some((_, ext)) = file_name.rsplit_once('.') {
        if let Some(mime) = mime_from_extension(ext) {
            return mime.to_string();
        }
    }

    FALLBACK_MIME_TYPE.to_string()
}

fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "txt" | "log" => Some("text/plain"),
        "csv" => Some("text/csv"),
        "md" | "markdown" => Some("text/markdown"),
        "html" | "htm" => Some("text/html"),
        "json" => Some("application/json"),
        "xml" => Some("application/xml"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Strip parameters (`; charset=...`) and normalize case.
fn essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or(mime).trim().to_lowercase()
}

/// File extension used when exporting a document of the given media type.
///
/// Uses the media subtype (`image/png` → `png`, `application/pdf` → `pdf`)
/// except for the types listed in the override table. Falls back to `bin`.
pub fn extension_for_mime(mime: &str) -> String {
    let essence = essence(mime);
    if let Some(ext) = EXTENSION_OVERRIDES.get(essence.as_str()) {
        return (*ext).to_string();
    }
    if is_valid_mime_type(&essence) {
        if let Some((_, subtype)) = essence.split_once('/') {
            return subtype.to_string();
        }
    }
    FALLBACK_EXTENSION.to_string()
}

/// Check a media type against HTML `accept`-style patterns.
///
/// Supports exact types (`application/pdf`), wildcard subtypes (`image/*`)
/// and `*/*`. Matching is case-insensitive and ignores parameters.
pub fn accepts<S: AsRef<str>>(patterns: &[S], mime: &str) -> bool {
    let essence = essence(mime);
    let Some((media_type, _)) = essence.split_once('/') else {
        return false;
    };
    patterns.iter().any(|pattern| {
        let pattern = pattern.as_ref().trim().to_lowercase();
        match pattern.split_once('/') {
            Some(("*", "*")) => true,
            Some((p_type, "*")) => p_type == media_type,
            Some(_) => pattern == essence,
            None => false,
        }
    })
}

/// Whether a document of this media type renders as an image preview.
pub fn is_image(mime: &str) -> bool {
    essence(mime).starts_with("image/")
}

/// Validate MIME type format per RFC 2045 (type/subtype).
///
/// Returns `true` if the format is valid: exactly one `/`, both parts non-empty,
/// no whitespace, and only printable ASCII characters.
pub fn is_valid_mime_type(mime: &str) -> bool {
    let parts: Vec<&str> = mime.split('/').collect();
    if parts.len() != 2 {
        return false;
    }
    let (media_type, subtype) = (parts[0], parts[1]);
    if media_type.is_empty() || subtype.is_empty() {
        return false;
    }
    let is_token_char = |c: char| -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '!' | '#' | '$' | '&' | '-' | '^' | '_' | '.' | '+')
    };
    media_type.chars().all(is_token_char) && subtype.chars().all(is_token_char)
}

/// Sanitize an export filename for the local filesystem.
///
/// The input is a display label, not a path: separators are replaced like any
/// other reserved character, so the result is always a single path component.
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return "unnamed_document".to_string();
    }

    // Truncate on a char boundary, keeping the extension
    if sanitized.len() > 255 {
        let (stem, ext) = match sanitized.rfind('.') {
            Some(dot) => (&sanitized[..dot], &sanitized[dot..]),
            None => (sanitized, ""),
        };
        let mut cut = 255usize.saturating_sub(ext.len()).min(stem.len());
        while !stem.is_char_boundary(cut) {
            cut -= 1;
        }
        return format!("{}{}", &stem[..cut], ext);
    }

    sanitized.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png_magic_bytes() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_content_type("scan.txt", &png), "image/png");
    }

    #[test]
    fn test_detect_jpeg_magic_bytes() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
        assert_eq!(detect_content_type("passport", &jpeg), "image/jpeg");
    }

    #[test]
    fn test_detect_pdf_magic_bytes() {
        let pdf = b"%PDF-1.7\n";
        assert_eq!(detect_content_type("contract.bin", pdf), "application/pdf");
    }

    #[test]
    fn test_detect_text_by_extension() {
        assert_eq!(detect_content_type("notes.txt", b"hello"), "text/plain");
    }

    #[test]
    fn test_detect_garbage_with_jpeg_extension() {
        let result = detect_content_type("photo.jpg", b"definitely not a jpeg");
        assert_eq!(result, "application/octet-stream");
    }

    #[test]
    fn test_extension_uses_subtype() {
        assert_eq!(extension_for_mime("application/pdf"), "pdf");
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/jpeg"), "jpeg");
    }

    #[test]
    fn test_extension_overrides() {
        assert_eq!(extension_for_mime("text/plain; charset=utf-8"), "txt");
        assert_eq!(extension_for_mime("image/svg+xml"), "svg");
        assert_eq!(extension_for_mime("application/octet-stream"), "bin");
    }

    #[test]
    fn test_extension_for_malformed_mime() {
        assert_eq!(extension_for_mime(""), "bin");
        assert_eq!(extension_for_mime("nonsense"), "bin");
    }

    #[test]
    fn test_accepts_wildcard_and_exact() {
        let accept = ["image/*", "application/pdf"];
        assert!(accepts(&accept, "image/png"));
        assert!(accepts(&accept, "IMAGE/JPEG"));
        assert!(accepts(&accept, "application/pdf"));
        assert!(!accepts(&accept, "application/zip"));
        assert!(!accepts(&accept, "text/plain"));
    }

    #[test]
    fn test_accepts_any() {
        assert!(accepts(&["*/*"], "application/x-whatever"));
        assert!(!accepts(&["*/*"], "garbage"));
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("image/webp"));
        assert!(!is_image("application/pdf"));
    }

    #[test]
    fn test_valid_mime_types() {
        assert!(is_valid_mime_type("image/svg+xml"));
        assert!(!is_valid_mime_type("image"));
        assert!(!is_valid_mime_type("image/ png"));
    }

    #[test]
    fn test_sanitize_replaces_separators_and_specials() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("Payslip 03/2025.png"), "Payslip 03_2025.png");
        assert_eq!(sanitize_filename(r"C:\scans\id.jpg"), "C__scans_id.jpg");
        assert_eq!(sanitize_filename("a:b?.pdf"), "a_b_.pdf");
        assert_eq!(sanitize_filename("   "), "unnamed_document");
    }

    #[test]
    fn test_sanitize_truncates_keeping_extension() {
        let long = format!("{}.pdf", "é".repeat(200));
        let sanitized = sanitize_filename(&long);
        assert!(sanitized.len() <= 255);
        assert!(sanitized.ends_with(".pdf"));
    }
}
