//! Structured logging field name constants for unify.
//!
//! All crates use these constants for consistent structured logging fields.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Operation failed and the user must retry |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (open, add, delete, export) |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-record iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "vault", "slot_store", "file_source", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "open", "add", "delete", "export", "confirm_delete"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Document UUID being operated on.
pub const DOCUMENT_ID: &str = "document_id";

/// Document category.
pub const CATEGORY: &str = "category";

/// Media type of a document or source file.
pub const MIME_TYPE: &str = "mime_type";

/// Slot key in the backing store.
pub const SLOT_KEY: &str = "slot_key";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Byte length of a file or serialized payload.
pub const BYTE_LEN: &str = "byte_len";

/// Number of documents in the collection.
pub const DOCUMENT_COUNT: &str = "document_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
