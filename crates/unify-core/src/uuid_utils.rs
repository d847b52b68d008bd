//! UUID v7 utilities for document identifiers.
//!
//! Document ids are UUIDv7: the first 48 bits carry a millisecond Unix
//! timestamp, so ids sort by creation time even though the vault never
//! relies on that ordering for correctness.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use unify_core::uuid_utils::new_v7;
///
/// let id = new_v7();
/// assert_eq!(id.get_version_num(), 7);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Generate a UUIDv7 that `is_taken` reports as free.
///
/// Collisions are practically impossible, but the collection invariant
/// requires pairwise distinct ids so the check is made anyway.
pub fn unique_v7(is_taken: impl Fn(&Uuid) -> bool) -> Uuid {
    loop {
        let id = new_v7();
        if !is_taken(&id) {
            return id;
        }
        tracing::debug!(document_id = %id, "generated id already in use, regenerating");
    }
}

/// Parse a user-supplied document id.
pub fn parse_id(input: &str) -> Result<Uuid> {
    Uuid::parse_str(input.trim())
        .map_err(|e| Error::InvalidInput(format!("invalid document id '{}': {}", input, e)))
}

/// Extract the timestamp from a UUIDv7.
///
/// Returns `None` if the UUID is not version 7.
pub fn extract_timestamp(uuid: &Uuid) -> Option<DateTime<Utc>> {
    let bytes = uuid.as_bytes();
    if (bytes[6] >> 4) != 7 {
        return None;
    }

    let millis = ((bytes[0] as u64) << 40)
        | ((bytes[1] as u64) << 32)
        | ((bytes[2] as u64) << 24)
        | ((bytes[3] as u64) << 16)
        | ((bytes[4] as u64) << 8)
        | (bytes[5] as u64);

    Utc.timestamp_millis_opt(millis as i64).single()
}

/// Check if a UUID is version 7.
#[inline]
pub fn is_v7(uuid: &Uuid) -> bool {
    uuid.get_version_num() == 7
}
