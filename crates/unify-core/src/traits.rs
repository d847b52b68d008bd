//! Core traits for the vault's external collaborators.
//!
//! The vault never touches storage or files directly; it is handed a
//! [`SlotStore`] at construction and a [`FileSource`] per add, so tests can
//! substitute in-memory implementations.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::FileBlob;

/// Named-slot persistent key-value storage, scoped to one application.
///
/// Calls are synchronous: a slot holds a small serialized collection and is
/// read once at vault construction, then overwritten after each mutation.
pub trait SlotStore: Send + Sync {
    /// Read the slot. `Ok(None)` when the slot has never been written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the slot's entire contents.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// A file picked by the user, read asynchronously.
///
/// Reading cannot be cancelled once started and has no timeout; callers may
/// drop the future but the underlying read is not aborted.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Read the full file content together with its media type.
    async fn read(&self) -> Result<FileBlob>;
}
