//! Slot store backends.
//!
//! - [`MemorySlotStore`]: shared in-memory map with an optional quota, used by
//!   tests and embedders that persist elsewhere
//! - [`FilesystemSlotStore`]: one file per slot, atomic replace on write

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};
use unify_core::defaults::SLOT_FILE_EXTENSION;
use unify_core::{Error, Result, SlotStore};
use uuid::Uuid;

/// In-memory slot store.
///
/// Clones share the same underlying map, so two vaults built from clones of
/// one store observe each other's writes the way two tabs share one origin.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of all keys and values, in bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: Arc::default(),
            quota: Some(quota),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Total bytes currently used across all slots.
    pub fn used_bytes(&self) -> usize {
        self.slots().iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots();
        if let Some(quota) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                warn!(
                    subsystem = "slot_store",
                    slot_key = %key,
                    needed,
                    quota,
                    "memory slot store quota exceeded"
                );
                return Err(Error::StorageFull { needed, quota });
            }
        }
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots().remove(key);
        Ok(())
    }
}

/// Filesystem slot store.
///
/// Path format: `{base_path}/{key}.json`
#[derive(Debug, Clone)]
pub struct FilesystemSlotStore {
    base_path: PathBuf,
}

impl FilesystemSlotStore {
    /// Create a new filesystem slot store rooted at `base_path`.
    ///
    /// The directory is created lazily on first write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a slot key to its file, rejecting keys that could escape the
    /// base directory.
    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(Error::InvalidInput(format!("invalid slot key '{}'", key)));
        }
        Ok(self
            .base_path
            .join(format!("{}.{}", key, SLOT_FILE_EXTENSION)))
    }

    /// Validate that the store can write, read, and delete a file.
    ///
    /// Performs a full round-trip at startup to surface permission errors and
    /// missing directories before the user adds a document. The test file is
    /// dot-prefixed, so it can never collide with a slot.
    pub fn validate(&self) -> Result<()> {
        let test_file = self.base_path.join(".health-check");
        let data = "slot-store-health-check";

        self.write_atomic(&test_file, data)?;
        let read_data = fs::read_to_string(&test_file)?;
        fs::remove_file(&test_file)?;

        if read_data != data {
            return Err(Error::Config(format!(
                "slot store read-back mismatch in {}",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    /// Write `value` to `path` through a uniquely named temp file + rename, so
    /// concurrent writers never share a partial file.
    fn write_atomic(&self, path: &Path, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_path).map_err(|e| {
            warn!(base_path = %self.base_path.display(), error = %e, "slot_store: create_dir_all failed");
            e
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = self
            .base_path
            .join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        let result = Self::write_and_rename(&temp_path, path, value);
        if result.is_err() {
            let _ = fs::remove_file(&temp_path); // Best-effort cleanup
        }
        result
    }

    fn write_and_rename(temp_path: &Path, path: &Path, value: &str) -> Result<()> {
        let mut file = fs::File::create(temp_path).map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "slot_store: File::create failed");
            e
        })?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(temp_path, path).map_err(|e| {
            warn!(from = %temp_path.display(), to = %path.display(), error = %e, "slot_store: rename failed");
            e
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
        }

        Ok(())
    }
}

impl SlotStore for FilesystemSlotStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        debug!(subsystem = "slot_store", slot_key = %key, path = %path.display(), byte_len = value.len(), "slot write");
        self.write_atomic(&path, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
