//! The document vault: a device-local collection of user files.
//!
//! The whole collection lives in one slot of an injected [`SlotStore`]. It is
//! read once in [`DocumentVault::open`] and rewritten in full after every
//! mutation. There is no per-record patching and no lock: two vaults over the
//! same slot race, and whichever writes last wins.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use chrono::Local;
use tracing::{debug, info, warn};
use uuid::Uuid;

use unify_core::{
    accepts, data_uri, defaults, unique_v7, DocumentCategory, Error, ExportedDocument,
    FileSource, Result, SlotStore, StoredDocument,
};

use crate::config::VaultConfig;

/// Proof that a caller asked to delete a document, to be confirmed before the
/// destructive step runs.
///
/// Tokens are single use and only valid for the vault that issued them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteToken {
    nonce: Uuid,
    id: Uuid,
}

impl DeleteToken {
    /// Id of the document this token would delete.
    pub fn document_id(&self) -> Uuid {
        self.id
    }
}

/// Local persistent store of user document records.
pub struct DocumentVault<S: SlotStore> {
    store: S,
    config: VaultConfig,
    /// Newest first.
    documents: Vec<StoredDocument>,
    /// nonce -> document id
    pending_deletes: HashMap<Uuid, Uuid>,
}

impl<S: SlotStore> DocumentVault<S> {
    /// Open the vault over `store`, loading the persisted collection.
    ///
    /// A missing slot is an empty vault. An unreadable or unparsable slot is
    /// also treated as empty: the damaged contents are logged and dropped, and
    /// are overwritten by the next successful mutation.
    pub fn open(store: S, config: VaultConfig) -> Self {
        let documents = match load(&store, &config.slot_key) {
            Ok(documents) => dedupe(documents),
            Err(e) => {
                warn!(
                    subsystem = "vault",
                    op = "open",
                    slot_key = %config.slot_key,
                    error = %e,
                    "persisted collection unreadable, starting empty"
                );
                Vec::new()
            }
        };

        info!(
            subsystem = "vault",
            op = "open",
            slot_key = %config.slot_key,
            document_count = documents.len(),
            "document vault opened"
        );

        Self {
            store,
            config,
            documents,
            pending_deletes: HashMap::new(),
        }
    }

    /// Open with [`VaultConfig::default`].
    pub fn with_defaults(store: S) -> Self {
        Self::open(store, VaultConfig::default())
    }

    /// All stored documents, newest first.
    pub fn list(&self) -> &[StoredDocument] {
        &self.documents
    }

    /// Documents filed under `category`, newest first.
    pub fn list_by_category(&self, category: DocumentCategory) -> Vec<&StoredDocument> {
        self.documents
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&StoredDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store a new document.
    ///
    /// Suspends until `file` has been fully read, then persists the collection
    /// with the new record first. On any failure the collection is unchanged.
    pub async fn add<F>(
        &mut self,
        file: &F,
        name: &str,
        category: DocumentCategory,
    ) -> Result<StoredDocument>
    where
        F: FileSource + ?Sized,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "document name must not be empty".to_string(),
            ));
        }

        let blob = file.read().await.map_err(|e| match e {
            Error::FileRead(_) => e,
            other => Error::FileRead(other.to_string()),
        })?;

        if blob.is_empty() {
            return Err(Error::InvalidInput("file is empty".to_string()));
        }
        if blob.len() > self.config.max_document_bytes {
            return Err(Error::InvalidInput(format!(
                "file exceeds maximum size of {} bytes",
                self.config.max_document_bytes
            )));
        }

        let mime_type = if blob.mime_type.trim().is_empty() {
            defaults::FALLBACK_MIME_TYPE.to_string()
        } else {
            blob.mime_type.trim().to_string()
        };
        if !accepts(&self.config.accept, &mime_type) {
            return Err(Error::InvalidInput(format!(
                "file type {} is not accepted",
                mime_type
            )));
        }

        let id = unique_v7(|candidate| self.documents.iter().any(|d| d.id == *candidate));
        let document = StoredDocument {
            id,
            name: name.to_string(),
            category,
            date: self.display_date(),
            data: data_uri::encode(&mime_type, &blob.bytes),
            mime_type,
        };

        let mut updated = Vec::with_capacity(self.documents.len() + 1);
        updated.push(document.clone());
        updated.extend(self.documents.iter().cloned());
        self.persist(&updated)?;
        self.documents = updated;

        info!(
            subsystem = "vault",
            op = "add",
            document_id = %document.id,
            category = %document.category,
            mime_type = %document.mime_type,
            byte_len = blob.bytes.len(),
            document_count = self.documents.len(),
            "document added"
        );

        Ok(document)
    }

    /// Remove the document with `id`.
    ///
    /// Returns `Ok(false)` when no such document exists; deleting twice is the
    /// same as deleting once.
    pub fn delete(&mut self, id: Uuid) -> Result<bool> {
        if self.get(id).is_none() {
            debug!(subsystem = "vault", op = "delete", document_id = %id, "no such document, nothing to delete");
            return Ok(false);
        }

        let updated: Vec<StoredDocument> = self
            .documents
            .iter()
            .filter(|d| d.id != id)
            .cloned()
            .collect();
        self.persist(&updated)?;
        self.documents = updated;
        self.pending_deletes.retain(|_, pending| *pending != id);

        info!(
            subsystem = "vault",
            op = "delete",
            document_id = %id,
            document_count = self.documents.len(),
            "document deleted"
        );
        Ok(true)
    }

    /// Rebuild the original file for download.
    pub fn export(&self, id: Uuid) -> Result<ExportedDocument> {
        let document = self.get(id).ok_or(Error::DocumentNotFound(id))?;
        let bytes = document.decode()?;

        info!(
            subsystem = "vault",
            op = "export",
            document_id = %id,
            byte_len = bytes.len(),
            "document exported"
        );

        Ok(ExportedDocument {
            filename: document.export_filename(),
            mime_type: document.mime_type.clone(),
            bytes,
        })
    }

    /// First half of a confirmed delete: issue a token for `id`.
    ///
    /// A token is issued even when `id` is unknown; confirming it is then a
    /// no-op, matching [`DocumentVault::delete`]. At most one token is pending
    /// per id: a new request supersedes the previous token.
    pub fn request_delete(&mut self, id: Uuid) -> DeleteToken {
        self.pending_deletes.retain(|_, pending| *pending != id);
        let nonce = Uuid::new_v4();
        self.pending_deletes.insert(nonce, id);
        debug!(subsystem = "vault", op = "request_delete", document_id = %id, "delete confirmation requested");
        DeleteToken { nonce, id }
    }

    /// Second half of a confirmed delete: perform the deletion.
    ///
    /// Fails with [`Error::InvalidConfirmation`] for a token that was never
    /// issued by this vault, was cancelled, or was already confirmed.
    pub fn confirm_delete(&mut self, token: DeleteToken) -> Result<bool> {
        match self.pending_deletes.remove(&token.nonce) {
            Some(id) if id == token.id => {}
            Some(id) => {
                self.pending_deletes.insert(token.nonce, id);
                return Err(Error::InvalidConfirmation);
            }
            None => return Err(Error::InvalidConfirmation),
        }

        let result = self.delete(token.id);
        if result.is_err() {
            // Keep the confirmation usable so the caller can retry
            self.pending_deletes.insert(token.nonce, token.id);
        }
        result
    }

    /// Discard a pending delete. Returns whether the token was pending.
    pub fn cancel_delete(&mut self, token: &DeleteToken) -> bool {
        self.pending_deletes.remove(&token.nonce).is_some()
    }

    fn persist(&self, documents: &[StoredDocument]) -> Result<()> {
        let serialized = serde_json::to_string(documents)?;
        self.store
            .write(&self.config.slot_key, &serialized)
            .inspect_err(|e| {
                warn!(
                    subsystem = "vault",
                    op = "persist",
                    slot_key = %self.config.slot_key,
                    byte_len = serialized.len(),
                    error = %e,
                    "failed to persist collection"
                );
            })
    }

    fn display_date(&self) -> String {
        let now = Local::now();
        let mut date = String::new();
        if write!(date, "{}", now.format(&self.config.date_format)).is_err() {
            warn!(date_format = %self.config.date_format, "invalid date format, using default");
            date = now.format(defaults::DATE_FORMAT).to_string();
        }
        date
    }
}

/// Read and parse the persisted collection.
///
/// Parse failures surface as [`Error::StorageCorrupt`]; `open` recovers from
/// them.
fn load<S: SlotStore>(store: &S, key: &str) -> Result<Vec<StoredDocument>> {
    match store.read(key)? {
        None => Ok(Vec::new()),
        Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| Error::StorageCorrupt(e.to_string())),
    }
}

/// Drop records whose id was already seen, keeping the first (newest).
fn dedupe(documents: Vec<StoredDocument>) -> Vec<StoredDocument> {
    let mut seen = HashSet::with_capacity(documents.len());
    let total = documents.len();
    let kept: Vec<StoredDocument> = documents
        .into_iter()
        .filter(|d| seen.insert(d.id))
        .collect();
    if kept.len() != total {
        warn!(
            subsystem = "vault",
            op = "open",
            dropped = total - kept.len(),
            "duplicate document ids in persisted collection"
        );
    }
    kept
}
