//! # unify-vault
//!
//! Device-local document vault for unify.
//!
//! This crate provides:
//! - [`DocumentVault`]: list/add/delete/export over one persisted collection
//! - Two-step delete confirmation ([`DeleteToken`])
//! - Slot store backends (memory, filesystem)
//! - File sources (local path, in-memory blob)
//!
//! ## Example
//!
//! ```rust,ignore
//! use unify_vault::{DocumentVault, FilesystemSlotStore, LocalFile, VaultConfig};
//! use unify_core::DocumentCategory;
//!
//! let mut vault = DocumentVault::open(FilesystemSlotStore::new("./unify-data"), VaultConfig::default());
//! let doc = vault
//!     .add(&LocalFile::new("passport.jpg"), "Passport", DocumentCategory::Identification)
//!     .await?;
//! let exported = vault.export(doc.id)?;
//! ```

pub mod config;
pub mod file_source;
pub mod slot_store;
pub mod vault;

pub use config::VaultConfig;
pub use file_source::{InMemoryFile, LocalFile};
pub use slot_store::{FilesystemSlotStore, MemorySlotStore};
pub use vault::{DeleteToken, DocumentVault};

// Re-export core types
pub use unify_core::*;
