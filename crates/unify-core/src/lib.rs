//! # unify-core
//!
//! Core types, traits, and abstractions for the unify document vault.
//!
//! This crate provides the data model, error taxonomy and collaborator
//! traits that the vault and its front ends depend on.

pub mod data_uri;
pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod guide;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use data_uri::DataUri;
pub use error::{Error, Result};
pub use file_safety::{accepts, detect_content_type, extension_for_mime, sanitize_filename};
pub use guide::{links_from_response, GuideStep, Link, StepGuide};
pub use models::*;
pub use traits::*;
pub use uuid_utils::{new_v7, parse_id, unique_v7};
