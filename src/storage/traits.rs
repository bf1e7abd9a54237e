//! Storage traits and error types
//!
//! This module defines the trait interface for artifact backends and the
//! associated error type.

use crate::extract::ExtractedPage;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur while persisting an artifact
///
/// A storage failure is fatal for the artifact being written only; the crawl
/// carries on with the next job.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No file name can be derived from {0}")]
    InvalidName(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for artifact backends
///
/// Implementations are shared between workers, so every method takes
/// `&self` and the trait requires `Send + Sync`.
pub trait ArtifactStore: Send + Sync {
    /// Persists an extracted page, returning the path written
    fn save_page(&self, url: &Url, page: &ExtractedPage) -> StorageResult<PathBuf>;

    /// Persists a downloaded document and its extracted text, if any
    ///
    /// Returns the path of the raw document.
    fn save_document(
        &self,
        url: &Url,
        bytes: &[u8],
        extracted_text: Option<&str>,
    ) -> StorageResult<PathBuf>;
}
