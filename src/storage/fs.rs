//! Filesystem artifact store
//!
//! Pages go to `<root>/web_pages/<name>.txt`, documents to
//! `<root>/documents/<name>` with an optional `<name>.txt` beside them.

use crate::config::CollisionPolicy;
use crate::extract::ExtractedPage;
use crate::storage::traits::{ArtifactStore, StorageError, StorageResult};
use crate::storage::{derived_filename, document_filename, render_page, url_hash_suffix};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Directory holding extracted page text
pub const PAGES_DIR: &str = "web_pages";

/// Directory holding downloaded documents
pub const DOCUMENTS_DIR: &str = "documents";

/// Writes artifacts as plain files under one output root
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
    policy: CollisionPolicy,
}

impl FsArtifactStore {
    /// Opens a store rooted at `root`, creating its directories
    pub fn open(root: impl Into<PathBuf>, policy: CollisionPolicy) -> StorageResult<Self> {
        let root = root.into();
        for dir in [root.join(PAGES_DIR), root.join(DOCUMENTS_DIR)] {
            fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self { root, policy })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.root.join(PAGES_DIR)
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.root.join(DOCUMENTS_DIR)
    }

    /// Path a page would be written to
    pub fn page_path(&self, url: &Url) -> PathBuf {
        let mut name = derived_filename(url);
        if self.policy == CollisionPolicy::HashSuffix {
            name.push_str(&url_hash_suffix(url));
        }
        self.pages_dir().join(format!("{}.txt", name))
    }

    /// Path a document would be written to
    ///
    /// With the hash-suffix policy the suffix goes before the extension so
    /// `report.pdf` stays recognisable as `report-1a2b3c4d.pdf`.
    pub fn document_path(&self, url: &Url) -> StorageResult<PathBuf> {
        let name = document_filename(url).ok_or_else(|| StorageError::InvalidName(url.to_string()))?;
        let name = match self.policy {
            CollisionPolicy::Overwrite => name,
            CollisionPolicy::HashSuffix => match name.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() => {
                    format!("{}{}.{}", stem, url_hash_suffix(url), ext)
                }
                _ => format!("{}{}", name, url_hash_suffix(url)),
            },
        };
        Ok(self.documents_dir().join(name))
    }
}

fn write_file(path: &Path, contents: &[u8]) -> StorageResult<()> {
    fs::write(path, contents).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}

impl ArtifactStore for FsArtifactStore {
    fn save_page(&self, url: &Url, page: &ExtractedPage) -> StorageResult<PathBuf> {
        let path = self.page_path(url);
        write_file(&path, render_page(url, page).as_bytes())?;
        Ok(path)
    }

    fn save_document(
        &self,
        url: &Url,
        bytes: &[u8],
        extracted_text: Option<&str>,
    ) -> StorageResult<PathBuf> {
        let path = self.document_path(url)?;
        write_file(&path, bytes)?;

        if let Some(text) = extracted_text {
            let mut text_path = path.clone().into_os_string();
            text_path.push(".txt");
            write_file(Path::new(&text_path), text.as_bytes())?;
        }
        Ok(path)
    }
}
