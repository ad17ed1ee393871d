//! Manifest persistence
//!
//! One artifact per source/target pair. Writing again replaces the previous
//! file; the bytes land in a temp file in the same directory first and are
//! persisted into place, so a reader never sees a partial manifest. A temp
//! file that cannot be persisted is removed.

use premint_core::{CollectionId, MigrationError, RegistryKind, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Directory-backed manifest store.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name for a collection pair.
    pub fn file_name(source: CollectionId, target: CollectionId) -> String {
        format!(
            "signatures-{}-{source}-{}-{target}.json",
            RegistryKind::Legacy.pallet_name(),
            RegistryKind::Current.pallet_name()
        )
    }

    /// Full path for a collection pair.
    pub fn path_for(&self, source: CollectionId, target: CollectionId) -> PathBuf {
        self.root.join(Self::file_name(source, target))
    }

    /// Write `bytes`, replacing any earlier artifact for the pair.
    pub fn write(&self, source: CollectionId, target: CollectionId, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).map_err(|e| {
            MigrationError::storage(format!(
                "failed to create data directory {}: {e}",
                self.root.display()
            ))
        })?;

        let path = self.path_for(source, target);
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(|e| {
            MigrationError::storage(format!(
                "failed to create temp file in {}: {e}",
                self.root.display()
            ))
        })?;
        tmp.write_all(bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| {
                MigrationError::storage(format!("failed to write {}: {e}", tmp.path().display()))
            })?;
        tmp.persist(&path).map_err(|e| {
            MigrationError::storage(format!(
                "failed to move manifest into {}: {}",
                path.display(),
                e.error
            ))
        })?;

        info!(path = %path.display(), bytes = bytes.len(), "manifest written");
        Ok(path)
    }

    /// Read the artifact for a pair.
    pub fn read(&self, source: CollectionId, target: CollectionId) -> Result<Vec<u8>> {
        let path = self.path_for(source, target);
        debug!(path = %path.display(), "reading manifest");
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(MigrationError::ArtifactNotFound {
                path: path.display().to_string(),
            }),
            Err(e) => Err(MigrationError::storage(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }
}
