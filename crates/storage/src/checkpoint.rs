// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable single-slot cursor persistence

use fv_core::ContinuationToken;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("checkpoint store unavailable: {0}")]
    Unavailable(String),
}

/// Stores the cursor of the last fully archived feed edge.
///
/// `load` before any `save` yields `None`. A `save` replaces the previous
/// value completely.
pub trait CheckpointStore: Send + Sync + 'static {
    fn load(&self) -> Result<Option<ContinuationToken>, CheckpointError>;

    fn save(&self, token: &ContinuationToken) -> Result<(), CheckpointError>;

    /// Forget the stored cursor so the next poll starts from the beginning
    fn clear(&self) -> Result<(), CheckpointError>;
}

/// Plain-text checkpoint file replaced atomically on every save
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    /// Open the store, creating the containing directory if needed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tracing::debug!(dir = %parent.display(), "checking checkpoint directory");
            if !parent.exists() {
                tracing::info!(dir = %parent.display(), "creating checkpoint directory");
                fs::create_dir_all(parent).map_err(|source| CheckpointError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "checkpoint".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    fn io_err(&self, source: io::Error) -> CheckpointError {
        CheckpointError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self) -> Result<Option<ContinuationToken>, CheckpointError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(ContinuationToken::new(text)))
    }

    fn save(&self, token: &ContinuationToken) -> Result<(), CheckpointError> {
        let temp_path = self.temp_path();
        {
            let mut file = File::create(&temp_path).map_err(|e| self.io_err(e))?;
            file.write_all(token.as_str().as_bytes())
                .map_err(|e| self.io_err(e))?;
            file.sync_all().map_err(|e| self.io_err(e))?;
        }

        // Atomic replace (rename is atomic on POSIX)
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_err(e))?;

        // Persist the rename itself
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
                tracing::warn!(dir = %parent.display(), error = %e, "failed to sync checkpoint directory");
            }
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), CheckpointError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
