//! Output store: writes generated text to indexed files in an output directory.

use crate::error::StorageError;
use crate::types::{GeneratedItem, StoredArtifact};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to do when the target file for an index already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Append the new text to the existing file.
    Append,
    /// Refuse to touch the existing file.
    Fail,
}

/// Writes one file per generated item: `{dir}/{prefix}_{index}.txt`.
#[derive(Debug, Clone)]
pub struct OutputStore {
    file_prefix: String,
    collision: CollisionPolicy,
}

impl OutputStore {
    pub fn new(file_prefix: impl Into<String>, collision: CollisionPolicy) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            collision,
        }
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision
    }

    /// Deterministic artifact path for an index.
    pub fn artifact_path(&self, output_dir: &Path, index: usize) -> PathBuf {
        output_dir.join(format!("{}_{}.txt", self.file_prefix, index))
    }

    /// Write `item.text` as raw UTF-8, creating `output_dir` if needed.
    ///
    /// `bytes_written` counts this write only, also in append mode.
    pub fn store(
        &self,
        item: &GeneratedItem,
        output_dir: &Path,
    ) -> Result<StoredArtifact, StorageError> {
        fs::create_dir_all(output_dir).map_err(|source| StorageError::DirectoryUnavailable {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let path = self.artifact_path(output_dir, item.index);
        let existed = path.exists();
        let mut options = OpenOptions::new();
        match self.collision {
            CollisionPolicy::Overwrite => options.write(true).create(true).truncate(true),
            CollisionPolicy::Append => options.append(true).create(true),
            CollisionPolicy::Fail => options.write(true).create_new(true),
        };

        let mut file = options.open(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::AlreadyExists {
                StorageError::Collision { path: path.clone() }
            } else {
                StorageError::Write {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let bytes = item.text.as_bytes();
        file.write_all(bytes)
            .and_then(|_| file.sync_all())
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        if existed {
            match self.collision {
                CollisionPolicy::Overwrite => {
                    warn!(index = item.index, path = %path.display(), "Existing artifact overwritten")
                }
                _ => info!(index = item.index, path = %path.display(), "Appended to existing artifact"),
            }
        }
        debug!(index = item.index, path = %path.display(), bytes = bytes.len(), "Artifact stored");

        Ok(StoredArtifact {
            index: item.index,
            path,
            bytes_written: bytes.len() as u64,
            replaced: existed,
        })
    }
}

impl Default for OutputStore {
    fn default() -> Self {
        Self::new("output", CollisionPolicy::default())
    }
}
