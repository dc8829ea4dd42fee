//! Integrity digests for stored artifacts.
//!
//! Digests are computed from the bytes read back from disk, not from the text
//! held in memory, so a record always describes what was actually persisted.

use crate::error::VerificationError;
use crate::types::{IntegrityRecord, StoredArtifact};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default streaming chunk size (128 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 128 * 1024;

/// Extension appended to an artifact path to form its sidecar.
pub const SIDECAR_EXTENSION: &str = "sha256";

/// Sidecar path for an artifact: `<artifact>.sha256`.
pub fn sidecar_path(artifact_path: &Path) -> PathBuf {
    let mut name = artifact_path.as_os_str().to_os_string();
    name.push(".");
    name.push(SIDECAR_EXTENSION);
    PathBuf::from(name)
}

/// True for exactly 64 lowercase hex characters.
pub fn is_hex_digest(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// SHA-256 of an in-memory buffer, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Computes and persists SHA-256 digests of stored artifacts.
#[derive(Debug, Clone)]
pub struct IntegrityVerifier {
    chunk_size: usize,
}

impl IntegrityVerifier {
    pub fn new(chunk_size: usize) -> Result<Self, VerificationError> {
        if chunk_size == 0 {
            return Err(VerificationError::InvalidChunkSize(chunk_size));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Stream a file through SHA-256 and return the lowercase hex digest.
    pub fn digest_file(&self, path: &Path) -> Result<String, VerificationError> {
        if !path.is_file() {
            return Err(VerificationError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let read_err = |source| VerificationError::Read {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(read_err)?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.chunk_size];
        loop {
            let n = file.read(&mut buffer).map_err(read_err)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(hex::encode(hasher.finalize()))
    }

    /// Hash the artifact as stored and write the digest to its sidecar.
    ///
    /// Idempotent for an unchanged artifact: the sidecar is rewritten with the
    /// same content.
    pub fn verify(&self, artifact: &StoredArtifact) -> Result<IntegrityRecord, VerificationError> {
        let digest = self.digest_file(&artifact.path)?;
        let digest_path = sidecar_path(&artifact.path);
        fs::write(&digest_path, format!("{}\n", digest)).map_err(|source| {
            VerificationError::SidecarWrite {
                path: digest_path.clone(),
                source,
            }
        })?;

        debug!(path = %artifact.path.display(), digest = %digest, "Digest recorded");

        Ok(IntegrityRecord {
            artifact_path: artifact.path.clone(),
            digest,
            digest_path,
        })
    }

    /// Re-hash an artifact and compare it with the digest in its sidecar.
    pub fn check(&self, artifact_path: &Path) -> Result<IntegrityRecord, VerificationError> {
        let digest_path = sidecar_path(artifact_path);
        let recorded = fs::read_to_string(&digest_path).map_err(|source| {
            VerificationError::SidecarRead {
                path: digest_path.clone(),
                source,
            }
        })?;
        let expected = recorded.trim_end_matches(&['\n', '\r'][..]);
        if !is_hex_digest(expected) {
            return Err(VerificationError::MalformedSidecar { path: digest_path });
        }

        let actual = self.digest_file(artifact_path)?;
        if actual != expected {
            return Err(VerificationError::Mismatch {
                path: artifact_path.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }

        Ok(IntegrityRecord {
            artifact_path: artifact_path.to_path_buf(),
            digest: actual,
            digest_path,
        })
    }
}

impl Default for IntegrityVerifier {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
