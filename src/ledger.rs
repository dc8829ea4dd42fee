//! JSONL data ledger: one record per stored item.

use crate::error::LedgerError;
use crate::integrity::sha256_hex;
use crate::types::{GeneratedItem, GenerationSource, IntegrityRecord, StoredArtifact};
use chrono::{Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Timestamp flavour for ledger records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    #[default]
    Local,
    Utc,
}

/// One ledger line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// SHA-256 of the text bytes.
    pub id: String,
    /// Digest of the stored file, when hashing ran.
    pub digest: Option<String>,
    pub text: String,
    /// Length in characters.
    pub length: usize,
    pub source: GenerationSource,
    pub artifact: PathBuf,
    pub encoding: String,
    pub timestamp: String,
}

/// Append-only JSONL ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    dedup_by_digest: bool,
    time_mode: TimeMode,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>, dedup_by_digest: bool, time_mode: TimeMode) -> Self {
        Self {
            path: path.into(),
            dedup_by_digest,
            time_mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the record for a stored item without writing it.
    pub fn create_record(
        &self,
        item: &GeneratedItem,
        artifact: &StoredArtifact,
        integrity: Option<&IntegrityRecord>,
    ) -> LedgerRecord {
        LedgerRecord {
            id: sha256_hex(item.text.as_bytes()),
            digest: integrity.map(|r| r.digest.clone()),
            text: item.text.clone(),
            length: item.text.chars().count(),
            source: item.source,
            artifact: artifact.path.clone(),
            encoding: "utf-8".to_string(),
            timestamp: self.timestamp(),
        }
    }

    /// Append a record. With dedup enabled, a record whose digest is already
    /// present is returned without being written again.
    pub fn append(
        &self,
        item: &GeneratedItem,
        artifact: &StoredArtifact,
        integrity: Option<&IntegrityRecord>,
    ) -> Result<LedgerRecord, LedgerError> {
        let record = self.create_record(item, artifact, integrity);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LedgerError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if self.dedup_by_digest {
            if let Some(ref digest) = record.digest {
                if self.contains_digest(digest)? {
                    debug!(digest = %digest, "Ledger already has digest, skipping");
                    return Ok(record);
                }
            }
        }

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let io_err = |source| LedgerError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).map_err(io_err)?;

        Ok(record)
    }

    /// Read all well-formed records; blank and malformed lines are skipped.
    pub fn records(&self) -> Result<Vec<LedgerRecord>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let io_err = |source| LedgerError::Io {
            path: self.path.clone(),
            source,
        };
        let file = fs::File::open(&self.path).map_err(io_err)?;

        let mut records = Vec::new();
        for line in BufReader::new(file).split(b'\n') {
            let line = line.map_err(io_err)?;
            let line = match std::str::from_utf8(&line) {
                Ok(line) => line.trim(),
                Err(_) => continue,
            };
            if line.is_empty() {
                continue;
            }
            if let Ok(record) = serde_json::from_str::<LedgerRecord>(line) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn contains_digest(&self, digest: &str) -> Result<bool, LedgerError> {
        Ok(self
            .records()?
            .iter()
            .any(|r| r.digest.as_deref() == Some(digest)))
    }

    fn timestamp(&self) -> String {
        match self.time_mode {
            TimeMode::Utc => Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            TimeMode::Local => Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }
}
