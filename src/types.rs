//! Core data types flowing through the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Inclusive temperature bounds accepted by generation requests.
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 2.0);

/// A batch of generation work, fixed at pipeline start.
///
/// Fields are private so a validated request cannot be mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    count: usize,
    char_length: usize,
    model: String,
    temperature: f32,
    output_dir: PathBuf,
}

impl GenerationRequest {
    /// Build a request, rejecting a zero `char_length`, an empty model or an
    /// out-of-range temperature. `count` may be zero (an empty run).
    pub fn new(
        count: usize,
        char_length: usize,
        model: impl Into<String>,
        temperature: f32,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, String> {
        let model = model.into();
        if char_length == 0 {
            return Err("char_length must be greater than zero".to_string());
        }
        if model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }
        let (min, max) = TEMPERATURE_RANGE;
        if !(min..=max).contains(&temperature) {
            return Err(format!(
                "temperature {} out of range [{}, {}]",
                temperature, min, max
            ));
        }

        Ok(Self {
            count,
            char_length,
            model,
            temperature,
            output_dir: output_dir.into(),
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn char_length(&self) -> usize {
        self.char_length
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Which generation tier produced an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Remote,
    Local,
}

impl fmt::Display for GenerationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationSource::Remote => write!(f, "remote"),
            GenerationSource::Local => write!(f, "local"),
        }
    }
}

/// One generated text, tagged with its source. The tag never reaches the stored bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedItem {
    pub index: usize,
    pub text: String,
    pub source: GenerationSource,
}

/// A persisted output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArtifact {
    pub index: usize,
    pub path: PathBuf,
    pub bytes_written: u64,
    /// A file already existed at `path` before this write.
    pub replaced: bool,
}

/// Digest of a stored artifact and the sidecar it was written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityRecord {
    pub artifact_path: PathBuf,
    /// 64 lowercase hex characters.
    pub digest: String,
    pub digest_path: PathBuf,
}
