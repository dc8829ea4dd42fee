//! Error types for the textmint generate/store/verify pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by model provider HTTP clients.
///
/// These never reach the pipeline: the remote generator turns every variant
/// into an unavailable signal so the fallback can take over.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider request failed: {0}")]
    RequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    AuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Provider model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Generation errors that survive the remote-to-local fallback.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Fallback generator '{generator}' produced no text: {reason}")]
    FallbackUnavailable { generator: String, reason: String },
}

/// Output store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Output directory unavailable {path:?}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write artifact {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact already exists and collision policy is 'fail': {path:?}")]
    Collision { path: PathBuf },
}

/// Integrity digest errors
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Chunk size must be a positive integer, got {0}")]
    InvalidChunkSize(usize),

    #[error("Path does not exist or is not a regular file: {path:?}")]
    NotAFile { path: PathBuf },

    #[error("Failed to read artifact {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write digest sidecar {path:?}: {source}")]
    SidecarWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read digest sidecar {path:?}: {source}")]
    SidecarRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Digest sidecar is not a 64-character hex digest: {path:?}")]
    MalformedSidecar { path: PathBuf },

    #[error("Digest mismatch for {path:?}: sidecar has {expected}, content hashes to {actual}")]
    Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

/// Data ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize ledger record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Fatal pipeline errors. Every variant names the item index it stopped at.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Storage failed at index {index}: {source}")]
    Storage {
        index: usize,
        #[source]
        source: StorageError,
    },

    #[error("Verification failed at index {index}; artifact {artifact:?} has no digest: {source}")]
    Verification {
        index: usize,
        artifact: PathBuf,
        #[source]
        source: VerificationError,
    },

    #[error("Ledger append failed at index {index}: {source}")]
    Ledger {
        index: usize,
        #[source]
        source: LedgerError,
    },

    #[error("Generation failed at index {index}: {source}")]
    FallbackUnavailable {
        index: usize,
        #[source]
        source: GenerationError,
    },
}

impl PipelineError {
    /// Index of the item that aborted the run.
    pub fn index(&self) -> usize {
        match self {
            PipelineError::Storage { index, .. }
            | PipelineError::Verification { index, .. }
            | PipelineError::Ledger { index, .. }
            | PipelineError::FallbackUnavailable { index, .. } => *index,
        }
    }
}

/// Top-level errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
