//! Configuration System
//!
//! Layered configuration for a textmint run: merge-policy defaults, then the
//! global file, then workspace files, then `TEXTMINT__*` environment variables.
//! CLI flags are applied on top by the route layer.

use crate::error::{AppError, ProviderError};
use crate::generator::{LocalGenerator, LocalPool, DEFAULT_ALPHABET};
use crate::integrity::DEFAULT_CHUNK_SIZE;
use crate::ledger::{Ledger, TimeMode};
use crate::logging::LoggingConfig;
use crate::provider::{HttpTimeouts, ModelProvider};
use crate::store::{CollisionPolicy, OutputStore};
use crate::types::{GenerationRequest, TEMPERATURE_RANGE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod loader;
mod merge_policy;
mod sources;

pub use loader::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextmintConfig {
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub integrity: IntegrityConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to generate and where to put it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_char_length")]
    pub char_length: usize,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_true")]
    pub hashing_enabled: bool,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default)]
    pub collision: CollisionPolicy,
}

fn default_count() -> usize {
    1
}

fn default_char_length() -> usize {
    256
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.9
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_true() -> bool {
    true
}

fn default_file_prefix() -> String {
    "output".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            char_length: default_char_length(),
            model: default_model(),
            temperature: default_temperature(),
            output_dir: default_output_dir(),
            hashing_enabled: true,
            file_prefix: default_file_prefix(),
            collision: CollisionPolicy::default(),
        }
    }
}

/// Remote backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAI,
    Ollama,
    Custom,
    /// No remote backend; every item comes from the local generator.
    None,
}

/// Remote provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,
    /// Base URL (openai, ollama) or full endpoint (custom).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ProviderSettings {
    pub fn timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.timeout_secs),
        }
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Resolve the provider for `model`.
    ///
    /// `Ok(None)` means remote generation is turned off. A missing API key for
    /// OpenAI is `NotConfigured`, which callers turn into an unconfigured
    /// remote generator.
    pub fn resolve(&self, model: &str) -> Result<Option<ModelProvider>, ProviderError> {
        let model = model.to_string();
        match self.kind {
            ProviderKind::None => Ok(None),
            ProviderKind::OpenAI => {
                let api_key = self.api_key().ok_or_else(|| {
                    ProviderError::NotConfigured(format!("{} is not set", self.api_key_env))
                })?;
                Ok(Some(ModelProvider::OpenAI {
                    model,
                    api_key,
                    base_url: self.endpoint.clone(),
                }))
            }
            ProviderKind::Ollama => Ok(Some(ModelProvider::Ollama {
                model,
                base_url: self.endpoint.clone(),
            })),
            ProviderKind::Custom => {
                let endpoint = self.endpoint.clone().ok_or_else(|| {
                    ProviderError::NotConfigured("custom provider requires an endpoint".to_string())
                })?;
                Ok(Some(ModelProvider::Custom {
                    model,
                    endpoint,
                    api_key: self.api_key(),
                }))
            }
        }
    }
}

/// Pool used by the local generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    #[default]
    Words,
    Alphabet,
}

/// Local fallback generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    #[serde(default)]
    pub pool: PoolKind,
    /// Overrides the built-in word list when non-empty.
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    /// Fixed seed for reproducible output.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            pool: PoolKind::default(),
            words: Vec::new(),
            alphabet: default_alphabet(),
            seed: None,
        }
    }
}

impl LocalConfig {
    pub fn build(&self) -> LocalGenerator {
        let pool = match self.pool {
            PoolKind::Words if self.words.is_empty() => LocalPool::words(),
            PoolKind::Words => LocalPool::Words(self.words.clone()),
            PoolKind::Alphabet => LocalPool::alphabet(&self.alphabet),
        };
        match self.seed {
            Some(seed) => LocalGenerator::seeded(pool, seed),
            None => LocalGenerator::new(pool),
        }
    }
}

/// Digest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// JSONL ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub dedup_by_digest: bool,
    #[serde(default)]
    pub time_mode: TimeMode,
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("output/ledger.jsonl")
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_ledger_path(),
            dedup_by_digest: false,
            time_mode: TimeMode::default(),
        }
    }
}

impl LedgerConfig {
    pub fn build(&self) -> Option<Ledger> {
        self.enabled
            .then(|| Ledger::new(self.path.clone(), self.dedup_by_digest, self.time_mode))
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Generation(String),
    Provider(String),
    Local(String),
    Integrity(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Generation(msg) => write!(f, "generation: {}", msg),
            ValidationError::Provider(msg) => write!(f, "provider: {}", msg),
            ValidationError::Local(msg) => write!(f, "local: {}", msg),
            ValidationError::Integrity(msg) => write!(f, "integrity: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TextmintConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let generation = &self.generation;

        if generation.char_length == 0 {
            errors.push(ValidationError::Generation(
                "char_length must be greater than zero".to_string(),
            ));
        }
        if generation.model.trim().is_empty() {
            errors.push(ValidationError::Generation("model cannot be empty".to_string()));
        }
        let (min, max) = TEMPERATURE_RANGE;
        if !(min..=max).contains(&generation.temperature) {
            errors.push(ValidationError::Generation(format!(
                "temperature {} out of range [{}, {}]",
                generation.temperature, min, max
            )));
        }
        if generation.file_prefix.is_empty() || generation.file_prefix.contains(&['/', '\\'][..]) {
            errors.push(ValidationError::Generation(format!(
                "invalid file_prefix '{}'",
                generation.file_prefix
            )));
        }

        if self.provider.kind == ProviderKind::Custom && self.provider.endpoint.is_none() {
            errors.push(ValidationError::Provider(
                "custom provider requires an endpoint".to_string(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            errors.push(ValidationError::Provider(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.local.pool == PoolKind::Alphabet && self.local.alphabet.is_empty() {
            errors.push(ValidationError::Local("alphabet cannot be empty".to_string()));
        }
        if self.local.pool == PoolKind::Words && self.local.words.iter().any(|w| w.is_empty()) {
            errors.push(ValidationError::Local("words cannot contain empty entries".to_string()));
        }

        if self.integrity.chunk_size == 0 {
            errors.push(ValidationError::Integrity(
                "chunk_size must be a positive integer".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and render every problem into one config error.
    pub fn validated(self) -> Result<Self, AppError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            AppError::Config(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    pub fn request(&self) -> Result<GenerationRequest, AppError> {
        let g = &self.generation;
        GenerationRequest::new(
            g.count,
            g.char_length,
            g.model.clone(),
            g.temperature,
            g.output_dir.clone(),
        )
        .map_err(AppError::Config)
    }

    pub fn output_store(&self) -> OutputStore {
        OutputStore::new(self.generation.file_prefix.clone(), self.generation.collision)
    }
}
