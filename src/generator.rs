//! Text generation strategies.
//!
//! Every strategy implements [`TextGenerator`]. The [`GeneratorFacade`] composes a
//! primary and a fallback generator and only ever talks to the trait, so either
//! slot can hold a custom implementation.

use async_trait::async_trait;

pub mod facade;
pub mod local;
pub mod remote;

pub use facade::{GeneratedText, GeneratorFacade};
pub use local::{LocalGenerator, LocalPool, DEFAULT_ALPHABET, DEFAULT_WORD_POOL};
pub use remote::RemoteGenerator;

/// Per-call generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub char_length: usize,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

impl GenerationParams {
    pub fn new(char_length: usize) -> Self {
        Self {
            char_length,
            model: None,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Outcome of a single generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Text(String),
    /// The strategy could not produce text; the reason is for logs only.
    Unavailable(String),
}

impl Generation {
    /// Usable text: present and non-empty.
    pub fn into_text(self) -> Option<String> {
        match self {
            Generation::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// A text generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, params: &GenerationParams) -> Generation;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
