//! Two-tier generation: primary first, fallback once on unavailability.

use super::{Generation, GenerationParams, TextGenerator};
use crate::error::GenerationError;
use crate::types::GenerationSource;
use std::sync::Arc;
use tracing::{debug, info};

/// Text plus the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    pub text: String,
    pub source: GenerationSource,
}

/// Composes a primary (remote) and a fallback (local) generator.
///
/// The primary is tried exactly once per call. If it is unavailable or returns
/// empty text, the fallback is tried exactly once. There is no retry loop.
pub struct GeneratorFacade {
    primary: Arc<dyn TextGenerator>,
    fallback: Arc<dyn TextGenerator>,
}

impl GeneratorFacade {
    pub fn new(primary: Arc<dyn TextGenerator>, fallback: Arc<dyn TextGenerator>) -> Self {
        Self { primary, fallback }
    }

    /// Replace the fallback slot with any conforming generator.
    pub fn with_fallback(mut self, fallback: Arc<dyn TextGenerator>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Generate one text.
    ///
    /// Fails only when the fallback itself yields no text, which the built-in
    /// local generator never does.
    pub async fn generate(
        &self,
        params: &GenerationParams,
    ) -> Result<GeneratedText, GenerationError> {
        let primary = self.primary.generate(params).await;
        if let Some(text) = primary.into_text() {
            debug!(generator = self.primary.name(), "Primary generator succeeded");
            return Ok(GeneratedText {
                text,
                source: GenerationSource::Remote,
            });
        }

        info!(
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            "Primary generator unavailable, using fallback"
        );
        let reason = match self.fallback.generate(params).await {
            Generation::Text(text) if !text.is_empty() => {
                return Ok(GeneratedText {
                    text,
                    source: GenerationSource::Local,
                })
            }
            Generation::Text(_) => "empty text".to_string(),
            Generation::Unavailable(reason) => reason,
        };
        Err(GenerationError::FallbackUnavailable {
            generator: self.fallback.name().to_string(),
            reason,
        })
    }
}
