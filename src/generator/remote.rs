//! Remote generator backed by a chat-completion provider.

use super::{Generation, GenerationParams, TextGenerator};
use crate::provider::{ChatMessage, CompletionOptions, ModelProviderClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are an assistant that returns a single short creative text \
     fragment. Produce one paragraph of imaginative text, roughly the requested length. \
     No lists or code, just plain text.";

/// Token budget for a completion of roughly `char_length` characters.
pub fn max_tokens_for(char_length: usize) -> u32 {
    let estimate = (char_length as f64 / 3.5) as u32;
    estimate.saturating_add(20).max(16)
}

fn user_prompt(char_length: usize) -> String {
    format!(
        "Please write a random text of about {} characters.",
        char_length
    )
}

enum Backend {
    Client(Arc<dyn ModelProviderClient>),
    Unconfigured(String),
}

/// Calls a remote provider once per request and reports failures as
/// [`Generation::Unavailable`] instead of returning an error.
pub struct RemoteGenerator {
    backend: Backend,
    default_temperature: Option<f32>,
}

impl RemoteGenerator {
    pub fn new(client: Arc<dyn ModelProviderClient>) -> Self {
        Self {
            backend: Backend::Client(client),
            default_temperature: None,
        }
    }

    /// A generator that has no usable backend (e.g. missing API key). Every
    /// call is unavailable and no network traffic happens.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unconfigured(reason.into()),
            default_temperature: None,
        }
    }

    /// Temperature used when a call does not specify one.
    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = Some(temperature);
        self
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.backend, Backend::Client(_))
    }
}

#[async_trait]
impl TextGenerator for RemoteGenerator {
    async fn generate(&self, params: &GenerationParams) -> Generation {
        let client = match &self.backend {
            Backend::Client(client) => client,
            Backend::Unconfigured(reason) => {
                debug!(reason = %reason, "Remote generator unconfigured");
                return Generation::Unavailable(reason.clone());
            }
        };

        let options = CompletionOptions {
            model: params.model.clone(),
            temperature: params.temperature.or(self.default_temperature),
            max_tokens: Some(max_tokens_for(params.char_length)),
            ..CompletionOptions::default()
        };
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt(params.char_length)),
        ];

        match client.complete(messages, options).await {
            Ok(response) => {
                let trimmed = response.content.trim();
                if trimmed.is_empty() {
                    warn!(provider = client.provider_name(), "Remote returned empty completion");
                    return Generation::Unavailable("empty completion".to_string());
                }
                let text: String = trimmed.chars().take(params.char_length).collect();
                debug!(
                    provider = client.provider_name(),
                    model = %response.model,
                    finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
                    chars = text.chars().count(),
                    "Remote completion received"
                );
                Generation::Text(text)
            }
            Err(e) => {
                warn!(provider = client.provider_name(), error = %e, "Remote generation unavailable");
                Generation::Unavailable(e.to_string())
            }
        }
    }

    fn name(&self) -> &str {
        match &self.backend {
            Backend::Client(client) => client.provider_name(),
            Backend::Unconfigured(_) => "remote",
        }
    }
}
