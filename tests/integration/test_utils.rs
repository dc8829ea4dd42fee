//! Shared generator doubles for integration tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use textmint::generator::{
    Generation, GenerationParams, GeneratorFacade, LocalGenerator, LocalPool, TextGenerator,
};

/// Remote stand-in that never produces text.
pub struct OfflineRemote {
    calls: AtomicUsize,
}

impl OfflineRemote {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for OfflineRemote {
    async fn generate(&self, _params: &GenerationParams) -> Generation {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Generation::Unavailable("connection refused".to_string())
    }

    fn name(&self) -> &str {
        "offline-remote"
    }
}

/// Remote stand-in that echoes a fixed sentence cut to the requested length.
pub struct FixedRemote(pub String);

#[async_trait]
impl TextGenerator for FixedRemote {
    async fn generate(&self, params: &GenerationParams) -> Generation {
        Generation::Text(self.0.chars().take(params.char_length).collect())
    }

    fn name(&self) -> &str {
        "fixed-remote"
    }
}

/// Fallback stand-in that also fails.
pub struct BrokenLocal;

#[async_trait]
impl TextGenerator for BrokenLocal {
    async fn generate(&self, _params: &GenerationParams) -> Generation {
        Generation::Unavailable("pool exhausted".to_string())
    }

    fn name(&self) -> &str {
        "broken-local"
    }
}

pub fn seeded_local(seed: u64) -> Arc<dyn TextGenerator> {
    Arc::new(LocalGenerator::seeded(LocalPool::words(), seed))
}

pub fn facade(primary: Arc<dyn TextGenerator>, fallback: Arc<dyn TextGenerator>) -> GeneratorFacade {
    GeneratorFacade::new(primary, fallback)
}
