//! Local randomized text generator. Never fails, needs no network.

use super::{Generation, GenerationParams, TextGenerator};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Words used by the default pool.
pub const DEFAULT_WORD_POOL: &[&str] = &[
    "ember", "silk", "cobalt", "whisper", "lantern", "hollow", "glimmer", "marble", "quartz",
    "ripple", "velvet", "arbor", "lumen", "willow", "bramble", "cinder",
];

/// Characters used by the alphabet pool unless configured otherwise.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ .,;:!?'-";

/// What the local generator draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalPool {
    /// Space-separated random words, truncated to the requested length.
    Words(Vec<String>),
    /// Independent random characters.
    Alphabet(Vec<char>),
}

impl LocalPool {
    pub fn words() -> Self {
        LocalPool::Words(DEFAULT_WORD_POOL.iter().map(|w| w.to_string()).collect())
    }

    pub fn alphabet(chars: &str) -> Self {
        LocalPool::Alphabet(chars.chars().collect())
    }

    fn is_empty(&self) -> bool {
        match self {
            LocalPool::Words(words) => words.iter().all(|w| w.is_empty()),
            LocalPool::Alphabet(chars) => chars.is_empty(),
        }
    }
}

impl Default for LocalPool {
    fn default() -> Self {
        Self::words()
    }
}

/// Produces exactly `char_length` characters from its pool.
pub struct LocalGenerator {
    pool: LocalPool,
    rng: Mutex<StdRng>,
}

impl LocalGenerator {
    /// Entropy-seeded generator. An empty pool falls back to the default words.
    pub fn new(pool: LocalPool) -> Self {
        Self::with_rng(pool, StdRng::from_entropy())
    }

    /// Seeded generator for reproducible output.
    pub fn seeded(pool: LocalPool, seed: u64) -> Self {
        Self::with_rng(pool, StdRng::seed_from_u64(seed))
    }

    fn with_rng(pool: LocalPool, rng: StdRng) -> Self {
        let pool = if pool.is_empty() { LocalPool::words() } else { pool };
        Self {
            pool,
            rng: Mutex::new(rng),
        }
    }

    pub fn pool(&self) -> &LocalPool {
        &self.pool
    }

    /// Synchronous core used by the trait impl.
    pub fn generate_text(&self, char_length: usize) -> String {
        let mut rng = self.rng.lock();
        match &self.pool {
            LocalPool::Alphabet(chars) => (0..char_length)
                .map(|_| chars[rng.gen_range(0..chars.len())])
                .collect(),
            LocalPool::Words(words) => {
                let words: Vec<&str> = words
                    .iter()
                    .map(String::as_str)
                    .filter(|w| !w.is_empty())
                    .collect();
                let mut text = String::with_capacity(char_length + 16);
                let mut produced = 0;
                while produced < char_length {
                    if produced > 0 {
                        text.push(' ');
                        produced += 1;
                    }
                    if let Some(word) = words.choose(&mut *rng) {
                        text.push_str(word);
                        produced += word.chars().count();
                    }
                }
                text.chars().take(char_length).collect()
            }
        }
    }
}

impl Default for LocalGenerator {
    fn default() -> Self {
        Self::new(LocalPool::default())
    }
}

#[async_trait]
impl TextGenerator for LocalGenerator {
    async fn generate(&self, params: &GenerationParams) -> Generation {
        Generation::Text(self.generate_text(params.char_length))
    }

    fn name(&self) -> &str {
        "local"
    }
}
