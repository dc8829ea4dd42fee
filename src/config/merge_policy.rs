//! Merge rules: defaults applied before any file or environment source.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with merge policy defaults applied.
///
/// Only keys whose absence would change behaviour across sources are pinned
/// here; everything else falls back to the serde defaults on the structs.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("generation.count", 1)?
        .set_default("generation.hashing_enabled", true)?
        .set_default("generation.output_dir", "output")?
        .set_default("provider.kind", "openai")
}
