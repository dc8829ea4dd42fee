//! Configuration loading: builds a TextmintConfig from layered sources.

use super::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::TextmintConfig;
use crate::error::AppError;
use config::{File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Loads configuration from defaults, files and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `textmint.toml`, `config/{TEXTMINT_ENV}.toml`, environment.
    pub fn load(workspace_root: &Path) -> Result<TextmintConfig, AppError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: TextmintConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from a single file, still honouring environment overrides.
    pub fn load_from_file(path: &Path) -> Result<TextmintConfig, AppError> {
        if !path.is_file() {
            return Err(AppError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).format(FileFormat::Toml));
        let builder = environment::add_to_builder(builder);

        let config: TextmintConfig = builder.build()?.try_deserialize()?;
        debug!(path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }
}
