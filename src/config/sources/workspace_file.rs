//! Workspace config file source: textmint.toml and config/{env}.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

/// Add workspace config files to builder.
/// Precedence: textmint.toml (base) then config/{TEXTMINT_ENV}.toml (env-specific).
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let base_config_path = workspace_root.join("textmint.toml");
    if base_config_path.is_file() {
        builder = builder.add_source(File::from(base_config_path).format(FileFormat::Toml));
    }

    if let Ok(env_name) = std::env::var("TEXTMINT_ENV") {
        let env_config_path = workspace_root
            .join("config")
            .join(format!("{}.toml", env_name));
        if env_config_path.is_file() {
            builder = builder.add_source(File::from(env_config_path).format(FileFormat::Toml));
        }
    }

    Ok(builder)
}
