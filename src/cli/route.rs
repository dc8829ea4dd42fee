//! CLI route: single route table and run context. Dispatches to library services and presentation.

use crate::cli::parse::{Commands, OutputFormat, RunArgs};
use crate::cli::presentation::{format_report_json, format_report_text, format_verify_results};
use crate::config::{ConfigLoader, ProviderKind, TextmintConfig};
use crate::error::AppError;
use crate::integrity::IntegrityVerifier;
use crate::pipeline::Pipeline;
use std::path::{Path, PathBuf};
use tracing::info;

/// Rendered command result. `success == false` maps to a non-zero exit code
/// while still printing `text` (e.g. a partially completed run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: TextmintConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, AppError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn from_config(workspace_root: PathBuf, config: TextmintConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &TextmintConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, AppError> {
        match command {
            Commands::Run(args) => self.handle_run(args),
            Commands::Hash { file, chunk_size } => self.handle_hash(file, *chunk_size),
            Commands::Verify { artifacts } => self.handle_verify(artifacts),
            Commands::Config => self.handle_config(),
        }
    }

    /// Effective configuration for a run: loaded config plus CLI overrides,
    /// with relative output paths resolved against the workspace.
    pub fn run_config(&self, args: &RunArgs) -> Result<TextmintConfig, AppError> {
        let mut config = self.config.clone();
        let generation = &mut config.generation;
        if let Some(count) = args.count {
            generation.count = count;
        }
        if let Some(char_length) = args.char_length {
            generation.char_length = char_length;
        }
        if let Some(ref model) = args.model {
            generation.model = model.clone();
        }
        if let Some(temperature) = args.temperature {
            generation.temperature = temperature;
        }
        if let Some(ref output_dir) = args.output_dir {
            generation.output_dir = output_dir.clone();
        }
        if args.no_hash {
            generation.hashing_enabled = false;
        }
        if generation.output_dir.is_relative() {
            generation.output_dir = self.workspace_root.join(&generation.output_dir);
        }
        if config.ledger.path.is_relative() {
            config.ledger.path = self.workspace_root.join(&config.ledger.path);
        }
        if let Some(seed) = args.seed {
            config.local.seed = Some(seed);
        }
        if args.offline {
            config.provider.kind = ProviderKind::None;
        }
        config.validated()
    }

    fn handle_run(&self, args: &RunArgs) -> Result<CommandOutput, AppError> {
        let config = self.run_config(args)?;
        let request = config.request()?;
        let pipeline = Pipeline::from_config(&config)?;

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| AppError::Runtime(format!("Failed to create runtime: {}", e)))?;
        let report = rt.block_on(pipeline.run(&request));

        let text = match args.format {
            OutputFormat::Text => format_report_text(&report),
            OutputFormat::Json => format_report_json(&report)?,
        };
        Ok(CommandOutput {
            text,
            success: report.is_success(),
        })
    }

    fn handle_hash(&self, file: &Path, chunk_size: Option<usize>) -> Result<CommandOutput, AppError> {
        let verifier =
            IntegrityVerifier::new(chunk_size.unwrap_or(self.config.integrity.chunk_size))?;
        let digest = verifier.digest_file(file)?;
        info!(path = %file.display(), digest = %digest, "File hashed");
        Ok(CommandOutput::ok(format!("{}  {}", digest, file.display())))
    }

    fn handle_verify(&self, artifacts: &[PathBuf]) -> Result<CommandOutput, AppError> {
        let verifier = IntegrityVerifier::new(self.config.integrity.chunk_size)?;
        let results: Vec<_> = artifacts
            .iter()
            .map(|path| (path.clone(), verifier.check(path)))
            .collect();
        let success = results.iter().all(|(_, r)| r.is_ok());
        Ok(CommandOutput {
            text: format_verify_results(&results),
            success,
        })
    }

    fn handle_config(&self) -> Result<CommandOutput, AppError> {
        let text = toml::to_string_pretty(&self.config)
            .map_err(|e| AppError::Config(format!("Failed to render configuration: {}", e)))?;
        Ok(CommandOutput::ok(text))
    }
}
