//! Pipeline orchestration: generate -> store -> verify, one index at a time.
//!
//! Items are processed strictly in index order. A storage, verification or
//! ledger failure aborts the remaining indices; outcomes recorded before the
//! failure are kept in the report and nothing already on disk is rolled back.

use crate::config::TextmintConfig;
use crate::error::{AppError, PipelineError};
use crate::generator::{GenerationParams, GeneratorFacade, RemoteGenerator};
use crate::integrity::IntegrityVerifier;
use crate::ledger::Ledger;
use crate::provider::ProviderFactory;
use crate::store::OutputStore;
use crate::types::{
    GeneratedItem, GenerationRequest, GenerationSource, IntegrityRecord, StoredArtifact,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Integrity outcome for one stored artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IntegrityStatus {
    /// Hashing is turned off for this run.
    Disabled,
    Recorded { record: IntegrityRecord },
    /// The artifact is on disk but has no digest.
    Failed { error: String },
}

/// Per-item result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub index: usize,
    pub source: GenerationSource,
    pub artifact: StoredArtifact,
    pub integrity: IntegrityStatus,
    /// Generated text; kept for previews, not serialized.
    #[serde(skip)]
    pub text: String,
}

impl ItemOutcome {
    pub fn integrity_record(&self) -> Option<&IntegrityRecord> {
        match &self.integrity {
            IntegrityStatus::Recorded { record } => Some(record),
            _ => None,
        }
    }
}

/// Accumulated result of a run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub outcomes: Vec<ItemOutcome>,
    /// Set when the run stopped early.
    pub failure: Option<PipelineError>,
}

impl PipelineReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Indices that were generated, stored and (if enabled) verified.
    pub fn succeeded_indices(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|o| !matches!(o.integrity, IntegrityStatus::Failed { .. }))
            .map(|o| o.index)
            .collect()
    }

    pub fn count_by_source(&self, source: GenerationSource) -> usize {
        self.outcomes.iter().filter(|o| o.source == source).count()
    }

    /// Artifacts in index order.
    pub fn artifacts(&self) -> impl Iterator<Item = &StoredArtifact> {
        self.outcomes.iter().map(|o| &o.artifact)
    }

    /// Turn an aborted report into its error, dropping the partial outcomes.
    pub fn into_result(self) -> Result<Vec<ItemOutcome>, PipelineError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.outcomes),
        }
    }
}

/// Wires generation, storage, verification and the optional ledger.
pub struct Pipeline {
    generator: GeneratorFacade,
    store: OutputStore,
    verifier: Option<IntegrityVerifier>,
    ledger: Option<Ledger>,
}

impl Pipeline {
    /// `verifier: None` disables hashing.
    pub fn new(
        generator: GeneratorFacade,
        store: OutputStore,
        verifier: Option<IntegrityVerifier>,
    ) -> Self {
        Self {
            generator,
            store,
            verifier,
            ledger: None,
        }
    }

    /// Assemble a pipeline from configuration.
    ///
    /// A provider that cannot be set up (no API key, bad endpoint) does not
    /// fail the build: the remote slot becomes unconfigured and every item
    /// falls back to the local generator.
    pub fn from_config(config: &TextmintConfig) -> Result<Self, AppError> {
        let generation = &config.generation;
        let provider = &config.provider;

        let remote = match provider.resolve(&generation.model) {
            Ok(Some(model_provider)) => {
                match ProviderFactory::create_client(&model_provider, provider.timeouts()) {
                    Ok(client) => RemoteGenerator::new(Arc::from(client)),
                    Err(e) => {
                        warn!(error = %e, "Remote provider unusable, local generation only");
                        RemoteGenerator::unconfigured(e.to_string())
                    }
                }
            }
            Ok(None) => RemoteGenerator::unconfigured("remote provider disabled"),
            Err(e) => {
                warn!(error = %e, "Remote provider not configured, local generation only");
                RemoteGenerator::unconfigured(e.to_string())
            }
        }
        .with_default_temperature(generation.temperature);

        let facade = GeneratorFacade::new(Arc::new(remote), Arc::new(config.local.build()));
        let verifier = if generation.hashing_enabled {
            Some(IntegrityVerifier::new(config.integrity.chunk_size)?)
        } else {
            None
        };

        let mut pipeline = Self::new(facade, config.output_store(), verifier);
        if let Some(ledger) = config.ledger.build() {
            pipeline = pipeline.with_ledger(ledger);
        }
        Ok(pipeline)
    }

    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn hashing_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    /// Run every index in `[0, count)`.
    pub async fn run(&self, request: &GenerationRequest) -> PipelineReport {
        info!(
            count = request.count(),
            char_length = request.char_length(),
            model = request.model(),
            output_dir = %request.output_dir().display(),
            hashing = self.hashing_enabled(),
            "Pipeline starting"
        );

        let params = GenerationParams::new(request.char_length())
            .with_model(request.model())
            .with_temperature(request.temperature());

        let mut report = PipelineReport::default();
        for index in 0..request.count() {
            if let Err(err) = self.step(index, &params, request, &mut report).await {
                error!(index, error = %err, "Pipeline aborted");
                report.failure = Some(err);
                break;
            }
        }

        info!(
            processed = report.outcomes.len(),
            remote = report.count_by_source(GenerationSource::Remote),
            local = report.count_by_source(GenerationSource::Local),
            success = report.is_success(),
            "Pipeline finished"
        );
        report
    }

    async fn step(
        &self,
        index: usize,
        params: &GenerationParams,
        request: &GenerationRequest,
        report: &mut PipelineReport,
    ) -> Result<(), PipelineError> {
        let generated = self
            .generator
            .generate(params)
            .await
            .map_err(|source| PipelineError::FallbackUnavailable { index, source })?;
        let item = GeneratedItem {
            index,
            text: generated.text,
            source: generated.source,
        };

        let artifact = self
            .store
            .store(&item, request.output_dir())
            .map_err(|source| PipelineError::Storage { index, source })?;

        let (integrity, verify_err) = match &self.verifier {
            None => (IntegrityStatus::Disabled, None),
            Some(verifier) => match verifier.verify(&artifact) {
                Ok(record) => (IntegrityStatus::Recorded { record }, None),
                Err(e) => {
                    warn!(index, path = %artifact.path.display(), error = %e, "Artifact stored without digest");
                    (
                        IntegrityStatus::Failed {
                            error: e.to_string(),
                        },
                        Some(e),
                    )
                }
            },
        };

        info!(
            index,
            source = %item.source,
            path = %artifact.path.display(),
            bytes = artifact.bytes_written,
            "Item processed"
        );

        report.outcomes.push(ItemOutcome {
            index,
            source: item.source,
            artifact: artifact.clone(),
            integrity,
            text: item.text.clone(),
        });

        if let Some(source) = verify_err {
            return Err(PipelineError::Verification {
                index,
                artifact: artifact.path,
                source,
            });
        }

        if let Some(ref ledger) = self.ledger {
            let record = report.outcomes.last().and_then(ItemOutcome::integrity_record);
            ledger
                .append(&item, &artifact, record)
                .map_err(|source| PipelineError::Ledger { index, source })?;
        }

        Ok(())
    }
}
