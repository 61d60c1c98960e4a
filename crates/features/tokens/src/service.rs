use crate::error::TokensError;
use tforge_composer::{Composer, FeatureSelection, GeneratedArtifact, RawSelection};
use tforge_domain::config::ApiConfig;
use tforge_kernel::safe_nanoid;
use tforge_pipeline::{DeployReport, Pipeline};
use tracing::{info, instrument};

/// Validates selections, composes contract sources and drives the build pipeline.
#[derive(Debug)]
pub struct TokenService {
    composer: Composer,
    pipeline: Pipeline,
}

impl TokenService {
    /// # Errors
    /// [`TokensError::Compose`] if the contract template cannot be loaded.
    pub fn new(config: &ApiConfig) -> Result<Self, TokensError> {
        Ok(Self {
            composer: Composer::new(config.template.metadata_url.as_str())?,
            pipeline: Pipeline::new(&config.toolchain),
        })
    }

    #[must_use]
    pub const fn from_parts(composer: Composer, pipeline: Pipeline) -> Self {
        Self { composer, pipeline }
    }

    #[must_use]
    pub const fn composer(&self) -> &Composer {
        &self.composer
    }

    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Validates `raw` and renders its contract under a fresh contract id.
    ///
    /// # Errors
    /// [`TokensError::Compose`] for an invalid selection or an unsound composition.
    pub fn generate(
        &self,
        raw: RawSelection,
    ) -> Result<(FeatureSelection, GeneratedArtifact), TokensError> {
        let selection = FeatureSelection::try_from(raw)?;
        let artifact = self.composer.compose(&selection, &safe_nanoid!())?;
        Ok((selection, artifact))
    }

    /// Generates, compiles and deploys one token contract.
    ///
    /// # Errors
    /// [`TokensError::Compose`] before anything touches disk, [`TokensError::Pipeline`]
    /// for any build failure. A finished deployment without an address is not an error.
    #[instrument(skip_all, fields(token = %raw.symbol.trim()))]
    pub async fn create(&self, raw: RawSelection) -> Result<DeployReport, TokensError> {
        let (selection, artifact) = self.generate(raw)?;
        let report = self.pipeline.run(&artifact, selection.initial_owner()).await?;

        info!(
            contract_id = %report.contract_id,
            outcome = report.outcome.label(),
            address = ?report.outcome.address(),
            "Token request finished"
        );

        Ok(report)
    }
}
