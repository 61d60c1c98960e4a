//! Build pipeline: persists a generated contract, compiles it, originates it and reports
//! the deployed address.
//!
//! Each run moves through `Persisted → Compiled → Deployed` and stops at the first
//! unrecoverable error. The scratch directory is removed on every exit path.

pub mod compiler;
pub mod deployer;
mod error;
pub mod process;
pub mod scratch;

pub use crate::compiler::{CompiledContract, Compiler};
pub use crate::deployer::{DeployOutcome, Deployer, extract_address};
pub use crate::error::{PipelineError, PipelineErrorExt};
pub use crate::scratch::ScratchSpace;

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tforge_composer::GeneratedArtifact;
use tforge_domain::config::ToolchainConfig;
use tokio::sync::Semaphore;
use tracing::{info, instrument};

/// Result of a pipeline run that reached the deployer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub contract_id: String,
    pub fingerprint: String,
    #[serde(flatten)]
    pub outcome: DeployOutcome,
}

#[derive(Debug)]
pub struct Pipeline {
    scratch_root: PathBuf,
    stale_after: Duration,
    compiler: Compiler,
    deployer: Deployer,
    permits: Arc<Semaphore>,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: &ToolchainConfig) -> Self {
        Self {
            scratch_root: config.scratch_dir.clone(),
            stale_after: Duration::from_secs(config.stale_after_secs),
            compiler: Compiler::new(config.compiler.clone()),
            deployer: Deployer::new(config.deployer.clone()),
            permits: Arc::new(Semaphore::new(
                config.max_concurrent_builds.clamp(1, Semaphore::MAX_PERMITS),
            )),
        }
    }

    /// Removes scratch directories left by a previous process.
    ///
    /// # Errors
    /// [`PipelineError::Persist`] if the scratch root cannot be listed.
    pub fn sweep_stale(&self) -> Result<usize, PipelineError> {
        let removed = scratch::sweep_stale(&self.scratch_root, self.stale_after)?;
        if removed > 0 {
            info!(removed, root = %self.scratch_root.display(), "Swept stale scratch directories");
        }
        Ok(removed)
    }

    /// Stops handing out build slots; queued and future runs fail with [`PipelineError::Busy`].
    pub fn close(&self) {
        self.permits.close();
    }

    #[must_use]
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }

    /// Persists, compiles and deploys `artifact`, originating from `owner`.
    ///
    /// # Errors
    /// * [`PipelineError::Internal`] for an artifact id that is not a contract id.
    /// * [`PipelineError::Busy`] once the pipeline is closed.
    /// * [`PipelineError::Persist`], [`PipelineError::Compile`],
    ///   [`PipelineError::DeployLaunch`] and [`PipelineError::Timeout`] per stage.
    #[instrument(skip_all, fields(contract_id = %artifact.contract_id))]
    pub async fn run(
        &self,
        artifact: &GeneratedArtifact,
        owner: &str,
    ) -> Result<DeployReport, PipelineError> {
        if !tforge_kernel::is_contract_id(&artifact.contract_id) {
            return Err(PipelineError::from(format!(
                "refusing to build with contract id {:?}",
                artifact.contract_id
            )));
        }

        let _permit = self.permits.acquire().await.map_err(|_| PipelineError::Busy {
            message: "pipeline is shutting down".into(),
            context: None,
        })?;

        let scratch = ScratchSpace::persist(&self.scratch_root, artifact)?;
        let compiled = self.compiler.compile(&scratch, &artifact.contract_id).await?;
        let outcome =
            self.deployer.deploy(scratch.path(), &artifact.contract_id, owner, &compiled).await?;
        scratch.release();

        Ok(DeployReport {
            contract_id: artifact.contract_id.clone(),
            fingerprint: artifact.fingerprint.clone(),
            outcome,
        })
    }
}
