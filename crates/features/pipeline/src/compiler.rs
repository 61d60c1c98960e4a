use crate::error::PipelineError;
use crate::process::{RunError, run_bounded};
use crate::scratch::ScratchSpace;
use std::path::Path;
use std::time::Duration;
use tforge_domain::config::CompilerConfig;
use tracing::{debug, instrument};

/// Michelson code and initial storage produced by the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledContract {
    pub code: String,
    pub storage: String,
}

/// Runs the SmartPy scenario and collects its output artifacts.
#[derive(Debug, Clone)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    #[must_use]
    pub const fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// `program args… contract_<id>.py` inside the scratch directory, then reads
    /// `<id>/<contract_artifact>` and `<id>/<storage_artifact>`.
    ///
    /// # Errors
    /// * [`PipelineError::Compile`] when the compiler cannot start, exits non-zero or leaves
    ///   an artifact missing.
    /// * [`PipelineError::Timeout`] when it runs past the configured limit.
    #[instrument(skip_all, fields(contract_id = %contract_id))]
    pub async fn compile(
        &self,
        scratch: &ScratchSpace,
        contract_id: &str,
    ) -> Result<CompiledContract, PipelineError> {
        let file_name = scratch
            .source_path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| PipelineError::from("scratch source path has no file name"))?;

        let mut args = self.config.args.clone();
        args.push(file_name);

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = match run_bounded(&self.config.program, &args, scratch.path(), timeout).await {
            Ok(output) => output,
            Err(RunError::Launch(err)) => {
                return Err(PipelineError::Compile {
                    message: format!("failed to start {}: {err}", self.config.program).into(),
                    context: None,
                });
            },
            Err(RunError::TimedOut) => {
                return Err(PipelineError::Timeout {
                    stage: "compiler".into(),
                    secs: self.config.timeout_secs,
                    context: None,
                });
            },
        };

        if !output.success() {
            let code = output.code.map_or_else(|| "signal".to_owned(), |c| c.to_string());
            return Err(PipelineError::Compile {
                message: format!("exit {code}: {}", output.last_line()).into(),
                context: None,
            });
        }

        let out_dir = scratch.path().join(contract_id);
        let code = read_artifact(&out_dir, &self.config.contract_artifact).await?;
        let storage = read_artifact(&out_dir, &self.config.storage_artifact).await?;

        debug!(code_bytes = code.len(), storage_bytes = storage.len(), "Compiled contract");
        Ok(CompiledContract { code, storage })
    }
}

async fn read_artifact(dir: &Path, name: &str) -> Result<String, PipelineError> {
    let text = tokio::fs::read_to_string(dir.join(name)).await.map_err(|err| {
        PipelineError::Compile {
            message: format!("missing artifact {name}: {err}").into(),
            context: None,
        }
    })?;
    Ok(text.trim_end().to_owned())
}
