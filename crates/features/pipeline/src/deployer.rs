use crate::compiler::CompiledContract;
use crate::error::PipelineError;
use crate::process::{ProcessOutput, RunError, run_bounded};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use strum_macros::IntoStaticStr;
use tforge_domain::config::DeployerConfig;
use tforge_domain::constants::{BASE58_ALPHABET, ORIGINATED_ADDRESS_PREFIX};
use tracing::{info, instrument, warn};

/// How a finished deployer run ended.
///
/// Only [`DeployOutcome::Deployed`] carries an address; the other variants classify why
/// there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, IntoStaticStr)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeployOutcome {
    Deployed { address: String },
    /// The deployer exited non-zero without reporting an origination.
    Rejected { exit_code: i32 },
    /// The deployer was killed by a signal.
    Terminated,
    /// Clean exit, but no marker in the output.
    MarkerMissing,
    /// The marker was followed by something that is not a contract address.
    MalformedAddress,
}

impl DeployOutcome {
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Deployed { address } => Some(address),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

/// The `address_len` characters following the first `marker`, if that many exist.
#[must_use]
pub fn extract_address<'a>(output: &'a str, marker: &str, address_len: usize) -> Option<&'a str> {
    let start = output.find(marker)? + marker.len();
    let rest = &output[start..];
    let end = rest.char_indices().nth(address_len).map_or(rest.len(), |(i, _)| i);
    let candidate = &rest[..end];
    (candidate.chars().count() == address_len).then_some(candidate)
}

/// `KT1` followed by base58 characters only.
#[must_use]
pub fn is_originated_address(candidate: &str) -> bool {
    candidate.strip_prefix(ORIGINATED_ADDRESS_PREFIX).is_some_and(|rest| {
        !rest.is_empty() && rest.chars().all(|c| BASE58_ALPHABET.contains(c))
    })
}

/// Classifies a deployer run from its exit status and combined output.
#[must_use]
pub fn classify(output: &ProcessOutput, marker: &str, address_len: usize) -> DeployOutcome {
    let combined = output.combined();
    if combined.contains(marker) {
        return match extract_address(&combined, marker, address_len) {
            Some(address) if is_originated_address(address) => {
                DeployOutcome::Deployed { address: address.to_owned() }
            },
            _ => DeployOutcome::MalformedAddress,
        };
    }

    match output.code {
        Some(0) => DeployOutcome::MarkerMissing,
        Some(exit_code) => DeployOutcome::Rejected { exit_code },
        None => DeployOutcome::Terminated,
    }
}

/// Originates compiled contracts through the deployment CLI.
#[derive(Debug, Clone)]
pub struct Deployer {
    config: DeployerConfig,
}

impl Deployer {
    #[must_use]
    pub const fn new(config: DeployerConfig) -> Self {
        Self { config }
    }

    /// Argument vector after the program name.
    #[must_use]
    pub fn arguments(&self, contract_id: &str, owner: &str, compiled: &CompiledContract) -> Vec<String> {
        let mut args = self.config.args.clone();
        args.extend(
            [
                "originate",
                "contract",
                contract_id,
                "transferring",
                self.config.transfer_amount.as_str(),
                "from",
                owner,
                "running",
                compiled.code.as_str(),
                "--init",
                compiled.storage.as_str(),
                "--burn-cap",
                self.config.burn_cap.as_str(),
            ]
            .map(str::to_owned),
        );
        args
    }

    /// Runs the deployer once. Every finished run yields an outcome, even a failed one.
    ///
    /// # Errors
    /// * [`PipelineError::DeployLaunch`] when the program cannot be started.
    /// * [`PipelineError::Timeout`] when it runs past the configured limit.
    #[instrument(skip_all, fields(contract_id = %contract_id))]
    pub async fn deploy(
        &self,
        cwd: &Path,
        contract_id: &str,
        owner: &str,
        compiled: &CompiledContract,
    ) -> Result<DeployOutcome, PipelineError> {
        let args = self.arguments(contract_id, owner, compiled);
        let timeout = Duration::from_secs(self.config.timeout_secs);

        let output = match run_bounded(&self.config.program, &args, cwd, timeout).await {
            Ok(output) => output,
            Err(RunError::Launch(err)) => {
                return Err(PipelineError::DeployLaunch {
                    message: format!("{}: {err}", self.config.program).into(),
                    context: None,
                });
            },
            Err(RunError::TimedOut) => {
                return Err(PipelineError::Timeout {
                    stage: "deployer".into(),
                    secs: self.config.timeout_secs,
                    context: None,
                });
            },
        };

        let outcome = classify(&output, &self.config.marker, self.config.address_len);
        match &outcome {
            DeployOutcome::Deployed { address } => info!(%address, "Contract originated"),
            other => warn!(
                outcome = other.label(),
                exit_code = ?output.code,
                detail = output.last_line(),
                "Deployment produced no address"
            ),
        }

        Ok(outcome)
    }
}
