//! # TokenForge CLI
//!
//! Operator commands over the same composer and pipeline the server uses:
//! `plan` prints the resolved capability order, `render` emits the contract source and
//! `deploy` runs the full build pipeline.

pub mod args;

use crate::args::{Cli, Commands, TokenArgs};
use anyhow::{Context, Result, anyhow};
use std::fmt::Write as _;
use std::path::Path;
use tforge::composer::{RawSelection, Resolver};
use tforge::domain::capabilities::CapabilitySet;
use tforge::domain::config::ApiConfig;
use tforge::features::tokens::TokenService;
use tforge::kernel::config::load_config;
use tracing::info;

impl From<TokenArgs> for RawSelection {
    fn from(args: TokenArgs) -> Self {
        Self {
            token_name: args.name,
            symbol: args.symbol,
            initial_supply: args.supply,
            decimals: args.decimals,
            initial_owner: args.owner,
            can_mint: args.mint,
            can_pause: args.pause,
            blacklist: args.blacklist,
            burn: args.burn,
            icon: args.icon,
        }
    }
}

/// Executes a parsed command and returns what should be printed.
///
/// # Errors
/// Configuration, validation, composition and pipeline failures.
pub async fn execute(cli: Cli) -> Result<String> {
    match cli.command {
        Commands::Plan { features, json } => plan(&features, json),
        Commands::Render { token, output } => {
            let service = TokenService::new(&config(cli.config.as_deref())?)?;
            render(&service, token, output.as_deref())
        },
        Commands::Deploy { token } => {
            let service = TokenService::new(&config(cli.config.as_deref())?)?;
            let report = service.create(token.into()).await?;
            Ok(serde_json::to_string_pretty(&report)?)
        },
    }
}

fn config(path: Option<&Path>) -> Result<ApiConfig> {
    load_config(path).context("Configuration is malformed")
}

/// Composition plan for the mandatory capabilities plus `features`.
///
/// # Errors
/// Unknown capability names and unsound combinations.
pub fn plan(features: &[String], json: bool) -> Result<String> {
    let mut set = CapabilitySet::MANDATORY;
    for name in features {
        set |= CapabilitySet::try_from(name.as_str()).map_err(|e| anyhow!(e))?;
    }

    let plan = Resolver::default().resolve_capabilities(set)?;
    if json { Ok(serde_json::to_string_pretty(&plan)?) } else { Ok(plan.to_string()) }
}

/// Renders the contract; with `output` the source goes to that file and a summary is returned.
///
/// # Errors
/// Validation failures and file write errors.
pub fn render(service: &TokenService, token: TokenArgs, output: Option<&Path>) -> Result<String> {
    let (_, artifact) = service.generate(token.into())?;

    let Some(path) = output else {
        return Ok(artifact.source);
    };

    std::fs::write(path, &artifact.source)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), contract_id = %artifact.contract_id, "Wrote contract source");

    let mut summary = String::new();
    writeln!(summary, "contract_id: {}", artifact.contract_id)?;
    writeln!(summary, "fingerprint: {}", artifact.fingerprint)?;
    write!(summary, "written to:  {}", path.display())?;
    Ok(summary)
}
