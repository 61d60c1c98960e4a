//! Command-line interface of the `tforge` operator tool.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Generate, inspect and deploy FA1.2 token contracts")]
pub struct Cli {
    /// Configuration file (defaults to ./tforge.{toml,yaml,json} when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directives, e.g. `tforge_pipeline=debug`
    #[arg(long, global = true, default_value = "warn")]
    pub log: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the composition plan for a capability selection
    Plan {
        /// Optional capabilities: mint, pause, burn, blacklist
        #[arg(short = 'f', long = "features", value_delimiter = ',')]
        features: Vec<String>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the contract source for a token
    Render {
        #[command(flatten)]
        token: TokenArgs,

        /// Write the source here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render, compile and originate a token contract
    Deploy {
        #[command(flatten)]
        token: TokenArgs,
    },
}

#[derive(Debug, Clone, Args)]
pub struct TokenArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub symbol: String,
    #[arg(long)]
    pub supply: u64,
    #[arg(long, default_value_t = 6)]
    pub decimals: u8,
    /// Administrator and originating account (`tz1…`)
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub icon: Option<String>,
    #[arg(long)]
    pub mint: bool,
    #[arg(long)]
    pub pause: bool,
    #[arg(long)]
    pub burn: bool,
    #[arg(long)]
    pub blacklist: bool,
}
