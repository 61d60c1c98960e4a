use crate::constants::{
    DEFAULT_CONTRACT_ARTIFACT, DEFAULT_DEPLOY_MARKER, DEFAULT_METADATA_URL,
    DEFAULT_STORAGE_ARTIFACT, IMPLICIT_ADDRESS_LEN, SCRATCH_DIR_NAME,
};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared by the server and the CLI.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub toolchain: ToolchainConfig,
    pub template: TemplateConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
    /// Allow every origin, method and header.
    pub cors_permissive: bool,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Static token expected in the `Authorization` header. Empty rejects every request.
    pub api_token: String,
}

/// External compiler and deployer, plus scratch space policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Per-request directories are created under here.
    pub scratch_dir: PathBuf,
    pub max_concurrent_builds: usize,
    /// Leftover scratch directories older than this are removed at startup.
    pub stale_after_secs: u64,
    pub compiler: CompilerConfig,
    pub deployer: DeployerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub program: String,
    /// Arguments placed before the source file name.
    pub args: Vec<String>,
    pub timeout_secs: u64,
    /// Expected under `<scratch>/<contract id>/`.
    pub contract_artifact: String,
    pub storage_artifact: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeployerConfig {
    pub program: String,
    /// Arguments placed before `originate contract ...` (e.g. `--endpoint`).
    pub args: Vec<String>,
    pub transfer_amount: String,
    pub burn_cap: String,
    pub timeout_secs: u64,
    /// Text preceding the originated address in the deployer output.
    pub marker: String,
    pub address_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Contract-level metadata location baked into the generated scenario.
    pub metadata_url: String,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            ssl: None,
            cors_permissive: true,
        }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join(SCRATCH_DIR_NAME),
            max_concurrent_builds: 4,
            stale_after_secs: 3600,
            compiler: CompilerConfig::default(),
            deployer: DeployerConfig::default(),
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "python3.9".to_owned(),
            args: Vec::new(),
            timeout_secs: 120,
            contract_artifact: DEFAULT_CONTRACT_ARTIFACT.to_owned(),
            storage_artifact: DEFAULT_STORAGE_ARTIFACT.to_owned(),
        }
    }
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            program: "octez-client".to_owned(),
            args: Vec::new(),
            transfer_amount: ".0001".to_owned(),
            burn_cap: "1".to_owned(),
            timeout_secs: 180,
            marker: DEFAULT_DEPLOY_MARKER.to_owned(),
            address_len: IMPLICIT_ADDRESS_LEN,
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self { metadata_url: DEFAULT_METADATA_URL.to_owned() }
    }
}
