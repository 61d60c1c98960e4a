use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment override prefix (`TFORGE__SECURITY__API_TOKEN` maps to `security.api_token`).
pub const ENV_PREFIX: &str = "TFORGE";
/// Looked up in the working directory when no path is given (any supported extension).
pub const DEFAULT_CONFIG_STEM: &str = "tforge";

#[tforge_derive::forge_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration: a file, then `TFORGE__` environment overrides.
///
/// An explicit `path` must exist. Without one, `tforge.{toml,yaml,json}` in the working
/// directory is used when present and the type's defaults otherwise, so the CLI runs
/// without any file at all.
///
/// # Errors
/// A missing explicit file, malformed content, or values that do not fit `T`.
///
/// # Example
/// ```rust
/// use tforge_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// #[serde(default)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(None::<&str>).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (source, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_STEM), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(source.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %source.display(), required, "Loading config");

    let config = builder
        .build()
        .context(format!("Failed to read {}", source.display()))?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
