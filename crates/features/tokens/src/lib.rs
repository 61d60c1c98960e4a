//! Token feature slice: `POST /create` turns token parameters into a deployed FA1.2
//! contract through the composer and the build pipeline.

mod error;
#[cfg(feature = "server")]
mod handlers;
pub mod model;
#[cfg(feature = "server")]
pub mod router;
pub mod service;

pub use crate::error::{TokensError, TokensErrorExt};
pub use crate::service::TokenService;

use tforge_kernel::security::token::TokenGuard;

/// Token feature state
#[tforge_derive::forge_slice]
pub struct Tokens {
    pub service: TokenService,
    pub guard: TokenGuard,
}

/// Initialize the token feature: build the service, sweep stale scratch directories and
/// arm the API token guard.
///
/// # Errors
/// [`TokensError::Compose`] if the contract template is malformed, [`TokensError::Pipeline`]
/// if the scratch root cannot be listed.
#[cfg(feature = "server")]
pub fn init(
    config: &tforge_domain::config::ApiConfig,
) -> Result<tforge_kernel::domain::registry::InitializedSlice, TokensError> {
    let service = TokenService::new(config)?;
    service.pipeline().sweep_stale()?;

    let guard = TokenGuard::new(&config.security.api_token);
    if !guard.is_configured() {
        tracing::warn!("security.api_token is empty; every create request will be rejected");
    }

    tracing::info!(
        scratch_dir = %config.toolchain.scratch_dir.display(),
        max_concurrent_builds = config.toolchain.max_concurrent_builds,
        "Tokens server slice initialized"
    );

    Ok(tforge_kernel::domain::registry::InitializedSlice::new(Tokens::new(TokensInner {
        service,
        guard,
    })))
}
