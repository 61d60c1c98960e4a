//! Facade crate for `TokenForge` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `tforge` with the `server` feature for the HTTP surface.
//! - Call `tforge::init` (server) to register feature slices; extend as new slices appear.

pub use tforge_composer as composer;
pub use tforge_domain as domain;
pub use tforge_kernel as kernel;
pub use tforge_pipeline as pipeline;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use tforge_kernel::server::system_router;
        pub use tforge_tokens::router::tokens_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use tforge_tokens as tokens;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "tokens",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init(
    config: &domain::config::ApiConfig,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::new();

    // Tokens
    slices.push(features::tokens::init(config)?);

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_is_always_enabled() {
        assert!(features::is_enabled("tokens"));
        assert!(!features::is_enabled("licensing"));
    }
}
