//! # Contract composer
//!
//! Turns a validated [`FeatureSelection`] into a SmartPy FA1.2 contract module.
//!
//! 1.  **Registry ([`registry`]):** one entry per [`Capability`] with its class body,
//!     initializer and ordering constraints.
//! 2.  **Resolver ([`resolver`]):** topologically orders the selected capabilities into a
//!     [`CompositionPlan`]. Identical selections always yield identical plans.
//! 3.  **Renderer ([`renderer`]):** fills the contract template through typed slots, so
//!     client-supplied values are always encoded as inert literals.

pub mod artifact;
pub mod capability;
mod error;
pub mod registry;
pub mod renderer;
pub mod resolver;
pub mod selection;

pub use crate::artifact::{CANONICAL_CONTRACT_ID, GeneratedArtifact};
pub use crate::capability::{Capability, Constraint, Phase};
pub use crate::error::{ComposeError, ComposeErrorExt};
pub use crate::registry::Registry;
pub use crate::renderer::{ContractMetadata, TemplateRenderer};
pub use crate::resolver::{CompositionPlan, Resolver};
pub use crate::selection::{FeatureSelection, RawSelection};

use tracing::debug;

/// Resolver and renderer bundled for one-call generation.
#[derive(Debug, Clone)]
pub struct Composer {
    resolver: Resolver,
    renderer: TemplateRenderer,
    metadata_url: String,
}

impl Composer {
    /// # Errors
    /// [`ComposeError::Render`] if the built-in contract template is malformed.
    pub fn new(metadata_url: impl Into<String>) -> Result<Self, ComposeError> {
        Ok(Self {
            resolver: Resolver::default(),
            renderer: TemplateRenderer::new()?,
            metadata_url: metadata_url.into(),
        })
    }

    #[must_use]
    pub fn with_parts(resolver: Resolver, renderer: TemplateRenderer, metadata_url: String) -> Self {
        Self { resolver, renderer, metadata_url }
    }

    #[must_use]
    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// # Errors
    /// See [`Resolver::resolve`].
    pub fn plan(&self, selection: &FeatureSelection) -> Result<CompositionPlan, ComposeError> {
        self.resolver.resolve(selection)
    }

    /// Resolves and renders the contract for `selection` under `contract_id`.
    ///
    /// # Errors
    /// Any resolver or renderer failure; nothing is written anywhere.
    pub fn compose(
        &self,
        selection: &FeatureSelection,
        contract_id: &str,
    ) -> Result<GeneratedArtifact, ComposeError> {
        let plan = self.plan(selection)?;
        let metadata = ContractMetadata::new(selection, contract_id, self.metadata_url.as_str());
        let source = self.renderer.render_contract(&plan, &metadata)?;
        let canonical = self.renderer.render_contract(
            &plan,
            &ContractMetadata { contract_id: CANONICAL_CONTRACT_ID.to_owned(), ..metadata },
        )?;
        let artifact = GeneratedArtifact::with_canonical(contract_id, source, &canonical);

        debug!(
            contract_id,
            fingerprint = %artifact.fingerprint,
            bases = plan.linearization.len(),
            "Composed contract source"
        );

        Ok(artifact)
    }
}
