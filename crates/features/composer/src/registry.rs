//! Static catalogue of capabilities: body fragment, initializer and ordering constraints.

use crate::capability::Capability::{self, Admin, Blacklist, Burn, ChangeMetadata, Core, Mint, Pause};
use crate::capability::Constraint::{self, After, Before, Requires};
use crate::capability::Phase::{Initialization, Linearization};
use crate::error::ComposeError;
use std::fmt;

/// Where a capability's body lands in the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Its own class, listed among the token class bases.
    Standalone,
    /// Members appended to the host capability's class.
    AttachedTo(Capability),
}

/// Constructor call contributed to the generated token class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitSpec {
    /// Names of token-class constructor parameters forwarded to this initializer.
    pub args: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct CapabilitySpec {
    pub capability: Capability,
    /// Class defined by the body; empty for attached capabilities.
    pub class_name: &'static str,
    pub placement: Placement,
    pub body: &'static str,
    pub init: Option<InitSpec>,
    pub constraints: &'static [Constraint],
}

/// A rendered initializer invocation, e.g. `Admin.__init__(self, administrator)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InitCall {
    pub capability: Capability,
    pub class_name: &'static str,
    pub args: &'static [&'static str],
}

impl fmt::Display for InitCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.__init__(self", self.class_name)?;
        for arg in self.args {
            write!(f, ", {arg}")?;
        }
        f.write_str(")")
    }
}

/// `(body_text, init_text)` for one capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub body: &'static str,
    pub init: Option<InitCall>,
}

/// Optional standalone capabilities override interface hooks, so they precede `Core`.
const HOOK_PROVIDER: &[Constraint] =
    &[Before(Linearization, Core), After(Initialization, Core), Requires(Core)];

pub const DEFAULT_TABLE: &[CapabilitySpec] = &[
    CapabilitySpec {
        capability: Mint,
        class_name: "Mint",
        placement: Placement::Standalone,
        body: include_str!("../templates/capabilities/mint.py"),
        init: None,
        constraints: HOOK_PROVIDER,
    },
    CapabilitySpec {
        capability: Pause,
        class_name: "Pause",
        placement: Placement::Standalone,
        body: include_str!("../templates/capabilities/pause.py"),
        init: Some(InitSpec { args: &[] }),
        constraints: HOOK_PROVIDER,
    },
    CapabilitySpec {
        capability: Admin,
        class_name: "Admin",
        placement: Placement::Standalone,
        body: include_str!("../templates/capabilities/admin.py"),
        init: Some(InitSpec { args: &["administrator"] }),
        constraints: HOOK_PROVIDER,
    },
    CapabilitySpec {
        capability: Burn,
        class_name: "Burn",
        placement: Placement::Standalone,
        body: include_str!("../templates/capabilities/burn.py"),
        init: None,
        constraints: HOOK_PROVIDER,
    },
    CapabilitySpec {
        capability: Core,
        class_name: "Fa1_2",
        placement: Placement::Standalone,
        body: include_str!("../templates/capabilities/core.py"),
        init: Some(InitSpec { args: &["metadata", "ledger", "token_metadata"] }),
        constraints: &[Before(Linearization, ChangeMetadata)],
    },
    CapabilitySpec {
        capability: ChangeMetadata,
        class_name: "ChangeMetadata",
        placement: Placement::Standalone,
        body: include_str!("../templates/capabilities/change_metadata.py"),
        init: None,
        constraints: &[After(Initialization, Core), Requires(Core)],
    },
    CapabilitySpec {
        capability: Blacklist,
        class_name: "",
        placement: Placement::AttachedTo(Admin),
        body: include_str!("../templates/capabilities/blacklist.py"),
        init: None,
        constraints: &[Requires(Admin), Requires(Core)],
    },
];

/// Table-driven, stateless lookup over a capability catalogue.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    table: &'static [CapabilitySpec],
}

impl Default for Registry {
    fn default() -> Self {
        Self { table: DEFAULT_TABLE }
    }
}

impl Registry {
    /// A registry over a custom table; entries are looked up by capability.
    #[must_use]
    pub const fn from_table(table: &'static [CapabilitySpec]) -> Self {
        Self { table }
    }

    /// # Errors
    /// [`ComposeError::UnknownCapability`] when the table has no entry.
    pub fn spec(&self, capability: Capability) -> Result<&'static CapabilitySpec, ComposeError> {
        self.table.iter().find(|s| s.capability == capability).ok_or(
            ComposeError::UnknownCapability { capability, context: None },
        )
    }

    /// # Errors
    /// [`ComposeError::UnknownCapability`] when the table has no entry.
    pub fn fragment_for(&self, capability: Capability) -> Result<Fragment, ComposeError> {
        let spec = self.spec(capability)?;
        Ok(Fragment {
            body: spec.body,
            init: spec.init.map(|init| InitCall {
                capability,
                class_name: spec.class_name,
                args: init.args,
            }),
        })
    }

    /// # Errors
    /// [`ComposeError::UnknownCapability`] when the table has no entry.
    pub fn constraints_for(
        &self,
        capability: Capability,
    ) -> Result<&'static [Constraint], ComposeError> {
        Ok(self.spec(capability)?.constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_capability_has_an_entry() {
        let registry = Registry::default();
        for capability in Capability::iter() {
            assert!(registry.spec(capability).is_ok(), "{capability} missing");
        }
    }

    #[test]
    fn standalone_bodies_define_their_class() {
        for spec in DEFAULT_TABLE.iter().filter(|s| s.placement == Placement::Standalone) {
            assert!(
                spec.body.starts_with(&format!("class {}(", spec.class_name)),
                "{} body must open with its class",
                spec.capability
            );
        }
    }

    #[test]
    fn blacklist_attaches_to_admin_without_initializer() {
        let spec = Registry::default().spec(Blacklist).unwrap();
        assert_eq!(spec.placement, Placement::AttachedTo(Admin));
        assert!(spec.init.is_none());
        assert!(spec.constraints.contains(&Requires(Admin)));
    }

    #[test]
    fn admin_initializer_takes_the_administrator() {
        let fragment = Registry::default().fragment_for(Admin).unwrap();
        assert_eq!(fragment.init.unwrap().to_string(), "Admin.__init__(self, administrator)");
        let pause = Registry::default().fragment_for(Pause).unwrap();
        assert_eq!(pause.init.unwrap().to_string(), "Pause.__init__(self)");
        assert!(Registry::default().fragment_for(Mint).unwrap().init.is_none());
    }

    #[test]
    fn optional_capabilities_only_depend_on_core_state() {
        let registry = Registry::default();
        for capability in [Mint, Pause, Burn] {
            let constraints = registry.constraints_for(capability).unwrap();
            assert!(constraints.iter().all(|c| match c {
                Before(_, other) | After(_, other) | Requires(other) => *other == Core,
            }));
        }
        assert_eq!(registry.constraints_for(Core).unwrap(), &[Before(Linearization, ChangeMetadata)]);
    }

    #[test]
    fn incomplete_tables_report_unknown_capabilities() {
        static PARTIAL: &[CapabilitySpec] = &[];
        let err = Registry::from_table(PARTIAL).fragment_for(Mint).unwrap_err();
        assert!(matches!(err, ComposeError::UnknownCapability { capability: Mint, .. }));
    }
}
