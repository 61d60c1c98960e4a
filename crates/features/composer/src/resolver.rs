//! Turns a capability set into a composition plan.
//!
//! Linearization and initialization are two independent graphs over the selected
//! standalone capabilities. Each is sorted with Kahn's algorithm; ties between nodes that
//! become ready together are broken by canonical rank, so identical selections always
//! produce identical plans.

use crate::capability::{Capability, Constraint, OrderingEdge, Phase};
use crate::error::ComposeError;
use crate::registry::{InitCall, Placement, Registry};
use crate::selection::FeatureSelection;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt::{self, Write as _};
use tforge_domain::capabilities::CapabilitySet;
use tracing::debug;

/// Ordered combination of capabilities for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct CompositionPlan {
    /// Base classes of the generated token class, in method-resolution order.
    pub linearization: Vec<Capability>,
    /// Constructor calls, in execution order.
    pub initialization: Vec<InitCall>,
    /// Attached capabilities keyed by host, in canonical order.
    pub attachments: BTreeMap<Capability, Vec<Capability>>,
    #[serde(skip)]
    registry: Registry,
}

impl CompositionPlan {
    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.linearization.contains(&capability)
            || self.attachments.values().any(|attached| attached.contains(&capability))
    }

    /// `Mint, Admin, Fa1_2, ChangeMetadata`
    ///
    /// # Errors
    /// [`ComposeError::UnknownCapability`] if the plan's registry lost an entry.
    pub fn bases(&self) -> Result<String, ComposeError> {
        let names = self
            .linearization
            .iter()
            .map(|c| self.registry.spec(*c).map(|spec| spec.class_name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names.join(", "))
    }

    /// Class definitions in linearization order, attached members appended to their host.
    ///
    /// # Errors
    /// [`ComposeError::UnknownCapability`] if the plan's registry lost an entry.
    pub fn class_sources(&self) -> Result<String, ComposeError> {
        let mut out = String::new();
        for (i, capability) in self.linearization.iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            out.push_str(self.registry.fragment_for(*capability)?.body.trim_end());

            for attached in self.attachments.get(capability).into_iter().flatten() {
                let body = self.registry.fragment_for(*attached)?.body;
                out.push_str("\n\n");
                out.push_str(&crate::renderer::indent(body.trim_end(), 4));
            }
        }
        Ok(out)
    }

    /// One initializer call per line.
    #[must_use]
    pub fn initializer_block(&self) -> String {
        self.initialization.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    }
}

impl fmt::Display for CompositionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&'static str> = self.linearization.iter().map(|c| (*c).into()).collect();
        writeln!(f, "linearization: [{}]", names.join(", "))?;
        writeln!(f, "initialization:")?;
        for call in &self.initialization {
            writeln!(f, "  {call}")?;
        }
        if !self.attachments.is_empty() {
            let mut line = String::new();
            for (host, attached) in &self.attachments {
                for capability in attached {
                    let _ = write!(line, " {capability}->{host}");
                }
            }
            writeln!(f, "attachments:{line}")?;
        }
        Ok(())
    }
}

/// Computes [`CompositionPlan`]s against a registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    registry: Registry,
}

impl Resolver {
    #[must_use]
    pub const fn new(registry: Registry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Plan for a validated selection: the mandatory capabilities plus every flagged one.
    ///
    /// # Errors
    /// See [`Resolver::resolve_capabilities`].
    pub fn resolve(&self, selection: &FeatureSelection) -> Result<CompositionPlan, ComposeError> {
        self.resolve_capabilities(selection.capabilities())
    }

    /// Plan for an arbitrary capability set.
    ///
    /// # Errors
    /// * [`ComposeError::InvalidComposition`] for an empty set, an unmet requirement
    ///   (`Burn` without `Core`, `Blacklist` without `Admin`) or a constraint cycle.
    /// * [`ComposeError::UnknownCapability`] when the registry lacks a selected entry.
    pub fn resolve_capabilities(
        &self,
        set: CapabilitySet,
    ) -> Result<CompositionPlan, ComposeError> {
        if set.is_empty() {
            return Err(ComposeError::composition("no capabilities selected"));
        }

        let mut standalone = Vec::new();
        let mut attachments: BTreeMap<Capability, Vec<Capability>> = BTreeMap::new();
        let mut edges = Vec::new();

        for capability in Capability::members(set) {
            let spec = self.registry.spec(capability)?;

            for constraint in spec.constraints {
                if let Constraint::Requires(required) = constraint
                    && !set.contains(required.flag())
                {
                    return Err(ComposeError::composition(format!(
                        "{capability} requires {required}"
                    )));
                }
                edges.extend(constraint.edge(capability));
            }

            match spec.placement {
                Placement::Standalone => standalone.push(capability),
                Placement::AttachedTo(host) => {
                    if !set.contains(host.flag()) {
                        return Err(ComposeError::composition(format!(
                            "{capability} attaches to {host}, which is not selected"
                        )));
                    }
                    attachments.entry(host).or_default().push(capability);
                },
            }
        }

        if let Some((attached, host)) = attachments
            .iter()
            .flat_map(|(host, attached)| attached.iter().map(move |a| (*a, *host)))
            .find(|(_, host)| !standalone.contains(host))
        {
            return Err(ComposeError::composition(format!(
                "{attached} attaches to {host}, which is not a standalone capability"
            )));
        }

        let linearization = topological_order(Phase::Linearization, &standalone, &edges)?;

        let initializable: Vec<Capability> = standalone
            .iter()
            .copied()
            .filter(|c| self.registry.spec(*c).is_ok_and(|spec| spec.init.is_some()))
            .collect();
        let initialization = topological_order(Phase::Initialization, &initializable, &edges)?
            .into_iter()
            .map(|c| {
                self.registry.fragment_for(c)?.init.ok_or_else(|| {
                    ComposeError::from(format!("{c} lost its initializer during resolution"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            capabilities = ?set,
            linearization = ?linearization,
            initializers = initialization.len(),
            "Resolved composition plan"
        );

        Ok(CompositionPlan { linearization, initialization, attachments, registry: self.registry })
    }
}

/// Kahn's algorithm over the edges of `phase` restricted to `nodes`.
fn topological_order(
    phase: Phase,
    nodes: &[Capability],
    edges: &[OrderingEdge],
) -> Result<Vec<Capability>, ComposeError> {
    let mut in_degree: BTreeMap<Capability, usize> = nodes.iter().map(|c| (*c, 0)).collect();
    let mut adjacency: BTreeMap<Capability, Vec<Capability>> = BTreeMap::new();

    for edge in edges.iter().filter(|e| e.phase == phase) {
        if !in_degree.contains_key(&edge.from) || !in_degree.contains_key(&edge.to) {
            continue;
        }
        let successors = adjacency.entry(edge.from).or_default();
        if successors.contains(&edge.to) {
            continue;
        }
        successors.push(edge.to);
        if let Some(degree) = in_degree.get_mut(&edge.to) {
            *degree += 1;
        }
    }

    let mut ready: BinaryHeap<Ranked> =
        in_degree.iter().filter(|(_, d)| **d == 0).map(|(c, _)| Ranked::new(*c)).collect();

    let mut sorted = Vec::with_capacity(nodes.len());
    while let Some(Ranked(Reverse(_), capability)) = ready.pop() {
        sorted.push(capability);

        for next in adjacency.get(&capability).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Ranked::new(*next));
                }
            }
        }
    }

    if sorted.len() != nodes.len() {
        let stuck: Vec<String> = in_degree
            .iter()
            .filter(|(c, _)| !sorted.contains(c))
            .map(|(c, _)| c.to_string())
            .collect();
        return Err(ComposeError::composition(format!(
            "{phase} constraints form a cycle between {}",
            stuck.join(", ")
        )));
    }

    Ok(sorted)
}

/// Max-heap entry that pops the lowest canonical rank first.
#[derive(Debug, PartialEq, Eq)]
struct Ranked(Reverse<u8>, Capability);

impl Ranked {
    const fn new(capability: Capability) -> Self {
        Self(Reverse(capability.rank()), capability)
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability::{Admin, Blacklist, Burn, ChangeMetadata, Core, Mint, Pause};
    use crate::capability::Constraint::{Before, Requires};
    use crate::capability::Phase::Linearization;
    use crate::registry::{CapabilitySpec, InitSpec};

    fn resolve(set: CapabilitySet) -> Result<CompositionPlan, ComposeError> {
        Resolver::default().resolve_capabilities(set)
    }

    #[test]
    fn mandatory_only_plan() {
        let plan = resolve(CapabilitySet::MANDATORY).unwrap();
        assert_eq!(plan.linearization, vec![Admin, Core, ChangeMetadata]);
        let inits: Vec<_> = plan.initialization.iter().map(|c| c.capability).collect();
        assert_eq!(inits, vec![Core, Admin]);
        assert_eq!(plan.bases().unwrap(), "Admin, Fa1_2, ChangeMetadata");
    }

    #[test]
    fn all_flags_keep_canonical_order() {
        let plan = resolve(CapabilitySet::ALL).unwrap();
        assert_eq!(plan.linearization, vec![Mint, Pause, Admin, Burn, Core, ChangeMetadata]);
        let inits: Vec<_> = plan.initialization.iter().map(|c| c.capability).collect();
        assert_eq!(inits, vec![Core, Pause, Admin]);
        assert_eq!(plan.attachments.get(&Admin), Some(&vec![Blacklist]));
        assert!(plan.contains(Blacklist));
    }

    #[test]
    fn core_initializes_first_for_every_flag_combination() {
        for bits in 0..16_u8 {
            let set = CapabilitySet::from_flags(
                bits & 1 != 0,
                bits & 2 != 0,
                bits & 4 != 0,
                bits & 8 != 0,
            );
            let plan = resolve(set).unwrap();
            assert_eq!(plan.initialization.first().map(|c| c.capability), Some(Core));
            let admin_inits =
                plan.initialization.iter().filter(|c| c.capability == Admin).count();
            assert_eq!(admin_inits, 1, "{set:?}");
            let core_at = plan.linearization.iter().position(|c| *c == Core).unwrap();
            assert!(plan.linearization[..core_at].iter().all(|c| c.rank() < Core.rank()));
        }
    }

    #[test]
    fn unmet_requirements_are_rejected() {
        let err = resolve(CapabilitySet::BURN).unwrap_err();
        assert!(err.to_string().contains("burn requires core"), "{err}");

        let err =
            resolve(CapabilitySet::CORE | CapabilitySet::BLACKLIST).unwrap_err();
        assert!(err.to_string().contains("blacklist requires admin"), "{err}");

        assert!(matches!(
            resolve(CapabilitySet::empty()),
            Err(ComposeError::InvalidComposition { .. })
        ));
    }

    #[test]
    fn initializer_block_lists_one_call_per_line() {
        let plan = resolve(CapabilitySet::from_flags(false, true, false, false)).unwrap();
        assert_eq!(
            plan.initializer_block(),
            "Fa1_2.__init__(self, metadata, ledger, token_metadata)\n\
             Pause.__init__(self)\n\
             Admin.__init__(self, administrator)"
        );
    }

    static CYCLIC: &[CapabilitySpec] = &[
        CapabilitySpec {
            capability: Core,
            class_name: "Fa1_2",
            placement: Placement::Standalone,
            body: "class Fa1_2(CommonInterface):\n    pass\n",
            init: Some(InitSpec { args: &[] }),
            constraints: &[Before(Linearization, Admin)],
        },
        CapabilitySpec {
            capability: Admin,
            class_name: "Admin",
            placement: Placement::Standalone,
            body: "class Admin(sp.Contract):\n    pass\n",
            init: None,
            constraints: &[Before(Linearization, Core), Requires(Core)],
        },
    ];

    #[test]
    fn cycles_are_invalid_compositions() {
        let resolver = Resolver::new(Registry::from_table(CYCLIC));
        let err = resolver.resolve_capabilities(CapabilitySet::ADMIN | CapabilitySet::CORE);
        let Err(ComposeError::InvalidComposition { message, .. }) = err else {
            panic!("expected a cycle error, got {err:?}");
        };
        assert!(message.contains("linearization"));
        assert!(message.contains("admin") && message.contains("core"));
    }

    static WITHOUT_MINT: &[CapabilitySpec] = &[CapabilitySpec {
        capability: Core,
        class_name: "Fa1_2",
        placement: Placement::Standalone,
        body: "class Fa1_2(CommonInterface):\n    pass\n",
        init: Some(InitSpec { args: &[] }),
        constraints: &[],
    }];

    #[test]
    fn selected_capabilities_missing_from_the_table_are_unknown() {
        let resolver = Resolver::new(Registry::from_table(WITHOUT_MINT));
        let err = resolver.resolve_capabilities(CapabilitySet::CORE | CapabilitySet::MINT);
        assert!(matches!(err, Err(ComposeError::UnknownCapability { capability: Mint, .. })));
    }

    #[test]
    fn plan_display_is_stable() {
        let plan = resolve(CapabilitySet::from_flags(true, false, false, true)).unwrap();
        assert_eq!(
            plan.to_string(),
            "linearization: [mint, admin, core, change_metadata]\n\
             initialization:\n  \
             Fa1_2.__init__(self, metadata, ledger, token_metadata)\n  \
             Admin.__init__(self, administrator)\n\
             attachments: blacklist->admin\n"
        );
    }
}
