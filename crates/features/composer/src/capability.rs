use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tforge_domain::capabilities::CapabilitySet;

/// The closed set of contract capabilities.
///
/// Declaration order is the canonical rank used to break ties between unconstrained
/// siblings, so plans are byte-stable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Mint,
    Pause,
    Admin,
    Burn,
    Core,
    ChangeMetadata,
    Blacklist,
}

impl Capability {
    /// Position in the canonical order `Mint, Pause, Admin, Burn, Core, ChangeMetadata`.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn flag(self) -> CapabilitySet {
        match self {
            Self::Mint => CapabilitySet::MINT,
            Self::Pause => CapabilitySet::PAUSE,
            Self::Admin => CapabilitySet::ADMIN,
            Self::Burn => CapabilitySet::BURN,
            Self::Core => CapabilitySet::CORE,
            Self::ChangeMetadata => CapabilitySet::CHANGE_METADATA,
            Self::Blacklist => CapabilitySet::BLACKLIST,
        }
    }

    /// Members of `set` in canonical order.
    pub fn members(set: CapabilitySet) -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter().filter(move |c| set.contains(c.flag()))
    }
}

/// Which ordering a constraint applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Base-class order of the generated token class.
    Linearization,
    /// Order of initializer calls in the generated constructor.
    Initialization,
}

/// A constraint declared by one capability about another.
///
/// Ordering constraints only bind when both capabilities are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    Before(Phase, Capability),
    After(Phase, Capability),
    Requires(Capability),
}

/// A directed `from -> to` edge in one phase's graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderingEdge {
    pub phase: Phase,
    pub from: Capability,
    pub to: Capability,
}

impl Constraint {
    /// The ordering edge this constraint contributes for `owner`, if any.
    #[must_use]
    pub const fn edge(self, owner: Capability) -> Option<OrderingEdge> {
        match self {
            Self::Before(phase, other) => Some(OrderingEdge { phase, from: owner, to: other }),
            Self::After(phase, other) => Some(OrderingEdge { phase, from: other, to: owner }),
            Self::Requires(_) => None,
        }
    }
}
