use crate::constants::{ADMIN, BLACKLIST, BURN, CHANGE_METADATA, CORE, MINT, PAUSE};
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// A set of contract capabilities.
    ///
    /// `ADMIN`, `CORE` and `CHANGE_METADATA` are part of every generated contract;
    /// [`CapabilitySet::from_flags`] always includes them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CapabilitySet: u16 {
        const MINT = 1 << 0;
        const PAUSE = 1 << 1;
        const ADMIN = 1 << 2;
        const BURN = 1 << 3;
        const BLACKLIST = 1 << 4;
        const CHANGE_METADATA = 1 << 5;
        const CORE = 1 << 6;

        const MANDATORY = Self::ADMIN.bits() | Self::CORE.bits() | Self::CHANGE_METADATA.bits();
        const OPTIONAL = Self::MINT.bits() | Self::PAUSE.bits() | Self::BURN.bits() | Self::BLACKLIST.bits();
        const ALL = Self::MANDATORY.bits() | Self::OPTIONAL.bits();
    }
}

impl CapabilitySet {
    /// The mandatory capabilities plus one per enabled flag.
    #[must_use]
    pub fn from_flags(can_mint: bool, can_pause: bool, burn: bool, blacklist: bool) -> Self {
        let mut set = Self::MANDATORY;
        set.set(Self::MINT, can_mint);
        set.set(Self::PAUSE, can_pause);
        set.set(Self::BURN, burn);
        set.set(Self::BLACKLIST, blacklist);
        set
    }

    /// Optional capabilities that were left out.
    #[must_use]
    pub fn missing_optional(self) -> Self {
        Self::OPTIONAL.difference(self)
    }
}

impl TryFrom<&str> for CapabilitySet {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut set = Self::empty();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            set |= match name {
                MINT => Self::MINT,
                PAUSE => Self::PAUSE,
                ADMIN => Self::ADMIN,
                BURN => Self::BURN,
                BLACKLIST => Self::BLACKLIST,
                CHANGE_METADATA => Self::CHANGE_METADATA,
                CORE => Self::CORE,
                "all" | "*" => Self::ALL,
                other => return Err(format!("unknown capability '{other}'")),
            };
        }
        Ok(set)
    }
}

impl From<u16> for CapabilitySet {
    fn from(bits: u16) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for CapabilitySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
