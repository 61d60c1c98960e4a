//! Ingress validation of token feature selections.

use crate::error::ComposeError;
use serde::{Deserialize, Serialize};
use tforge_domain::capabilities::CapabilitySet;
use tforge_domain::constants::{
    BASE58_ALPHABET, DECIMALS_MAX, DECIMALS_MIN, DEFAULT_ICON, ICON_MAX_CHARS, ICON_SCHEMES,
    IMPLICIT_ADDRESS_LEN, IMPLICIT_ADDRESS_PREFIXES, SYMBOL_MAX_CHARS, TOKEN_NAME_MAX_CHARS,
};

/// Selection as received from a client or a file, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSelection {
    pub token_name: String,
    pub symbol: String,
    pub initial_supply: u64,
    pub decimals: u8,
    pub initial_owner: String,
    #[serde(default)]
    pub can_mint: bool,
    #[serde(default)]
    pub can_pause: bool,
    #[serde(default)]
    pub blacklist: bool,
    #[serde(default)]
    pub burn: bool,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A validated, immutable feature selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureSelection {
    token_name: String,
    symbol: String,
    initial_supply: u64,
    decimals: u8,
    initial_owner: String,
    can_mint: bool,
    can_pause: bool,
    blacklist: bool,
    burn: bool,
    icon: String,
}

impl TryFrom<RawSelection> for FeatureSelection {
    type Error = ComposeError;

    fn try_from(raw: RawSelection) -> Result<Self, Self::Error> {
        let token_name = display_text("token_name", &raw.token_name, TOKEN_NAME_MAX_CHARS)?;
        let symbol = display_text("symbol", &raw.symbol, SYMBOL_MAX_CHARS)?;

        if raw.initial_supply == 0 {
            return Err(ComposeError::validation("initial_supply", "must be a positive integer"));
        }

        if !(DECIMALS_MIN..=DECIMALS_MAX).contains(&raw.decimals) {
            return Err(ComposeError::validation(
                "decimals",
                format!("must be between {DECIMALS_MIN} and {DECIMALS_MAX}"),
            ));
        }

        let initial_owner = raw.initial_owner.trim();
        if !is_implicit_address(initial_owner) {
            return Err(ComposeError::validation(
                "initial_owner",
                "must be a tz1, tz2 or tz3 address of 36 base58 characters",
            ));
        }

        let icon = match raw.icon.as_deref() {
            None => DEFAULT_ICON.to_owned(),
            Some(icon) => icon_uri(icon)?,
        };

        Ok(Self {
            token_name,
            symbol,
            initial_supply: raw.initial_supply,
            decimals: raw.decimals,
            initial_owner: initial_owner.to_owned(),
            can_mint: raw.can_mint,
            can_pause: raw.can_pause,
            blacklist: raw.blacklist,
            burn: raw.burn,
            icon,
        })
    }
}

impl FeatureSelection {
    #[must_use]
    pub fn token_name(&self) -> &str {
        &self.token_name
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub const fn initial_supply(&self) -> u64 {
        self.initial_supply
    }

    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    #[must_use]
    pub fn initial_owner(&self) -> &str {
        &self.initial_owner
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub const fn can_mint(&self) -> bool {
        self.can_mint
    }

    #[must_use]
    pub const fn can_pause(&self) -> bool {
        self.can_pause
    }

    #[must_use]
    pub const fn blacklist(&self) -> bool {
        self.blacklist
    }

    #[must_use]
    pub const fn burn(&self) -> bool {
        self.burn
    }

    /// Mandatory capabilities plus one per enabled flag.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::from_flags(self.can_mint, self.can_pause, self.burn, self.blacklist)
    }
}

/// `tz1`/`tz2`/`tz3` followed by 33 base58 characters, nothing else.
#[must_use]
pub fn is_implicit_address(value: &str) -> bool {
    value.len() == IMPLICIT_ADDRESS_LEN
        && IMPLICIT_ADDRESS_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
        && value[3..].chars().all(|c| BASE58_ALPHABET.contains(c))
}

fn display_text(field: &'static str, value: &str, max_chars: usize) -> Result<String, ComposeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ComposeError::validation(field, "must not be empty"));
    }
    if value.chars().count() > max_chars {
        return Err(ComposeError::validation(field, format!("must be at most {max_chars} characters")));
    }
    if value.chars().any(char::is_control) {
        return Err(ComposeError::validation(field, "must not contain control characters"));
    }
    Ok(value.to_owned())
}

fn icon_uri(value: &str) -> Result<String, ComposeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ComposeError::validation("icon", "must not be empty when provided"));
    }
    if value.chars().count() > ICON_MAX_CHARS {
        return Err(ComposeError::validation(
            "icon",
            format!("must be at most {ICON_MAX_CHARS} characters"),
        ));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ComposeError::validation("icon", "must not contain whitespace"));
    }

    let scheme_ok = value.split_once("://").is_some_and(|(scheme, rest)| {
        !rest.is_empty() && ICON_SCHEMES.iter().any(|s| scheme.eq_ignore_ascii_case(s))
    });
    if !scheme_ok {
        return Err(ComposeError::validation(
            "icon",
            format!("must be an absolute {} URI", ICON_SCHEMES.join("/")),
        ));
    }
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb";

    fn raw() -> RawSelection {
        RawSelection {
            token_name: "  Demo ".into(),
            symbol: "DMO".into(),
            initial_supply: 1000,
            decimals: 6,
            initial_owner: OWNER.into(),
            can_mint: true,
            can_pause: false,
            blacklist: false,
            burn: false,
            icon: None,
        }
    }

    fn field_of(err: ComposeError) -> String {
        match err {
            ComposeError::Validation { field, .. } => field.into_owned(),
            other => panic!("expected a validation error, got {other}"),
        }
    }

    #[test]
    fn valid_selection_is_trimmed_and_defaulted() {
        let selection = FeatureSelection::try_from(raw()).unwrap();
        assert_eq!(selection.token_name(), "Demo");
        assert_eq!(selection.icon(), DEFAULT_ICON);
        assert_eq!(selection.capabilities(), CapabilitySet::MANDATORY | CapabilitySet::MINT);
    }

    #[test]
    fn numeric_bounds() {
        let zero = RawSelection { initial_supply: 0, ..raw() };
        assert_eq!(field_of(FeatureSelection::try_from(zero).unwrap_err()), "initial_supply");

        for decimals in [0, 19] {
            let bad = RawSelection { decimals, ..raw() };
            assert_eq!(field_of(FeatureSelection::try_from(bad).unwrap_err()), "decimals");
        }
        for decimals in [1, 18] {
            assert!(FeatureSelection::try_from(RawSelection { decimals, ..raw() }).is_ok());
        }
    }

    #[test]
    fn text_fields() {
        let blank = RawSelection { token_name: "   ".into(), ..raw() };
        assert_eq!(field_of(FeatureSelection::try_from(blank).unwrap_err()), "token_name");

        let long_symbol = RawSelection { symbol: "TOOLONG".into(), ..raw() };
        assert_eq!(field_of(FeatureSelection::try_from(long_symbol).unwrap_err()), "symbol");

        let padded = RawSelection { symbol: " ABCDE ".into(), ..raw() };
        assert_eq!(FeatureSelection::try_from(padded).unwrap().symbol(), "ABCDE");

        let control = RawSelection { token_name: "De\u{7}mo".into(), ..raw() };
        assert_eq!(field_of(FeatureSelection::try_from(control).unwrap_err()), "token_name");

        let quoted = RawSelection { token_name: r#"Evil") ; import os #"#.into(), ..raw() };
        assert!(FeatureSelection::try_from(quoted).is_ok());
    }

    #[test]
    fn owner_address_shape() {
        assert!(is_implicit_address(OWNER));
        assert!(is_implicit_address("tz2BFTyPeYRzxd5aiBchbXN3WCZhx7BqbMBq"));
        assert!(!is_implicit_address("tz4VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb"));
        assert!(!is_implicit_address("KT1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb"));
        assert!(!is_implicit_address("tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcj0"));
        assert!(!is_implicit_address("tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjbb"));
        assert!(!is_implicit_address("tz1ä"));

        let padded = RawSelection { initial_owner: format!(" {OWNER}\n"), ..raw() };
        assert_eq!(FeatureSelection::try_from(padded).unwrap().initial_owner(), OWNER);
    }

    #[test]
    fn icon_rules() {
        let ipfs = RawSelection { icon: Some("ipfs://bafkreia".into()), ..raw() };
        assert_eq!(FeatureSelection::try_from(ipfs).unwrap().icon(), "ipfs://bafkreia");

        for bad in ["", "javascript:alert(1)", "https://a b", "ftp://host/x", "https://"] {
            let selection = RawSelection { icon: Some(bad.into()), ..raw() };
            assert_eq!(field_of(FeatureSelection::try_from(selection).unwrap_err()), "icon", "{bad}");
        }
    }

    #[test]
    fn raw_selection_flags_default_to_false() {
        let raw: RawSelection = serde_json::from_value(serde_json::json!({
            "token_name": "Demo",
            "symbol": "DMO",
            "initial_supply": 1000,
            "decimals": 6,
            "initial_owner": OWNER,
        }))
        .unwrap();
        assert!(!raw.can_mint && !raw.can_pause && !raw.blacklist && !raw.burn);
        assert!(raw.icon.is_none());
    }
}
