//! Typed-slot template rendering.
//!
//! Every placeholder declares how its value is encoded. Values supplied by clients can
//! only be bound as [`Value::Str`] or [`Value::Nat`], and every string kind goes through an
//! encoder that either produces an inert literal or refuses. Raw source text can only
//! enter through [`TrustedFragment`], which is constructible inside this crate alone.

mod escape;
mod template;

pub use template::{Segment, Slot, SlotKind, Template};

use crate::error::ComposeError;
use crate::resolver::CompositionPlan;
use crate::selection::FeatureSelection;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

pub const CONTRACT_TEMPLATE: &str = include_str!("../../templates/contract.py");

/// Class name of the generated token contract.
pub const TOKEN_CLASS: &str = "Fa1_2Token";

/// Length limit applied to text and bytes slots that declare none.
const DEFAULT_LIMIT: usize = 4096;

/// Source text taken from the capability registry or the composition plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedFragment(String);

impl TrustedFragment {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Nat(u64),
    Fragment(TrustedFragment),
}

/// Name-to-value map for one render.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: BTreeMap<String, Value>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn str(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_owned(), Value::Str(value.into()));
        self
    }

    #[must_use]
    pub fn nat(mut self, name: &str, value: u64) -> Self {
        self.values.insert(name.to_owned(), Value::Nat(value));
        self
    }

    #[must_use]
    pub(crate) fn fragment(mut self, name: &str, value: TrustedFragment) -> Self {
        self.values.insert(name.to_owned(), Value::Fragment(value));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// Values substituted into the contract template's scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMetadata {
    pub contract_id: String,
    pub token_name: String,
    pub symbol: String,
    pub decimals: u8,
    pub icon: String,
    pub initial_owner: String,
    pub initial_supply: u64,
    pub metadata_url: String,
}

impl ContractMetadata {
    #[must_use]
    pub fn new(
        selection: &FeatureSelection,
        contract_id: impl Into<String>,
        metadata_url: impl Into<String>,
    ) -> Self {
        Self {
            contract_id: contract_id.into(),
            token_name: selection.token_name().to_owned(),
            symbol: selection.symbol().to_owned(),
            decimals: selection.decimals(),
            icon: selection.icon().to_owned(),
            initial_owner: selection.initial_owner().to_owned(),
            initial_supply: selection.initial_supply(),
            metadata_url: metadata_url.into(),
        }
    }
}

/// Renders the contract template. The template is parsed once at construction.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template: Template<'static>,
}

impl TemplateRenderer {
    /// # Errors
    /// [`ComposeError::Render`] if the built-in template is malformed.
    pub fn new() -> Result<Self, ComposeError> {
        Self::with_template(CONTRACT_TEMPLATE)
    }

    /// # Errors
    /// [`ComposeError::Render`] if `source` is malformed.
    pub fn with_template(source: &'static str) -> Result<Self, ComposeError> {
        Ok(Self { template: Template::parse("contract", source)? })
    }

    #[must_use]
    pub const fn template(&self) -> &Template<'static> {
        &self.template
    }

    /// Full SmartPy module for `plan`, with the scenario built from `metadata`.
    ///
    /// # Errors
    /// [`ComposeError::Render`] when a value is refused by its slot encoder, and
    /// [`ComposeError::UnknownCapability`] if the plan references a missing entry.
    pub fn render_contract(
        &self,
        plan: &CompositionPlan,
        metadata: &ContractMetadata,
    ) -> Result<String, ComposeError> {
        let bindings = Bindings::new()
            .fragment("capability_classes", TrustedFragment::new(plan.class_sources()?))
            .fragment("bases", TrustedFragment::new(plan.bases()?))
            .fragment("initializers", TrustedFragment::new(plan.initializer_block()))
            .str("token_class", TOKEN_CLASS)
            .str("contract_id", &metadata.contract_id)
            .str("token_name", &metadata.token_name)
            .str("symbol", &metadata.symbol)
            .str("decimals", metadata.decimals.to_string())
            .str("icon", &metadata.icon)
            .str("metadata_url", &metadata.metadata_url)
            .str("initial_owner", &metadata.initial_owner)
            .nat("initial_supply", metadata.initial_supply);

        render(&self.template, &bindings)
    }
}

/// Substitutes every slot of `template`.
///
/// # Errors
/// [`ComposeError::Render`] for a missing or unused binding, a value whose type does not
/// fit the slot kind, a value over the slot's length limit, or a value its encoder refuses.
pub fn render(template: &Template<'_>, bindings: &Bindings) -> Result<String, ComposeError> {
    let mut out = String::new();
    let mut used = BTreeSet::new();

    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Slot(slot) => {
                let value = bindings.get(slot.name).ok_or_else(|| {
                    slot_error(template, slot, "no value bound")
                })?;
                out.push_str(&encode(template, slot, value)?);
                used.insert(slot.name);
            },
        }
    }

    if let Some(unused) = bindings.values.keys().find(|name| !used.contains(name.as_str())) {
        return Err(ComposeError::render(
            format!("binding '{unused}' matches no slot"),
            template.name(),
        ));
    }

    trace!(template = template.name(), bytes = out.len(), "Rendered template");
    Ok(out)
}

fn encode(template: &Template<'_>, slot: &Slot<'_>, value: &Value) -> Result<String, ComposeError> {
    let refuse = |reason: &str| -> Result<String, ComposeError> {
        Err(slot_error(template, slot, reason))
    };

    match (slot.kind, value) {
        (SlotKind::Text | SlotKind::Bytes, Value::Str(text)) => {
            let limit = slot.limit.unwrap_or(DEFAULT_LIMIT);
            if text.chars().count() > limit {
                return refuse(&format!("value exceeds {limit} characters"));
            }
            Ok(if slot.kind == SlotKind::Text {
                escape::text_literal(text)
            } else {
                escape::bytes_literal(text)
            })
        },
        (SlotKind::Address, Value::Str(text)) => match escape::address_literal(text) {
            Some(literal) => Ok(literal),
            None => refuse("value is not an implicit account address"),
        },
        (SlotKind::Nat, Value::Nat(n)) => Ok(n.to_string()),
        (SlotKind::Nat, Value::Str(text)) => match escape::nat_literal(text) {
            Some(literal) => Ok(literal),
            None => refuse("value is not an unsigned integer"),
        },
        (SlotKind::Ident, Value::Str(text)) if escape::is_identifier(text) => Ok(text.clone()),
        (SlotKind::Ident, Value::Str(_)) => refuse("value is not a Python identifier"),
        (SlotKind::Fragment, Value::Fragment(fragment)) => {
            Ok(indent_continuation(fragment.as_str(), slot.column))
        },
        (SlotKind::Fragment, _) => refuse("only trusted fragments may fill a fragment slot"),
        (_, Value::Fragment(_)) => refuse("trusted fragments only fill fragment slots"),
        (_, Value::Nat(_)) => refuse("numeric value bound to a string slot"),
    }
}

fn slot_error(template: &Template<'_>, slot: &Slot<'_>, reason: &str) -> ComposeError {
    ComposeError::render(format!("slot {}:{}: {reason}", slot.kind, slot.name), template.name())
}

/// Prefixes every non-blank line with `cols` spaces.
pub(crate) fn indent(text: &str, cols: usize) -> String {
    let pad = " ".repeat(cols);
    text.lines()
        .map(|line| if line.trim().is_empty() { String::new() } else { format!("{pad}{line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Like [`indent`] but leaves the first line alone; it already sits at the slot column.
fn indent_continuation(text: &str, cols: usize) -> String {
    match text.split_once('\n') {
        Some((first, rest)) => format!("{first}\n{}", indent(rest, cols)),
        None => text.to_owned(),
    }
}
