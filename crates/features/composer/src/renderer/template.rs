//! Placeholder syntax: `{{ kind:name }}` or `{{ kind(limit):name }}`.

use crate::error::ComposeError;
use strum_macros::{Display, EnumString};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SlotKind {
    /// Python string literal.
    Text,
    /// `sp.bytes("0x…")` of the UTF-8 value.
    Bytes,
    /// `sp.address("tz…")`, revalidated.
    Address,
    /// Unsigned decimal digits.
    Nat,
    /// Bare Python identifier.
    Ident,
    /// Trusted registry text, re-indented to the slot column.
    Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<'t> {
    pub kind: SlotKind,
    pub name: &'t str,
    /// Maximum length in characters of the bound value.
    pub limit: Option<usize>,
    /// Column of the opening braces, used to indent multi-line fragments.
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
    Literal(&'t str),
    Slot(Slot<'t>),
}

/// A parsed document template.
#[derive(Debug, Clone)]
pub struct Template<'t> {
    name: &'static str,
    segments: Vec<Segment<'t>>,
}

impl<'t> Template<'t> {
    /// # Errors
    /// [`ComposeError::Render`] for an unterminated placeholder, an unknown kind,
    /// a malformed limit or an invalid slot name.
    pub fn parse(name: &'static str, source: &'t str) -> Result<Self, ComposeError> {
        let mut segments = Vec::new();
        let mut offset = 0;

        while let Some(found) = source[offset..].find(OPEN) {
            let start = offset + found;
            if start > offset {
                segments.push(Segment::Literal(&source[offset..start]));
            }

            let inner_start = start + OPEN.len();
            let Some(len) = source[inner_start..].find(CLOSE) else {
                return Err(parse_error(name, source, start, "unterminated placeholder"));
            };
            let inner = &source[inner_start..inner_start + len];
            let column = source[..start].rsplit('\n').next().map_or(0, |line| line.chars().count());
            let slot = parse_slot(inner.trim(), column)
                .map_err(|message| parse_error(name, source, start, &message))?;

            segments.push(Segment::Slot(slot));
            offset = inner_start + len + CLOSE.len();
        }

        if offset < source.len() {
            segments.push(Segment::Literal(&source[offset..]));
        }

        Ok(Self { name, segments })
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment<'t>] {
        &self.segments
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot<'t>> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(slot) => Some(slot),
            Segment::Literal(_) => None,
        })
    }
}

fn parse_slot(inner: &str, column: usize) -> Result<Slot<'_>, String> {
    let (kind_spec, name) =
        inner.split_once(':').ok_or_else(|| format!("expected `kind:name`, found `{inner}`"))?;
    let (kind_spec, name) = (kind_spec.trim(), name.trim());

    let (kind_name, limit) = match kind_spec.split_once('(') {
        Some((kind, rest)) => {
            let digits = rest
                .strip_suffix(')')
                .ok_or_else(|| format!("unclosed limit in `{kind_spec}`"))?;
            let limit = digits
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("limit must be a positive integer, found `{digits}`"))?;
            (kind.trim(), Some(limit))
        },
        None => (kind_spec, None),
    };

    let kind: SlotKind =
        kind_name.parse().map_err(|_| format!("unknown slot kind `{kind_name}`"))?;

    let valid_name = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid_name {
        return Err(format!("invalid slot name `{name}`"));
    }

    Ok(Slot { kind, name, limit, column })
}

fn parse_error(template: &str, source: &str, at: usize, message: &str) -> ComposeError {
    let line = source[..at].matches('\n').count() + 1;
    ComposeError::render(message.to_owned(), format!("{template}:{line}"))
}
