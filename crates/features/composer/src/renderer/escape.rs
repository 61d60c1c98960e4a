//! Encoders for each slot kind. Every function either returns text that cannot change
//! the structure of the surrounding document or refuses the value.

use crate::selection::is_implicit_address;
use std::fmt::Write as _;

/// Python double-quoted string literal. Non-ASCII is escaped so the output stays ASCII.
pub(crate) fn text_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            },
            c if c.is_ascii() => out.push(c),
            c if u32::from(c) <= 0xffff => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            },
            c => {
                let _ = write!(out, "\\U{:08x}", u32::from(c));
            },
        }
    }
    out.push('"');
    out
}

/// `sp.bytes("0x…")` over the UTF-8 encoding.
pub(crate) fn bytes_literal(value: &str) -> String {
    format!("sp.bytes(\"0x{}\")", hex::encode(value.as_bytes()))
}

pub(crate) fn address_literal(value: &str) -> Option<String> {
    is_implicit_address(value).then(|| format!("sp.address(\"{value}\")"))
}

/// Canonical decimal digits, or `None` for anything that is not an unsigned integer.
pub(crate) fn nat_literal(value: &str) -> Option<String> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let trimmed = value.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0".to_owned() } else { trimmed.to_owned() })
}

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

pub(crate) fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !PYTHON_KEYWORDS.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_literal_escapes_delimiters_and_controls() {
        assert_eq!(text_literal(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(text_literal("line\nbreak\u{7}"), r#""line\nbreak\x07""#);
        assert_eq!(text_literal("{{ text:x }}"), r#""{{ text:x }}""#);
        assert_eq!(text_literal("é🙂"), r#""\u00e9\U0001f642""#);
    }

    #[test]
    fn bytes_literal_is_hex() {
        assert_eq!(bytes_literal("6"), r#"sp.bytes("0x36")"#);
        assert_eq!(bytes_literal("\")"), r#"sp.bytes("0x2229")"#);
        assert_eq!(bytes_literal(""), r#"sp.bytes("0x")"#);
    }

    #[test]
    fn nat_literal_is_canonical() {
        assert_eq!(nat_literal("1000").as_deref(), Some("1000"));
        assert_eq!(nat_literal("007").as_deref(), Some("7"));
        assert_eq!(nat_literal("0").as_deref(), Some("0"));
        for bad in ["", "-1", "+1", "1e3", "1_000", " 1"] {
            assert!(nat_literal(bad).is_none(), "{bad}");
        }
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("Fa1_2Token"));
        assert!(is_identifier("_private"));
        for bad in ["", "1abc", "a-b", "a b", "class", "None", "Tok\u{e9}n"] {
            assert!(!is_identifier(bad), "{bad}");
        }
    }

    #[test]
    fn addresses_are_revalidated() {
        assert!(address_literal("tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb").is_some());
        assert!(address_literal("tz1\"); sp.failwith(\"x").is_none());
    }
}
