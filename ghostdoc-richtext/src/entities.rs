//! HTML character reference decoding.
//!
//! Named references resolve against the full HTML5 table. Numeric references
//! follow the HTML5 rules: C1 controls are read as Windows-1252, while NUL,
//! surrogates and out-of-range values become U+FFFD. The legacy names that
//! browsers accept without a trailing `;` (`&amp`, `&eacute`, `&nbsp`) decode
//! too, also as the prefix of a longer word. Anything else passes through
//! unchanged.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]+)|#[xX]([0-9a-fA-F]+)|([a-zA-Z][a-zA-Z0-9]{0,31}))(;?)")
        .expect("invalid entity regex")
});

/// Named references valid without a trailing semicolon.
const LEGACY_NAMES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil", "ETH",
    "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT", "Ntilde",
    "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN", "Uacute",
    "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave", "amp",
    "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Decode character references in `text`.
///
/// Borrows the input when it contains no `&`.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    decode(text, false)
}

/// Decode character references in an attribute value.
///
/// Same as [`decode_entities`], except that a legacy name without `;` stays
/// literal when a letter, digit or `=` follows it, so query strings such as
/// `?a=1&copy=2` survive.
pub fn decode_attribute(value: &str) -> Cow<'_, str> {
    decode(value, true)
}

fn decode(text: &str, in_attribute: bool) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    ENTITY_PATTERN.replace_all(text, |caps: &Captures| {
        if let Some(digits) = caps.get(1) {
            return numeric_reference(digits.as_str(), 10).to_string();
        }
        if let Some(digits) = caps.get(2) {
            return numeric_reference(digits.as_str(), 16).to_string();
        }
        let name = &caps[3];
        let terminated = !caps[4].is_empty();
        if in_attribute && !terminated {
            let next_is_equals = text[caps.get(0).map_or(text.len(), |m| m.end())..].starts_with('=');
            if next_is_equals || !LEGACY_NAMES.contains(&name) {
                return caps[0].to_string();
            }
        }
        named_reference(name, terminated).unwrap_or_else(|| caps[0].to_string())
    })
}

fn numeric_reference(digits: &str, radix: u32) -> char {
    let code = u32::from_str_radix(digits, radix).unwrap_or(u32::MAX);
    match code {
        0 => '\u{fffd}',
        0x80..=0x9f => windows_1252(code),
        _ => char::from_u32(code).unwrap_or('\u{fffd}'),
    }
}

/// Windows-1252 reading of a C1 control code. Undefined slots stay as is.
fn windows_1252(code: u32) -> char {
    match code {
        0x80 => '\u{20ac}',
        0x82 => '\u{201a}',
        0x83 => '\u{0192}',
        0x84 => '\u{201e}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02c6}',
        0x89 => '\u{2030}',
        0x8a => '\u{0160}',
        0x8b => '\u{2039}',
        0x8c => '\u{0152}',
        0x8e => '\u{017d}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201c}',
        0x94 => '\u{201d}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02dc}',
        0x99 => '\u{2122}',
        0x9a => '\u{0161}',
        0x9b => '\u{203a}',
        0x9c => '\u{0153}',
        0x9e => '\u{017e}',
        0x9f => '\u{0178}',
        _ => char::from_u32(code).unwrap_or('\u{fffd}'),
    }
}

/// Resolve `&name` (with `;` when `terminated`).
fn named_reference(name: &str, terminated: bool) -> Option<String> {
    if terminated {
        if let Some(decoded) = lookup(name) {
            return Some(decoded);
        }
    }
    // Longest legacy name the reference starts with, the rest kept as text.
    let prefix = LEGACY_NAMES
        .iter()
        .filter(|legacy| name.starts_with(**legacy))
        .max_by_key(|legacy| legacy.len())?;
    let decoded = lookup(prefix)?;
    let semicolon = if terminated { ";" } else { "" };
    Some(format!("{decoded}{}{semicolon}", &name[prefix.len()..]))
}

fn lookup(name: &str) -> Option<String> {
    let reference = format!("&{name};");
    match html_escape::decode_html_entities(&reference) {
        Cow::Owned(decoded) if decoded != reference => Some(decoded),
        _ => None,
    }
}
