//! Token-level helpers over type and code text.
//!
//! Types are compared textually after normalization: whitespace is dropped,
//! `global::` prefixes are removed and predefined type names are folded to
//! their keyword spelling (`System.Int32` and `Int32` become `int`).

use rustc_hash::FxHashMap;

/// Predefined types: keyword and framework name.
const PREDEFINED: &[(&str, &str)] = &[
    ("bool", "Boolean"),
    ("byte", "Byte"),
    ("sbyte", "SByte"),
    ("char", "Char"),
    ("decimal", "Decimal"),
    ("double", "Double"),
    ("float", "Single"),
    ("int", "Int32"),
    ("uint", "UInt32"),
    ("nint", "IntPtr"),
    ("nuint", "UIntPtr"),
    ("long", "Int64"),
    ("ulong", "UInt64"),
    ("short", "Int16"),
    ("ushort", "UInt16"),
    ("object", "Object"),
    ("string", "String"),
    ("void", "Void"),
];

/// Category of a type argument, as far as it can be known from text alone.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeCategory {
    /// Predefined struct (`int`, `double`, ...), also unmanaged.
    Value,
    /// `object`, `string`, arrays.
    Reference,
    /// Needs a symbol lookup.
    Unknown,
}

fn keyword_for(name: &str) -> Option<&'static str> {
    let bare = name.strip_prefix("System.").unwrap_or(name);
    PREDEFINED
        .iter()
        .find(|(kw, framework)| *kw == bare || *framework == bare)
        .map(|(kw, _)| *kw)
}

pub fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

pub fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Normalize a type spelling for comparison.
pub fn normalize_type(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.replace("global::", "");
    let chars: Vec<char> = compact.chars().collect();

    let mut out = String::with_capacity(compact.len());
    let mut i = 0;
    while i < chars.len() {
        if is_ident_start(chars[i]) {
            // Dotted name: ident(.ident)*
            let start = i;
            while i < chars.len() && (is_ident_continue(chars[i]) || chars[i] == '.') {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            match keyword_for(&name) {
                Some(kw) => out.push_str(kw),
                None => out.push_str(&name),
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Whether two type spellings denote the same type text.
pub fn same_type(a: &str, b: &str) -> bool {
    normalize_type(a) == normalize_type(b)
}

/// Classify a type argument for constraint checks.
pub fn categorize(text: &str) -> TypeCategory {
    let normalized = normalize_type(text);
    if normalized.ends_with(']') {
        return TypeCategory::Reference;
    }
    match normalized.as_str() {
        "object" | "string" => TypeCategory::Reference,
        "void" => TypeCategory::Unknown,
        other if PREDEFINED.iter().any(|(kw, _)| *kw == other) => TypeCategory::Value,
        _ => TypeCategory::Unknown,
    }
}

/// Replace whole identifiers according to `map`, simultaneously.
///
/// String and character literals and comments are left untouched, and so are
/// identifiers that follow a `.` (member accesses).
pub fn substitute_identifiers(text: &str, map: &FxHashMap<String, String>) -> String {
    if map.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut prev_significant: Option<char> = None;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                let start = i;
                i = skip_literal(&chars, i, c);
                out.extend(&chars[start..i]);
                prev_significant = Some(c);
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                let start = i;
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                out.extend(&chars[start..i]);
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let start = i;
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
                out.extend(&chars[start..i]);
            }
            c if is_ident_start(c) => {
                let start = i;
                while i < chars.len() && is_ident_continue(chars[i]) {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                let replacement = if prev_significant == Some('.') {
                    None
                } else {
                    map.get(&ident)
                };
                out.push_str(replacement.map_or(ident.as_str(), String::as_str));
                prev_significant = Some('a');
            }
            c => {
                out.push(c);
                if !c.is_whitespace() {
                    prev_significant = Some(c);
                }
                i += 1;
            }
        }
    }
    out
}

/// Skip a string or char literal starting at `start`; returns the index after it.
fn skip_literal(chars: &[char], start: usize, quote: char) -> usize {
    let verbatim = quote == '"' && start > 0 && chars[start - 1] == '@';
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            if verbatim && chars.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        if c == '\\' && !verbatim {
            i += 2;
            continue;
        }
        i += 1;
    }
    chars.len()
}
