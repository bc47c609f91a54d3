//! Part selection and member lists of type targets.

use copa_ir::type_text::{is_ident_continue, is_ident_start, substitute_identifiers};
use copa_ir::{Symbol, SymbolGraphProvider, SymbolKind};
use rustc_hash::FxHashMap;

use crate::ExtractError;

/// Indices of the parts a directive copies from.
///
/// Without a part name every part is selected.
pub(crate) fn select_parts(
    source: &Symbol,
    source_name: impl FnOnce() -> String,
    part_name: Option<&str>,
) -> Result<Vec<usize>, ExtractError> {
    match part_name {
        None => Ok((0..source.parts.len()).collect()),
        Some(name) => match source.part_named(name) {
            Some(index) => Ok(vec![index]),
            None => Err(ExtractError::UnknownPartialPart {
                part: name.to_string(),
                target: source_name(),
                available: source
                    .parts
                    .iter()
                    .filter_map(|p| p.part_name.clone())
                    .collect(),
            }),
        },
    }
}

fn is_special(kind: SymbolKind) -> bool {
    matches!(
        kind,
        SymbolKind::Constructor
            | SymbolKind::Destructor
            | SymbolKind::Operator(_)
            | SymbolKind::Conversion { .. }
    )
}

/// Member declarations of `source` that live in the selected parts.
///
/// Compiler-generated members have no text and are skipped. With
/// `handle_special_members`, constructor, destructor and operator headers
/// are renamed from the source type to the destination type.
pub(crate) fn type_members(
    graph: &dyn SymbolGraphProvider,
    source: &Symbol,
    selected: &[usize],
    destination: &Symbol,
    handle_special_members: bool,
    substitutions: &FxHashMap<String, String>,
) -> Vec<String> {
    let mut members = Vec::new();
    for &id in &source.members {
        let member = graph.symbol(id);
        if member.is_implicit() {
            continue;
        }
        for part in &member.parts {
            if !selected.contains(&part.enclosing_part) || part.text.trim().is_empty() {
                continue;
            }
            let mut text = substitute_identifiers(&part.text, substitutions);
            if handle_special_members && is_special(member.kind) {
                text = rename_in_header(&text, &source.name, &destination.name);
            }
            members.push(text);
        }
    }
    members
}

/// Members generated earlier in the pass for `source`, re-adapted to
/// `destination`.
///
/// The text no longer says which declarations are special, so constructor,
/// destructor and operator headers are recognized by their shape.
pub(crate) fn inherited_members(
    generated: &[String],
    source: &Symbol,
    destination: &Symbol,
    handle_special_members: bool,
    substitutions: &FxHashMap<String, String>,
) -> Vec<String> {
    generated
        .iter()
        .map(|member| {
            let text = substitute_identifiers(member, substitutions);
            if handle_special_members && is_special_header(&text, &source.name) {
                rename_in_header(&text, &source.name, &destination.name)
            } else {
                text
            }
        })
        .collect()
}

/// Whether `text` declares an operator, or a constructor or destructor of
/// `type_name`.
fn is_special_header(text: &str, type_name: &str) -> bool {
    let header = &text[..header_end(text)];
    if header
        .split(|c: char| !is_ident_continue(c))
        .any(|word| word == "operator")
    {
        return true;
    }
    let mut rest = header;
    while let Some(at) = rest.find(type_name) {
        let before = rest[..at].chars().next_back();
        let after = &rest[at + type_name.len()..];
        let whole = !before.is_some_and(is_ident_continue) && !after.starts_with(is_ident_continue);
        if whole && after.trim_start().starts_with('(') {
            return true;
        }
        rest = after;
    }
    false
}

/// Replace whole-identifier occurrences of `from` with `to` in the
/// declaration header, i.e. before the first `{`, `=>` or `;`.
pub fn rename_in_header(text: &str, from: &str, to: &str) -> String {
    if from == to {
        return text.to_string();
    }
    let end = header_end(text);
    let (header, rest) = text.split_at(end);

    let mut out = String::with_capacity(text.len());
    let mut chars = header.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if is_ident_start(c) {
            let mut stop = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if !is_ident_continue(next) {
                    break;
                }
                stop = i + next.len_utf8();
                chars.next();
            }
            let ident = &header[start..stop];
            out.push_str(if ident == from { to } else { ident });
        } else {
            out.push(c);
        }
    }
    out.push_str(rest);
    out
}

fn header_end(text: &str) -> usize {
    let brace = text.find('{');
    let arrow = text.find("=>");
    let semi = text.find(';');
    [brace, arrow, semi]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests;
