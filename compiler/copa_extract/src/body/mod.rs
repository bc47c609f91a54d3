//! Bodies of methods and accessors.

use copa_ir::{AccessorKind, Body, Symbol, SymbolKind, TypeParam};
use rustc_hash::FxHashMap;

/// Block form of `body`.
///
/// Expression bodies become `{ return expr; }` when the destination produces
/// a value and `{ expr; }` otherwise.
pub fn to_block(body: &Body, returns_value: bool) -> String {
    match body {
        Body::Block(text) => text.clone(),
        Body::Expression(expr) if returns_value => format!("{{ return {}; }}", expr.trim()),
        Body::Expression(expr) => format!("{{ {}; }}", expr.trim()),
    }
}

/// Body equivalent to an auto-implemented accessor of `owner`.
pub fn implicit_accessor_body(owner: &Symbol, kind: AccessorKind) -> String {
    let member = if owner.kind == SymbolKind::Indexer {
        let args: Vec<&str> = owner.params.iter().map(|p| p.name.as_str()).collect();
        format!("this[{}]", args.join(", "))
    } else {
        owner.name.clone()
    };
    match kind {
        AccessorKind::Get => format!("{{ return {member}; }}"),
        AccessorKind::Set => format!("{{ {member} = value; }}"),
        AccessorKind::Add => format!("{{ {member} += value; }}"),
        AccessorKind::Remove => format!("{{ {member} -= value; }}"),
    }
}

/// Whether a destination of this shape expects `return expr;`.
pub(crate) fn returns_value(destination: &Symbol) -> bool {
    match destination.kind {
        SymbolKind::Constructor | SymbolKind::Destructor => false,
        _ => destination
            .return_type
            .as_deref()
            .is_some_and(|ty| ty.trim() != "void"),
    }
}

/// Map source type parameter names onto the destination's, by position.
///
/// Names already bound (to concrete arguments) are kept.
pub(crate) fn map_type_params(
    source: &[TypeParam],
    destination: &[TypeParam],
    map: &mut FxHashMap<String, String>,
) {
    if source.len() != destination.len() {
        return;
    }
    for (s, d) in source.iter().zip(destination) {
        if s.name != d.name && !map.contains_key(&s.name) {
            map.insert(s.name.clone(), d.name.clone());
        }
    }
}

/// Renames that fit a copied body onto the destination signature.
///
/// Supplied type arguments come first, then method type parameters and
/// parameter names by position. A copied `set`, `add` or `remove` accessor
/// contributes its implicit `value` parameter after the declared ones.
pub(crate) fn signature_substitutions(
    source: &Symbol,
    accessor: Option<AccessorKind>,
    destination: &Symbol,
    type_arguments: &[(String, String)],
) -> FxHashMap<String, String> {
    let mut map: FxHashMap<String, String> = type_arguments.iter().cloned().collect();
    map_type_params(&source.type_params, &destination.type_params, &mut map);

    let mut names: Vec<&str> = source.params.iter().map(|p| p.name.as_str()).collect();
    if accessor.is_some_and(AccessorKind::takes_value) {
        names.push("value");
    }
    if names.len() == destination.params.len() {
        for (name, param) in names.into_iter().zip(&destination.params) {
            if name != param.name {
                map.insert(name.to_string(), param.name.clone());
            }
        }
    }
    map
}

#[cfg(test)]
mod tests;
