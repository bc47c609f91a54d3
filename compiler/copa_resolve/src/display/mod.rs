//! Human-readable symbol names for messages and provenance tags.

use copa_ir::{Symbol, SymbolGraphProvider, SymbolId, SymbolKind};

use crate::ResolvedTarget;

fn param_list(sym: &Symbol) -> String {
    let mut parts: Vec<String> = sym
        .params
        .iter()
        .map(|p| match p.ref_kind.keyword() {
            Some(kw) => format!("{kw} {}", p.ty),
            None => p.ty.clone(),
        })
        .collect();
    if sym.varargs {
        parts.push("__arglist".to_string());
    }
    parts.join(", ")
}

fn type_param_list(sym: &Symbol) -> String {
    if sym.type_params.is_empty() {
        String::new()
    } else {
        let names: Vec<&str> = sym.type_params.iter().map(|tp| tp.name.as_str()).collect();
        format!("<{}>", names.join(", "))
    }
}

/// Signature of a member without its container, e.g. `Target()`,
/// `Map<T>(int, string)`, `this[int]`, `~Widget()`.
pub fn member_signature(graph: &dyn SymbolGraphProvider, id: SymbolId) -> String {
    let sym = graph.symbol(id);
    match sym.kind {
        SymbolKind::Namespace => graph.qualified_name(id),
        SymbolKind::Type(_) => format!("{}{}", graph.qualified_name(id), type_param_list(sym)),
        SymbolKind::Method
        | SymbolKind::Constructor
        | SymbolKind::Operator(_)
        | SymbolKind::Conversion { .. } => {
            format!("{}{}({})", sym.name, type_param_list(sym), param_list(sym))
        }
        SymbolKind::Destructor => format!("~{}()", sym.name),
        SymbolKind::Indexer => format!("this[{}]", param_list(sym)),
        SymbolKind::Property | SymbolKind::Event | SymbolKind::Field => sym.name.clone(),
    }
}

/// Member signature prefixed with its containing type, e.g. `N.Widget.Target()`.
pub fn qualified_signature(graph: &dyn SymbolGraphProvider, id: SymbolId) -> String {
    let sym = graph.symbol(id);
    if sym.kind.is_container() {
        return member_signature(graph, id);
    }
    match sym.container {
        Some(container) if container != graph.global_namespace() => {
            format!("{}.{}", graph.qualified_name(container), member_signature(graph, id))
        }
        _ => member_signature(graph, id),
    }
}

/// Provenance tag attached to a generation unit: the target's signature,
/// with an accessor suffix when one was selected.
pub fn provenance(graph: &dyn SymbolGraphProvider, target: &ResolvedTarget) -> String {
    let signature = member_signature(graph, target.symbol);
    match target.accessor {
        Some(accessor) => format!("{signature}_{}", accessor.keyword()),
        None => signature,
    }
}
