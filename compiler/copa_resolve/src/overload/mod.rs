//! Overload filtering by explicit parameter lists.
//!
//! A candidate matches when it has the same number of parameters, the same
//! passing modes and the same parameter types after substituting supplied
//! generic arguments for the candidate's type parameters. `params` arrays
//! match a plain array type; `ref`, `in` and `out` must agree exactly.

use copa_ir::type_text::{same_type, substitute_identifiers};
use copa_ir::{RefKind, Symbol, SymbolKind};
use copa_reference::ParamList;
use rustc_hash::FxHashMap;

/// Kinds that can be selected with a parameter list.
pub fn takes_parameter_list(kind: SymbolKind) -> bool {
    kind.is_method_like() || kind == SymbolKind::Indexer
}

fn same_mode(declared: RefKind, supplied: RefKind) -> bool {
    let loosen = |k| if k == RefKind::Params { RefKind::None } else { k };
    loosen(declared) == loosen(supplied)
}

/// Whether `candidate`'s signature equals `list`.
pub fn parameters_match(
    candidate: &Symbol,
    list: &ParamList,
    substitutions: &FxHashMap<String, String>,
) -> bool {
    if candidate.params.len() != list.params.len() || candidate.varargs != list.arglist {
        return false;
    }
    candidate.params.iter().zip(&list.params).all(|(declared, supplied)| {
        same_mode(declared.ref_kind, supplied.ref_kind)
            && same_type(
                &substitute_identifiers(&declared.ty, substitutions),
                &supplied.ty,
            )
    })
}

#[cfg(test)]
mod tests;
