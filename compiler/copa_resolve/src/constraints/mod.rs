//! Generic constraint checks for supplied type arguments.
//!
//! Only constraints whose satisfaction can be decided from the snapshot are
//! checked: `class`, `struct`, `unmanaged`, `notnull` and `new()`. Base type
//! and interface constraints are accepted as written.

use copa_ir::type_text::{categorize, TypeCategory};
use copa_ir::{
    Accessibility, Modifiers, SymbolGraphProvider, SymbolId, SymbolKind, TypeKind, TypeParam,
};

/// A supplied type argument and the type it denotes, when known.
#[derive(Copy, Clone, Debug)]
pub struct TypeArgument<'a> {
    pub text: &'a str,
    pub symbol: Option<SymbolId>,
}

impl TypeArgument<'_> {
    fn is_nullable(&self) -> bool {
        self.text.trim_end().ends_with('?')
    }

    /// `Some(true)` for value types, `Some(false)` for reference types.
    fn is_value_type(&self, graph: &dyn SymbolGraphProvider) -> Option<bool> {
        match categorize(self.text) {
            TypeCategory::Value => Some(true),
            TypeCategory::Reference => Some(false),
            TypeCategory::Unknown => self
                .symbol
                .and_then(|id| graph.symbol(id).type_kind())
                .map(TypeKind::is_value_type),
        }
    }

    /// `Some(false)` when the type certainly lacks a public parameterless constructor.
    fn has_default_constructor(&self, graph: &dyn SymbolGraphProvider) -> Option<bool> {
        if categorize(self.text) != TypeCategory::Unknown {
            return Some(self.text.trim() != "string");
        }
        let id = self.symbol?;
        let sym = graph.symbol(id);
        let kind = sym.type_kind()?;
        if kind == TypeKind::Interface
            || kind == TypeKind::Delegate
            || sym.modifiers.intersects(Modifiers::ABSTRACT | Modifiers::STATIC)
        {
            return Some(false);
        }
        if kind.is_value_type() {
            return Some(true);
        }
        let mut ctors = sym
            .members
            .iter()
            .map(|m| graph.symbol(*m))
            .filter(|m| m.kind == SymbolKind::Constructor)
            .peekable();
        if ctors.peek().is_none() {
            return Some(true);
        }
        Some(ctors.any(|c| {
            c.params.is_empty() && (c.accessibility == Accessibility::Public || c.is_implicit())
        }))
    }
}

/// First constraint of `param` that `argument` violates.
pub fn violated_constraint<'p>(
    graph: &dyn SymbolGraphProvider,
    param: &'p TypeParam,
    argument: TypeArgument<'_>,
) -> Option<&'p str> {
    param
        .constraints
        .iter()
        .map(String::as_str)
        .find(|constraint| {
            let constraint = constraint.trim();
            match constraint {
                "class" | "class?" => argument.is_value_type(graph) == Some(true),
                "struct" | "unmanaged" => {
                    argument.is_nullable() || argument.is_value_type(graph) == Some(false)
                }
                "notnull" => argument.is_nullable(),
                "new()" => argument.has_default_constructor(graph) == Some(false),
                _ => false,
            }
        })
}

#[cfg(test)]
mod tests;
