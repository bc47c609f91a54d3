//! The symbol graph oracle consumed by the generator.
//!
//! Every phase receives an explicit `&dyn SymbolGraphProvider`; there is no
//! ambient lookup. Implementations must be immutable for the duration of a
//! pass, which is what makes parallel resolution safe.

use crate::{AccessorKind, Symbol, SymbolId};

pub trait SymbolGraphProvider: Sync {
    /// Symbol data for an id handed out by this provider.
    fn symbol(&self, id: SymbolId) -> &Symbol;

    /// Root namespace (`global::`).
    fn global_namespace(&self) -> SymbolId;

    /// Direct members of `scope` with the given name, in declaration order.
    fn lookup_member(&self, scope: SymbolId, name: &str) -> Vec<SymbolId>;

    /// Target of a using alias visible from `context`.
    fn resolve_alias(&self, context: SymbolId, alias: &str) -> Option<SymbolId>;

    /// Namespaces imported by the files declaring `context`.
    fn imported_namespaces(&self, context: SymbolId) -> Vec<SymbolId>;

    /// Whether `target` may be referenced from `from` in the requesting compilation.
    fn is_accessible(&self, target: SymbolId, from: SymbolId) -> bool;

    /// Whether `id` (or its accessor) has a body, explicit or implicit.
    fn has_implementation(&self, id: SymbolId, accessor: Option<AccessorKind>) -> bool;

    /// Every symbol carrying at least one copy directive, in source order.
    fn directive_bearers(&self) -> Vec<SymbolId>;

    /// Chain of containing symbols, innermost first, excluding `id`.
    fn containers(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut chain = Vec::new();
        let mut current = self.symbol(id).container;
        while let Some(c) = current {
            chain.push(c);
            current = self.symbol(c).container;
        }
        chain
    }

    /// Dotted name from the global namespace, e.g. `N.Outer.Inner`.
    fn qualified_name(&self, id: SymbolId) -> String {
        let global = self.global_namespace();
        let mut names: Vec<&str> = self
            .containers(id)
            .into_iter()
            .filter(|c| *c != global)
            .map(|c| self.symbol(c).name.as_str())
            .collect();
        names.reverse();
        if id != global {
            names.push(self.symbol(id).name.as_str());
        }
        names.join(".")
    }

    /// Nearest enclosing type of `id`, or `id` itself if it is a type.
    fn enclosing_type(&self, id: SymbolId) -> Option<SymbolId> {
        if self.symbol(id).kind.is_type() {
            return Some(id);
        }
        self.containers(id)
            .into_iter()
            .find(|c| self.symbol(*c).kind.is_type())
    }
}
