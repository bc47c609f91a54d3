//! In-memory program snapshot.
//!
//! `ProgramSnapshot` is the concrete [`SymbolGraphProvider`] used by hosts
//! that hand the generator a pre-built symbol table, and by every test in the
//! workspace. It is built once through [`SnapshotBuilder`] and never mutated
//! afterwards.
//!
//! # Design
//!
//! - Symbols stored in a single `Vec<Symbol>` arena, addressed by `SymbolId`
//! - Member lookup through a `(scope, name)` index built at `finish()`
//! - Implicit default constructors synthesized at `finish()`

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    Accessibility, AccessorKind, FileId, Modifiers, Symbol, SymbolGraphProvider, SymbolId,
    SymbolKind,
};

/// Immutable symbol table of one compilation.
#[derive(Clone, Debug)]
pub struct ProgramSnapshot {
    symbols: Vec<Symbol>,
    files: Vec<String>,
    global: SymbolId,
    /// (scope, name) → members, in declaration order.
    members_by_name: FxHashMap<(SymbolId, String), Vec<SymbolId>>,
}

impl ProgramSnapshot {
    /// Number of symbols in the arena.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Path registered for a file id.
    pub fn file_path(&self, file: FileId) -> Option<&str> {
        self.files.get(file.index()).map(String::as_str)
    }

    /// Find a namespace or type by dotted name from the global namespace.
    ///
    /// Generic argument lists in the path are ignored.
    pub fn find_qualified(&self, path: &str) -> Option<SymbolId> {
        let path = path.trim().trim_start_matches("global::");
        let mut current = self.global;
        for segment in split_path(path) {
            let name = segment.split(['<', '{']).next().unwrap_or(segment).trim();
            current = self
                .lookup_member(current, name)
                .into_iter()
                .find(|id| self.symbols[id.index()].kind.is_container())?;
        }
        Some(current)
    }

    /// Whether `derived` is `base` or inherits from it.
    pub fn derives_from(&self, derived: SymbolId, base: SymbolId) -> bool {
        let mut seen = FxHashSet::default();
        let mut current = Some(derived);
        while let Some(id) = current {
            if id == base {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.symbols[id.index()].base_symbol;
        }
        false
    }

    /// Whether `from` is `scope` or nested anywhere inside it.
    fn is_within(&self, from: SymbolId, scope: SymbolId) -> bool {
        from == scope || self.containers(from).contains(&scope)
    }

    /// Whether `from` sits inside a type deriving from `scope`.
    fn is_within_derived(&self, from: SymbolId, scope: SymbolId) -> bool {
        std::iter::once(from)
            .chain(self.containers(from))
            .filter(|c| self.symbols[c.index()].kind.is_type())
            .any(|c| self.derives_from(c, scope))
    }

    fn is_accessible_one(&self, target: SymbolId, from: SymbolId) -> bool {
        let sym = &self.symbols[target.index()];
        let Some(container) = sym.container else {
            return true;
        };
        let internal = !self.is_external_tree(target);
        let private = || self.is_within(from, container);
        let protected = || private() || self.is_within_derived(from, container);
        match sym.accessibility {
            Accessibility::Public => true,
            Accessibility::Internal => internal,
            Accessibility::Private => private(),
            Accessibility::Protected => protected(),
            Accessibility::ProtectedInternal => internal || protected(),
            Accessibility::PrivateProtected => internal && protected(),
        }
    }

    /// Metadata-only symbols and everything declared inside them.
    fn is_external_tree(&self, id: SymbolId) -> bool {
        std::iter::once(id)
            .chain(self.containers(id))
            .filter(|c| !matches!(self.symbols[c.index()].kind, SymbolKind::Namespace))
            .any(|c| self.symbols[c.index()].is_external())
    }

    /// Parts of `context` and of every symbol containing it.
    fn visible_parts(&self, context: SymbolId) -> impl Iterator<Item = &crate::DeclarationPart> {
        std::iter::once(context)
            .chain(self.containers(context))
            .flat_map(|id| self.symbols[id.index()].parts.iter())
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    // Dots nested inside generic argument lists are not separators.
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut pieces = Vec::new();
    for (i, c) in path.char_indices() {
        match c {
            '<' | '{' => depth += 1,
            '>' | '}' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                pieces.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&path[start..]);
    pieces.into_iter().filter(|p| !p.is_empty())
}

impl SymbolGraphProvider for ProgramSnapshot {
    fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    fn global_namespace(&self) -> SymbolId {
        self.global
    }

    fn lookup_member(&self, scope: SymbolId, name: &str) -> Vec<SymbolId> {
        self.members_by_name
            .get(&(scope, name.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn resolve_alias(&self, context: SymbolId, alias: &str) -> Option<SymbolId> {
        let target = self
            .visible_parts(context)
            .flat_map(|p| p.aliases.iter())
            .find(|a| a.alias == alias)?;
        self.find_qualified(&target.target)
    }

    fn imported_namespaces(&self, context: SymbolId) -> Vec<SymbolId> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        for using in self.visible_parts(context).flat_map(|p| p.usings.iter()) {
            if let Some(ns) = self.find_qualified(using) {
                if seen.insert(ns) {
                    result.push(ns);
                }
            }
        }
        result
    }

    fn is_accessible(&self, target: SymbolId, from: SymbolId) -> bool {
        std::iter::once(target)
            .chain(self.containers(target))
            .all(|id| self.is_accessible_one(id, from))
    }

    fn has_implementation(&self, id: SymbolId, accessor: Option<AccessorKind>) -> bool {
        let sym = &self.symbols[id.index()];
        if sym
            .modifiers
            .intersects(Modifiers::ABSTRACT | Modifiers::EXTERN)
        {
            return false;
        }
        if let Some(kind) = accessor {
            return sym.accessor(kind).is_some();
        }
        if sym.kind.is_method_like() {
            // A directive bearer receives its body from the generator.
            return sym.is_implicit() || sym.body().is_some() || sym.directives().next().is_some();
        }
        true
    }

    fn directive_bearers(&self) -> Vec<SymbolId> {
        let mut bearers: Vec<SymbolId> = self
            .symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| s.directives().next().is_some())
            .map(|(i, _)| symbol_id(i))
            .collect();
        bearers.sort_by_key(|id| (self.symbols[id.index()].location(), *id));
        bearers
    }
}

/// Incremental constructor for [`ProgramSnapshot`].
///
/// ```text
/// let mut b = SnapshotBuilder::new();
/// let file = b.file("Widget.cs");
/// let ns = b.namespace(b.global(), "App");
/// let widget = b.add(ns, Symbol::class("Widget").partial().with_part(...));
/// let snapshot = b.finish();
/// ```
#[derive(Debug)]
pub struct SnapshotBuilder {
    symbols: Vec<Symbol>,
    files: Vec<String>,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        SnapshotBuilder {
            symbols: vec![Symbol::namespace("")],
            files: Vec::new(),
        }
    }

    /// The global namespace.
    pub fn global(&self) -> SymbolId {
        SymbolId::from_raw(0)
    }

    /// Register a source file.
    pub fn file(&mut self, path: impl Into<String>) -> FileId {
        self.files.push(path.into());
        file_id(self.files.len() - 1)
    }

    /// Add a symbol as the last member of `container`.
    pub fn add(&mut self, container: SymbolId, mut symbol: Symbol) -> SymbolId {
        let id = symbol_id(self.symbols.len());
        symbol.container = Some(container);
        self.symbols.push(symbol);
        self.symbols[container.index()].members.push(id);
        id
    }

    /// Get or create a namespace nested in `container`.
    pub fn namespace(&mut self, container: SymbolId, name: &str) -> SymbolId {
        let existing = self.symbols[container.index()]
            .members
            .iter()
            .copied()
            .find(|m| {
                let sym = &self.symbols[m.index()];
                sym.kind == SymbolKind::Namespace && sym.name == name
            });
        existing.unwrap_or_else(|| self.add(container, Symbol::namespace(name)))
    }

    /// Record that `derived` inherits from `base`.
    pub fn set_base(&mut self, derived: SymbolId, base: SymbolId) {
        let base_name = self.symbols[base.index()].name.clone();
        let sym = &mut self.symbols[derived.index()];
        sym.base_symbol = Some(base);
        if sym.base_type.is_none() {
            sym.base_type = Some(base_name);
        }
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    /// Synthesize implicit members and freeze the snapshot.
    pub fn finish(mut self) -> ProgramSnapshot {
        self.synthesize_default_constructors();

        let mut members_by_name: FxHashMap<(SymbolId, String), Vec<SymbolId>> =
            FxHashMap::default();
        for (index, sym) in self.symbols.iter().enumerate() {
            let scope = symbol_id(index);
            for &member in &sym.members {
                members_by_name
                    .entry((scope, self.symbols[member.index()].name.clone()))
                    .or_default()
                    .push(member);
            }
        }

        ProgramSnapshot {
            symbols: self.symbols,
            files: self.files,
            global: SymbolId::from_raw(0),
            members_by_name,
        }
    }

    fn synthesize_default_constructors(&mut self) {
        let needs_ctor: Vec<SymbolId> = self
            .symbols
            .iter()
            .enumerate()
            .filter(|(_, sym)| {
                sym.type_kind().is_some_and(|k| k.has_default_constructor())
                    && !sym.is_static()
                    && !sym.is_external()
                    && !sym.members.iter().any(|m| {
                        self.symbols[m.index()].kind == SymbolKind::Constructor
                    })
            })
            .map(|(i, _)| symbol_id(i))
            .collect();

        for ty in needs_ctor {
            let name = self.symbols[ty.index()].name.clone();
            let ctor = Symbol::constructor(name)
                .public()
                .with_modifiers(Modifiers::IMPLICIT);
            self.add(ty, ctor);
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "symbol counts of one snapshot fit in u32"
)]
fn symbol_id(index: usize) -> SymbolId {
    SymbolId::from_raw(index as u32)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "file counts of one snapshot fit in u32"
)]
fn file_id(index: usize) -> FileId {
    FileId::from_raw(index as u32)
}
