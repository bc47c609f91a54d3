use copa_ir::{AccessorKind, Location, SymbolId, SymbolKind};
use rustc_hash::FxHashMap;

/// The unique symbol a reference was bound to. Never mutated after resolution.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ResolvedTarget {
    pub symbol: SymbolId,
    pub kind: SymbolKind,
    /// Selected accessor of a property, indexer or event.
    pub accessor: Option<AccessorKind>,
    /// Declaring location; `None` for metadata-only symbols.
    pub declaration: Option<Location>,
    /// Type parameter name to supplied argument, for every generic segment
    /// of the reference that carried concrete arguments.
    pub type_arguments: Vec<(String, String)>,
}

impl ResolvedTarget {
    pub fn is_type(&self) -> bool {
        self.kind.is_type()
    }

    /// Type argument substitutions as a lookup map.
    pub fn substitutions(&self) -> FxHashMap<String, String> {
        self.type_arguments.iter().cloned().collect()
    }
}
