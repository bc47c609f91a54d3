//! Attribute-shaped inputs of the generator.
//!
//! A [`CopyDirective`] mirrors the copy attribute placed on a destination
//! declaration; a [`PatternAttribute`] mirrors the search/replace attribute
//! placed next to it.

use crate::{AdditionalNodes, Location, SymbolId};

/// What a directive points at, before resolution.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DirectiveTarget {
    /// Textual reference, parsed by the reference parser.
    Reference(String),
    /// Already-bound type handle (`typeof(T)` form); skips parsing.
    Type(SymbolId),
}

impl DirectiveTarget {
    pub fn text(reference: impl Into<String>) -> Self {
        DirectiveTarget::Reference(reference.into())
    }
}

/// A "copy the implementation of X into me" request.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CopyDirective {
    /// `None` models a null target argument.
    pub target: Option<DirectiveTarget>,
    pub additional_nodes: AdditionalNodes,
    pub add_usings: Vec<String>,
    pub order: i32,
    pub partial_part: Option<String>,
    pub handle_special_members: bool,
    pub location: Location,
}

impl CopyDirective {
    pub fn new(target: DirectiveTarget, location: Location) -> Self {
        CopyDirective {
            target: Some(target),
            additional_nodes: AdditionalNodes::NONE,
            add_usings: Vec::new(),
            order: 0,
            partial_part: None,
            handle_special_members: true,
            location,
        }
    }

    /// Directive with a null target argument.
    pub fn without_target(location: Location) -> Self {
        CopyDirective {
            target: None,
            ..Self::new(DirectiveTarget::text(""), location)
        }
    }

    #[must_use]
    pub fn with_nodes(mut self, nodes: AdditionalNodes) -> Self {
        self.additional_nodes = nodes;
        self
    }

    #[must_use]
    pub fn with_using(mut self, namespace: impl Into<String>) -> Self {
        self.add_usings.push(namespace.into());
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_partial_part(mut self, part: impl Into<String>) -> Self {
        self.partial_part = Some(part.into());
        self
    }

    #[must_use]
    pub fn with_special_members(mut self, handle: bool) -> Self {
        self.handle_special_members = handle;
        self
    }

    /// Whether two directives carry identical surface values.
    pub fn is_equivalent_to(&self, other: &CopyDirective) -> bool {
        self.target == other.target
            && self.additional_nodes == other.additional_nodes
            && self.add_usings == other.add_usings
            && self.order == other.order
            && self.partial_part == other.partial_part
            && self.handle_special_members == other.handle_special_members
    }
}

/// An ordered textual search/replace rule.
///
/// `None` values model null attribute arguments; a null search degrades the
/// rule to a no-op, a null replacement means "replace with nothing".
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct PatternAttribute {
    pub search: Option<String>,
    pub replacement: Option<String>,
    pub order: i32,
    pub location: Location,
}

impl PatternAttribute {
    pub fn new(search: impl Into<String>, replacement: impl Into<String>, location: Location) -> Self {
        PatternAttribute {
            search: Some(search.into()),
            replacement: Some(replacement.into()),
            order: 0,
            location,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}
