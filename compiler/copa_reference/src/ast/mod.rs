//! Parsed member references.
//!
//! A [`MemberReference`] is a sum type over the shapes a reference can take
//! (plain path, operator, conversion, indexer, constructor, destructor); each
//! shape carries only the fields it needs. References are parsed once and
//! never re-inspected as text downstream.

use std::fmt;

use copa_ir::{AccessorKind, OperatorKind, RefKind};
use smallvec::SmallVec;

/// Dotted name path. Most references have at most a few segments.
pub type Path = SmallVec<[NameSegment; 4]>;

/// How the first segment of a reference is anchored.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Qualifier {
    /// Lexical lookup from the requesting declaration.
    #[default]
    None,
    /// `global::`: the root namespace.
    Global,
    /// `this.`: the containing type.
    This,
    /// `base.`: the immediate base type of the containing type.
    Base,
    /// `alias::`: a using alias.
    Alias(String),
}

/// Generic argument list of one name segment.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum GenericArgs {
    #[default]
    None,
    /// `<,>`: arity only.
    Unbound(usize),
    /// `<int, string>`: concrete arguments, as type text.
    Bound(Vec<String>),
}

impl GenericArgs {
    pub fn arity(&self) -> usize {
        match self {
            GenericArgs::None => 0,
            GenericArgs::Unbound(n) => *n,
            GenericArgs::Bound(args) => args.len(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, GenericArgs::None)
    }

    /// Concrete arguments, if any were supplied.
    pub fn bound(&self) -> &[String] {
        match self {
            GenericArgs::Bound(args) => args,
            _ => &[],
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NameSegment {
    pub name: String,
    pub generics: GenericArgs,
}

impl NameSegment {
    pub fn new(name: impl Into<String>) -> Self {
        NameSegment {
            name: name.into(),
            generics: GenericArgs::None,
        }
    }

    #[must_use]
    pub fn with_generics(mut self, generics: GenericArgs) -> Self {
        self.generics = generics;
        self
    }
}

/// One entry of a parameter list.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParamSpec {
    pub ref_kind: RefKind,
    pub ty: String,
}

impl ParamSpec {
    pub fn new(ty: impl Into<String>) -> Self {
        ParamSpec {
            ref_kind: RefKind::None,
            ty: ty.into(),
        }
    }
}

/// An explicit parameter list.
///
/// `Some(ParamList::default())` is `()`, a zero-parameter overload; no list
/// at all means "match by name only".
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ParamList {
    pub params: Vec<ParamSpec>,
    /// Trailing `__arglist`.
    pub arglist: bool,
}

/// Shape of a reference.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ReferenceKind {
    /// `A.B.Member<T>(int)` or `Property_get`.
    Path {
        segments: Path,
        params: Option<ParamList>,
        accessor: Option<AccessorKind>,
    },
    /// `Type.operator +(Type, Type)`.
    Operator {
        container: Path,
        op: OperatorKind,
        params: Option<ParamList>,
    },
    /// `explicit operator int(Type)`.
    Conversion {
        container: Path,
        explicit: bool,
        target: String,
        params: Option<ParamList>,
    },
    /// `this[int]`, optionally with `_get`/`_set`.
    Indexer {
        container: Path,
        params: Option<ParamList>,
        accessor: Option<AccessorKind>,
    },
    /// `Type.Type(int)`, `Type.#ctor(int)`; an empty container means the
    /// requesting declaration's type.
    Constructor {
        container: Path,
        params: Option<ParamList>,
    },
    /// `~Type()`.
    Destructor { container: Path },
}

/// A parsed reference. Immutable once parsed.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MemberReference {
    pub qualifier: Qualifier,
    pub kind: ReferenceKind,
}

impl MemberReference {
    /// Segments naming the scope the member lives in.
    pub fn container(&self) -> &[NameSegment] {
        match &self.kind {
            ReferenceKind::Path { segments, .. } => {
                &segments[..segments.len().saturating_sub(1)]
            }
            ReferenceKind::Operator { container, .. }
            | ReferenceKind::Conversion { container, .. }
            | ReferenceKind::Indexer { container, .. }
            | ReferenceKind::Constructor { container, .. }
            | ReferenceKind::Destructor { container } => container,
        }
    }

    /// Final segment of a plain path.
    pub fn member(&self) -> Option<&NameSegment> {
        match &self.kind {
            ReferenceKind::Path { segments, .. } => segments.last(),
            _ => None,
        }
    }

    pub fn params(&self) -> Option<&ParamList> {
        match &self.kind {
            ReferenceKind::Path { params, .. }
            | ReferenceKind::Operator { params, .. }
            | ReferenceKind::Conversion { params, .. }
            | ReferenceKind::Indexer { params, .. }
            | ReferenceKind::Constructor { params, .. } => params.as_ref(),
            ReferenceKind::Destructor { .. } => None,
        }
    }

    pub fn accessor(&self) -> Option<AccessorKind> {
        match &self.kind {
            ReferenceKind::Path { accessor, .. } | ReferenceKind::Indexer { accessor, .. } => {
                *accessor
            }
            _ => None,
        }
    }
}

fn write_path(f: &mut fmt::Formatter<'_>, path: &[NameSegment]) -> fmt::Result {
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        write!(f, "{segment}")?;
    }
    Ok(())
}

fn write_container(f: &mut fmt::Formatter<'_>, path: &[NameSegment]) -> fmt::Result {
    if !path.is_empty() {
        write_path(f, path)?;
        f.write_str(".")?;
    }
    Ok(())
}

impl fmt::Display for NameSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.generics {
            GenericArgs::None => Ok(()),
            GenericArgs::Unbound(n) => write!(f, "<{}>", ",".repeat(n.saturating_sub(1))),
            GenericArgs::Bound(args) => write!(f, "<{}>", args.join(", ")),
        }
    }
}

impl fmt::Display for ParamList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for param in &self.params {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            if let Some(kw) = param.ref_kind.keyword() {
                write!(f, "{kw} ")?;
            }
            f.write_str(&param.ty)?;
        }
        if self.arglist {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str("__arglist")?;
        }
        Ok(())
    }
}

impl fmt::Display for MemberReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Qualifier::None => {}
            Qualifier::Global => f.write_str("global::")?,
            Qualifier::This => f.write_str("this.")?,
            Qualifier::Base => f.write_str("base.")?,
            Qualifier::Alias(alias) => write!(f, "{alias}::")?,
        }

        let params = self.params();
        match &self.kind {
            ReferenceKind::Path {
                segments, accessor, ..
            } => {
                write_path(f, segments)?;
                if let Some(accessor) = accessor {
                    write!(f, "_{}", accessor.keyword())?;
                }
            }
            ReferenceKind::Operator { container, op, .. } => {
                write_container(f, container)?;
                write!(f, "operator {}", op.token())?;
            }
            ReferenceKind::Conversion {
                container,
                explicit,
                target,
                ..
            } => {
                write_container(f, container)?;
                let kw = if *explicit { "explicit" } else { "implicit" };
                write!(f, "{kw} operator {target}")?;
            }
            ReferenceKind::Indexer {
                container,
                params,
                accessor,
            } => {
                write_container(f, container)?;
                match params {
                    Some(list) => write!(f, "this[{list}]")?,
                    None => f.write_str("this[]")?,
                }
                if let Some(accessor) = accessor {
                    write!(f, "_{}", accessor.keyword())?;
                }
                return Ok(());
            }
            ReferenceKind::Constructor { container, .. } => {
                write_container(f, container)?;
                f.write_str("#ctor")?;
            }
            ReferenceKind::Destructor { container } => {
                write_container(f, container)?;
                let name = container.last().map_or("", |s| s.name.as_str());
                write!(f, "~{name}()")?;
                return Ok(());
            }
        }

        if let Some(list) = params {
            write!(f, "({list})")?;
        }
        Ok(())
    }
}
