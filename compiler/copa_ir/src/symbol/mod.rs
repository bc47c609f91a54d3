//! Symbol model of one immutable program snapshot.
//!
//! Symbols live in an arena owned by the snapshot and refer to each other by
//! [`SymbolId`]. A symbol carries its semantic shape (kind, parameters,
//! modifiers) plus one [`DeclarationPart`] per source fragment; partial
//! declarations have several parts, metadata-only symbols have none.

use std::fmt;

use crate::{CopyDirective, Location, Modifiers, PatternAttribute};

/// Index of a symbol in the snapshot arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        SymbolId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// Kind of a type declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Record,
    RecordStruct,
    Enum,
    Delegate,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Record => "record",
            TypeKind::RecordStruct => "record struct",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
        }
    }

    /// Value types cannot declare a base class.
    pub fn is_value_type(self) -> bool {
        matches!(
            self,
            TypeKind::Struct | TypeKind::RecordStruct | TypeKind::Enum
        )
    }

    /// Kinds that get a compiler-provided parameterless constructor.
    pub fn has_default_constructor(self) -> bool {
        matches!(
            self,
            TypeKind::Class | TypeKind::Struct | TypeKind::Record | TypeKind::RecordStruct
        )
    }
}

/// User-definable operator tokens.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperatorKind {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    UnsignedShr,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Bang,
    Tilde,
    Increment,
    Decrement,
    True,
    False,
}

impl OperatorKind {
    /// Parse the source spelling of an operator token.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "+" => OperatorKind::Plus,
            "-" => OperatorKind::Minus,
            "*" => OperatorKind::Star,
            "/" => OperatorKind::Slash,
            "%" => OperatorKind::Percent,
            "&" => OperatorKind::Amp,
            "|" => OperatorKind::Pipe,
            "^" => OperatorKind::Caret,
            "<<" => OperatorKind::Shl,
            ">>" => OperatorKind::Shr,
            ">>>" => OperatorKind::UnsignedShr,
            "==" => OperatorKind::EqEq,
            "!=" => OperatorKind::NotEq,
            "<" => OperatorKind::Lt,
            ">" => OperatorKind::Gt,
            "<=" => OperatorKind::LtEq,
            ">=" => OperatorKind::GtEq,
            "!" => OperatorKind::Bang,
            "~" => OperatorKind::Tilde,
            "++" => OperatorKind::Increment,
            "--" => OperatorKind::Decrement,
            "true" => OperatorKind::True,
            "false" => OperatorKind::False,
            _ => return None,
        })
    }

    pub fn token(self) -> &'static str {
        match self {
            OperatorKind::Plus => "+",
            OperatorKind::Minus => "-",
            OperatorKind::Star => "*",
            OperatorKind::Slash => "/",
            OperatorKind::Percent => "%",
            OperatorKind::Amp => "&",
            OperatorKind::Pipe => "|",
            OperatorKind::Caret => "^",
            OperatorKind::Shl => "<<",
            OperatorKind::Shr => ">>",
            OperatorKind::UnsignedShr => ">>>",
            OperatorKind::EqEq => "==",
            OperatorKind::NotEq => "!=",
            OperatorKind::Lt => "<",
            OperatorKind::Gt => ">",
            OperatorKind::LtEq => "<=",
            OperatorKind::GtEq => ">=",
            OperatorKind::Bang => "!",
            OperatorKind::Tilde => "~",
            OperatorKind::Increment => "++",
            OperatorKind::Decrement => "--",
            OperatorKind::True => "true",
            OperatorKind::False => "false",
        }
    }
}

/// Accessor selected by a `_get`/`_set`/`_add`/`_remove` suffix.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum AccessorKind {
    Get,
    Set,
    Add,
    Remove,
}

impl AccessorKind {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "get" => Some(AccessorKind::Get),
            "set" => Some(AccessorKind::Set),
            "add" => Some(AccessorKind::Add),
            "remove" => Some(AccessorKind::Remove),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::Add => "add",
            AccessorKind::Remove => "remove",
        }
    }

    /// Accessors that receive the implicit `value` parameter.
    pub fn takes_value(self) -> bool {
        !matches!(self, AccessorKind::Get)
    }

    /// Whether this accessor can exist on the given member kind.
    pub fn applies_to(self, kind: SymbolKind) -> bool {
        match self {
            AccessorKind::Get | AccessorKind::Set => {
                matches!(kind, SymbolKind::Property | SymbolKind::Indexer)
            }
            AccessorKind::Add | AccessorKind::Remove => matches!(kind, SymbolKind::Event),
        }
    }
}

/// Semantic kind of a symbol.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Namespace,
    Type(TypeKind),
    Method,
    Property,
    Indexer,
    Event,
    Constructor,
    Destructor,
    Operator(OperatorKind),
    Conversion { explicit: bool },
    Field,
}

impl SymbolKind {
    pub fn is_type(self) -> bool {
        matches!(self, SymbolKind::Type(_))
    }

    /// Kinds that own a parameter list and an executable body.
    pub fn is_method_like(self) -> bool {
        matches!(
            self,
            SymbolKind::Method
                | SymbolKind::Constructor
                | SymbolKind::Destructor
                | SymbolKind::Operator(_)
                | SymbolKind::Conversion { .. }
        )
    }

    /// Kinds that can be looked into with a dotted path.
    pub fn is_container(self) -> bool {
        matches!(self, SymbolKind::Namespace | SymbolKind::Type(_))
    }

    pub fn describe(self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Type(_) => "type",
            SymbolKind::Method => "method",
            SymbolKind::Property => "property",
            SymbolKind::Indexer => "indexer",
            SymbolKind::Event => "event",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Destructor => "destructor",
            SymbolKind::Operator(_) => "operator",
            SymbolKind::Conversion { .. } => "conversion operator",
            SymbolKind::Field => "field",
        }
    }
}

/// Declared accessibility.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    PrivateProtected,
    #[default]
    Private,
}

impl Accessibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Internal => "internal",
            Accessibility::Protected => "protected",
            Accessibility::ProtectedInternal => "protected internal",
            Accessibility::PrivateProtected => "private protected",
            Accessibility::Private => "private",
        }
    }
}

/// Parameter passing mode.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum RefKind {
    #[default]
    None,
    Ref,
    In,
    Out,
    Params,
}

impl RefKind {
    pub fn from_keyword(kw: &str) -> Option<Self> {
        match kw {
            "ref" => Some(RefKind::Ref),
            "in" => Some(RefKind::In),
            "out" => Some(RefKind::Out),
            "params" => Some(RefKind::Params),
            _ => None,
        }
    }

    pub fn keyword(self) -> Option<&'static str> {
        match self {
            RefKind::None => None,
            RefKind::Ref => Some("ref"),
            RefKind::In => Some("in"),
            RefKind::Out => Some("out"),
            RefKind::Params => Some("params"),
        }
    }
}

/// A declared parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: String,
    pub ty: String,
    pub ref_kind: RefKind,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty: ty.into(),
            ref_kind: RefKind::None,
        }
    }

    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(kw) = self.ref_kind.keyword() {
            write!(f, "{kw} ")?;
        }
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// A generic type parameter with its constraint list.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeParam {
    pub name: String,
    /// Constraint entries in source order, e.g. `class`, `new()`, `IComparable<T>`.
    pub constraints: Vec<String>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        TypeParam {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    /// The `where` clause for this parameter, if it has constraints.
    pub fn where_clause(&self) -> Option<String> {
        if self.constraints.is_empty() {
            None
        } else {
            Some(format!("where {} : {}", self.name, self.constraints.join(", ")))
        }
    }
}

/// Executable body of a method-like member or accessor.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Body {
    /// `{ ... }`, stored verbatim including braces.
    Block(String),
    /// `=> expr;`, stored as the bare expression.
    Expression(String),
}

/// An explicit or implicit accessor of a property, indexer or event.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Accessor {
    pub kind: AccessorKind,
    /// `None` for auto-implemented (or field-like event) accessors.
    pub body: Option<Body>,
    pub accessibility: Option<Accessibility>,
}

impl Accessor {
    pub fn auto(kind: AccessorKind) -> Self {
        Accessor {
            kind,
            body: None,
            accessibility: None,
        }
    }

    pub fn with_body(kind: AccessorKind, body: Body) -> Self {
        Accessor {
            kind,
            body: Some(body),
            accessibility: None,
        }
    }

    pub fn is_implicit(&self) -> bool {
        self.body.is_none()
    }
}

/// A using alias declared in a file (`using Alias = Some.Namespace;`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct UsingAlias {
    pub alias: String,
    pub target: String,
}

/// One source fragment of a declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DeclarationPart {
    pub location: Location,
    /// Name given to this fragment so directives can select it.
    pub part_name: Option<String>,
    /// Leading documentation comment, verbatim.
    pub documentation: Option<String>,
    /// Attribute lists other than copy directives, verbatim (`[Obsolete]`).
    pub attributes: Vec<String>,
    /// Namespaces imported by the declaring file.
    pub usings: Vec<String>,
    pub aliases: Vec<UsingAlias>,
    /// Full source text of the fragment, used when it is copied as a member.
    pub text: String,
    pub body: Option<Body>,
    /// Constructor initializer such as `base(x)`.
    pub initializer: Option<String>,
    /// Index of the containing symbol's part this fragment is nested in.
    pub enclosing_part: usize,
    pub directives: Vec<CopyDirective>,
    pub patterns: Vec<PatternAttribute>,
}

impl DeclarationPart {
    pub fn new(location: Location) -> Self {
        DeclarationPart {
            location,
            part_name: None,
            documentation: None,
            attributes: Vec::new(),
            usings: Vec::new(),
            aliases: Vec::new(),
            text: String::new(),
            body: None,
            initializer: None,
            enclosing_part: 0,
            directives: Vec::new(),
            patterns: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.part_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attr: impl Into<String>) -> Self {
        self.attributes.push(attr.into());
        self
    }

    #[must_use]
    pub fn with_using(mut self, namespace: impl Into<String>) -> Self {
        self.usings.push(namespace.into());
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.push(UsingAlias {
            alias: alias.into(),
            target: target.into(),
        });
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    #[must_use]
    pub fn in_part(mut self, enclosing_part: usize) -> Self {
        self.enclosing_part = enclosing_part;
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: CopyDirective) -> Self {
        self.directives.push(directive);
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: PatternAttribute) -> Self {
        self.patterns.push(pattern);
        self
    }
}

/// A declared entity of the program.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub container: Option<SymbolId>,
    pub accessibility: Accessibility,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    /// Trailing `__arglist`.
    pub varargs: bool,
    /// Return type of methods and conversions, value type of properties,
    /// indexers, events and fields.
    pub return_type: Option<String>,
    pub base_type: Option<String>,
    pub interfaces: Vec<String>,
    /// Resolved symbol of `base_type`, when it is part of the snapshot.
    pub base_symbol: Option<SymbolId>,
    /// Member this one overrides.
    pub overridden: Option<SymbolId>,
    pub accessors: Vec<Accessor>,
    pub members: Vec<SymbolId>,
    pub parts: Vec<DeclarationPart>,
}

impl Symbol {
    fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Symbol {
            name: name.into(),
            kind,
            container: None,
            accessibility: Accessibility::Private,
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            params: Vec::new(),
            varargs: false,
            return_type: None,
            base_type: None,
            interfaces: Vec::new(),
            base_symbol: None,
            overridden: None,
            accessors: Vec::new(),
            members: Vec::new(),
            parts: Vec::new(),
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        let mut sym = Self::new(name, SymbolKind::Namespace);
        sym.accessibility = Accessibility::Public;
        sym
    }

    pub fn type_decl(kind: TypeKind, name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Type(kind))
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::type_decl(TypeKind::Class, name)
    }

    pub fn method(name: impl Into<String>) -> Self {
        let mut sym = Self::new(name, SymbolKind::Method);
        sym.return_type = Some("void".to_string());
        sym
    }

    pub fn property(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let mut sym = Self::new(name, SymbolKind::Property);
        sym.return_type = Some(ty.into());
        sym
    }

    pub fn indexer(ty: impl Into<String>) -> Self {
        let mut sym = Self::new("this", SymbolKind::Indexer);
        sym.return_type = Some(ty.into());
        sym
    }

    pub fn event(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let mut sym = Self::new(name, SymbolKind::Event);
        sym.return_type = Some(ty.into());
        sym
    }

    pub fn field(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let mut sym = Self::new(name, SymbolKind::Field);
        sym.return_type = Some(ty.into());
        sym
    }

    /// Constructor of the type named `type_name`.
    pub fn constructor(type_name: impl Into<String>) -> Self {
        Self::new(type_name, SymbolKind::Constructor)
    }

    pub fn destructor(type_name: impl Into<String>) -> Self {
        Self::new(type_name, SymbolKind::Destructor)
    }

    pub fn operator(op: OperatorKind, return_type: impl Into<String>) -> Self {
        let mut sym = Self::new(format!("operator {}", op.token()), SymbolKind::Operator(op));
        sym.return_type = Some(return_type.into());
        sym.modifiers = Modifiers::STATIC;
        sym.accessibility = Accessibility::Public;
        sym
    }

    pub fn conversion(explicit: bool, target: impl Into<String>) -> Self {
        let keyword = if explicit { "explicit" } else { "implicit" };
        let target = target.into();
        let mut sym = Self::new(
            format!("{keyword} operator {target}"),
            SymbolKind::Conversion { explicit },
        );
        sym.return_type = Some(target);
        sym.modifiers = Modifiers::STATIC;
        sym.accessibility = Accessibility::Public;
        sym
    }

    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn public(self) -> Self {
        self.with_accessibility(Accessibility::Public)
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    #[must_use]
    pub fn partial(self) -> Self {
        self.with_modifiers(Modifiers::PARTIAL)
    }

    #[must_use]
    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    #[must_use]
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn with_varargs(mut self) -> Self {
        self.varargs = true;
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    #[must_use]
    pub fn with_base_type(mut self, base: impl Into<String>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[must_use]
    pub fn overriding(mut self, overridden: SymbolId) -> Self {
        self.overridden = Some(overridden);
        self.modifiers |= Modifiers::OVERRIDE;
        self
    }

    #[must_use]
    pub fn with_accessor(mut self, accessor: Accessor) -> Self {
        self.accessors.push(accessor);
        self
    }

    #[must_use]
    pub fn with_part(mut self, part: DeclarationPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Declaring location: the first part, or synthetic for metadata symbols.
    pub fn location(&self) -> Location {
        self.parts
            .first()
            .map_or(Location::SYNTHETIC, |part| part.location)
    }

    pub fn type_kind(&self) -> Option<TypeKind> {
        match self.kind {
            SymbolKind::Type(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.modifiers.contains(Modifiers::PARTIAL)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_implicit(&self) -> bool {
        self.modifiers.contains(Modifiers::IMPLICIT)
    }

    /// Metadata-only symbols have no source fragments to copy from.
    pub fn is_external(&self) -> bool {
        self.parts.is_empty() && !self.is_implicit()
    }

    pub fn accessor(&self, kind: AccessorKind) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.kind == kind)
    }

    /// First body found among the parts.
    pub fn body(&self) -> Option<&Body> {
        self.parts.iter().find_map(|p| p.body.as_ref())
    }

    pub fn has_constraints(&self) -> bool {
        self.type_params.iter().any(|tp| !tp.constraints.is_empty())
    }

    pub fn has_documentation(&self) -> bool {
        self.parts.iter().any(|p| p.documentation.is_some())
    }

    /// All copy directives, paired with the index of the part carrying them.
    pub fn directives(&self) -> impl Iterator<Item = (usize, &CopyDirective)> {
        self.parts
            .iter()
            .enumerate()
            .flat_map(|(i, p)| p.directives.iter().map(move |d| (i, d)))
    }

    /// All pattern attributes, paired with the index of the part carrying them.
    pub fn patterns(&self) -> impl Iterator<Item = (usize, &PatternAttribute)> {
        self.parts
            .iter()
            .enumerate()
            .flat_map(|(i, p)| p.patterns.iter().map(move |d| (i, d)))
    }

    /// Part with the given name.
    pub fn part_named(&self, name: &str) -> Option<usize> {
        self.parts
            .iter()
            .position(|p| p.part_name.as_deref() == Some(name))
    }
}
