//! Bit-set types shared by the directive surface and the symbol model.

use bitflags::bitflags;

bitflags! {
    /// Optional syntax categories that accompany a copy.
    ///
    /// Flags that make no sense for the resolved target (for example
    /// `BASE_TYPE` on a method) are ignored with a warning by the extractor.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct AdditionalNodes: u32 {
        /// Leading documentation comment of the source declaration.
        const DOCUMENTATION = 1 << 0;
        /// Attribute lists of the source declaration.
        const ATTRIBUTES = 1 << 1;
        /// Base class of a source type.
        const BASE_TYPE = 1 << 2;
        /// Implemented interfaces of a source type.
        const BASE_INTERFACES = 1 << 3;
        /// Generic constraint clauses of a source type.
        const CONSTRAINTS = 1 << 4;
        /// Using directives of the file declaring the source.
        const USINGS = 1 << 5;

        const ALL = Self::DOCUMENTATION.bits()
            | Self::ATTRIBUTES.bits()
            | Self::BASE_TYPE.bits()
            | Self::BASE_INTERFACES.bits()
            | Self::CONSTRAINTS.bits()
            | Self::USINGS.bits();
    }
}

impl AdditionalNodes {
    pub const NONE: Self = Self::empty();

    /// Flags that only apply to type targets.
    pub const TYPE_ONLY: Self = Self::from_bits_truncate(
        Self::BASE_TYPE.bits() | Self::BASE_INTERFACES.bits() | Self::CONSTRAINTS.bits(),
    );
}

bitflags! {
    /// Declaration modifiers relevant to resolution and extraction.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u16 {
        const STATIC = 1 << 0;
        const ABSTRACT = 1 << 1;
        const EXTERN = 1 << 2;
        const PARTIAL = 1 << 3;
        const OVERRIDE = 1 << 4;
        const VIRTUAL = 1 << 5;
        const SEALED = 1 << 6;
        const READONLY = 1 << 7;
        /// Compiler-generated member (default constructor, record equality).
        const IMPLICIT = 1 << 8;
    }
}

impl Modifiers {
    /// Source keywords in canonical declaration order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::STATIC, "static"),
            (Self::EXTERN, "extern"),
            (Self::ABSTRACT, "abstract"),
            (Self::VIRTUAL, "virtual"),
            (Self::OVERRIDE, "override"),
            (Self::SEALED, "sealed"),
            (Self::READONLY, "readonly"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, kw)| kw)
    }
}
