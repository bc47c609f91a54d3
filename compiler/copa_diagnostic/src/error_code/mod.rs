//! Diagnostic codes for every problem the generator reports.
//!
//! Each code has a stable `CP####` identifier, a default severity and a
//! one-line description used by hosts for `--explain` style lookups.

use std::fmt;

use crate::Severity;

/// Diagnostic codes.
///
/// Ranges:
/// - CP00xx: reference and resolution problems
/// - CP01xx: dependency graph problems
/// - CP02xx: destination declaration problems
/// - CP03xx: pattern problems
/// - CP04xx: content and directive warnings
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ErrorCode {
    // Reference and resolution (CP00xx)
    /// Reference text is outside the reference grammar, or null
    MalformedReference,
    /// Reference not found, ambiguous, or empty
    MemberCannotBeResolved,
    /// Several equally valid unqualified candidates
    MemberConflict,
    /// Resolved member has the wrong kind for the requested shape
    WrongMemberKind,
    /// Target inaccessible or its source is not part of this compilation
    ImplementationNotAccessible,
    /// Method target has no body
    MethodWithoutImplementation,
    /// Declaration copies from itself or something it derives from
    SelfOrAncestorReference,
    /// Type argument violates the target's constraints
    InvalidTypeParameter,

    // Dependency graph (CP01xx)
    /// Copy directives form a cycle
    CircularDependency,

    // Destination (CP02xx)
    /// A containing type of the destination is not partial
    ContainingTypeMustBePartial,
    /// The destination itself is not partial
    MemberMustBePartial,
    /// `PartialPart` names no fragment of the target
    UnknownPartialPartName,

    // Patterns (CP03xx)
    /// Null or invalid search/replacement; the pattern is ignored
    InvalidPatternAttributeSpecified,
    /// Pattern can never change the output
    RedundantPatternAttribute,
    /// Pattern identical to an earlier one
    EquivalentPatternAttribute,
    /// Pattern declared on another partial fragment than the directive
    PatternOnDifferentDeclaration,

    // Content and directives (CP04xx)
    /// Two directives resolve to the same target
    EquivalentTarget,
    /// Two directives carry identical arguments
    EquivalentAttributes,
    /// Base type or interfaces cannot be applied
    CannotApplyBaseType,
    /// Constraints requested for a method or a non-generic member
    CannotCopyConstraintsForMethodOrNonGenericMember,
    /// Destination already declares constraints
    AlreadyHasConstraints,
    /// Destination already has documentation
    AlreadyHasDocumentation,
    /// Using listed more than once
    UsingAlreadySpecified,
}

impl ErrorCode {
    /// All codes, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::MalformedReference,
        ErrorCode::MemberCannotBeResolved,
        ErrorCode::MemberConflict,
        ErrorCode::WrongMemberKind,
        ErrorCode::ImplementationNotAccessible,
        ErrorCode::MethodWithoutImplementation,
        ErrorCode::SelfOrAncestorReference,
        ErrorCode::InvalidTypeParameter,
        ErrorCode::CircularDependency,
        ErrorCode::ContainingTypeMustBePartial,
        ErrorCode::MemberMustBePartial,
        ErrorCode::UnknownPartialPartName,
        ErrorCode::InvalidPatternAttributeSpecified,
        ErrorCode::RedundantPatternAttribute,
        ErrorCode::EquivalentPatternAttribute,
        ErrorCode::PatternOnDifferentDeclaration,
        ErrorCode::EquivalentTarget,
        ErrorCode::EquivalentAttributes,
        ErrorCode::CannotApplyBaseType,
        ErrorCode::CannotCopyConstraintsForMethodOrNonGenericMember,
        ErrorCode::AlreadyHasConstraints,
        ErrorCode::AlreadyHasDocumentation,
        ErrorCode::UsingAlreadySpecified,
    ];

    /// Stable identifier, e.g. `CP0001`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedReference => "CP0001",
            ErrorCode::MemberCannotBeResolved => "CP0002",
            ErrorCode::MemberConflict => "CP0003",
            ErrorCode::WrongMemberKind => "CP0004",
            ErrorCode::ImplementationNotAccessible => "CP0005",
            ErrorCode::MethodWithoutImplementation => "CP0006",
            ErrorCode::SelfOrAncestorReference => "CP0007",
            ErrorCode::InvalidTypeParameter => "CP0008",
            ErrorCode::CircularDependency => "CP0101",
            ErrorCode::ContainingTypeMustBePartial => "CP0201",
            ErrorCode::MemberMustBePartial => "CP0202",
            ErrorCode::UnknownPartialPartName => "CP0203",
            ErrorCode::InvalidPatternAttributeSpecified => "CP0301",
            ErrorCode::RedundantPatternAttribute => "CP0302",
            ErrorCode::EquivalentPatternAttribute => "CP0303",
            ErrorCode::PatternOnDifferentDeclaration => "CP0304",
            ErrorCode::EquivalentTarget => "CP0401",
            ErrorCode::EquivalentAttributes => "CP0402",
            ErrorCode::CannotApplyBaseType => "CP0403",
            ErrorCode::CannotCopyConstraintsForMethodOrNonGenericMember => "CP0404",
            ErrorCode::AlreadyHasConstraints => "CP0405",
            ErrorCode::AlreadyHasDocumentation => "CP0406",
            ErrorCode::UsingAlreadySpecified => "CP0407",
        }
    }

    /// Look a code up by its identifier (case-insensitive).
    pub fn from_str_code(code: &str) -> Option<ErrorCode> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }

    /// Severity used when the code is reported.
    pub fn default_severity(self) -> Severity {
        match self {
            ErrorCode::MalformedReference
            | ErrorCode::MemberCannotBeResolved
            | ErrorCode::MemberConflict
            | ErrorCode::WrongMemberKind
            | ErrorCode::ImplementationNotAccessible
            | ErrorCode::MethodWithoutImplementation
            | ErrorCode::SelfOrAncestorReference
            | ErrorCode::InvalidTypeParameter
            | ErrorCode::CircularDependency
            | ErrorCode::ContainingTypeMustBePartial
            | ErrorCode::MemberMustBePartial
            | ErrorCode::UnknownPartialPartName => Severity::Error,
            ErrorCode::InvalidPatternAttributeSpecified
            | ErrorCode::RedundantPatternAttribute
            | ErrorCode::EquivalentPatternAttribute
            | ErrorCode::PatternOnDifferentDeclaration
            | ErrorCode::EquivalentTarget
            | ErrorCode::EquivalentAttributes
            | ErrorCode::CannotApplyBaseType
            | ErrorCode::CannotCopyConstraintsForMethodOrNonGenericMember
            | ErrorCode::AlreadyHasConstraints
            | ErrorCode::AlreadyHasDocumentation
            | ErrorCode::UsingAlreadySpecified => Severity::Warning,
        }
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::MalformedReference => "reference is not valid member reference syntax",
            ErrorCode::MemberCannotBeResolved => "referenced member cannot be resolved",
            ErrorCode::MemberConflict => "reference matches several equally valid members",
            ErrorCode::WrongMemberKind => "referenced member has the wrong kind",
            ErrorCode::ImplementationNotAccessible => "implementation of the member is not accessible",
            ErrorCode::MethodWithoutImplementation => "referenced method has no implementation",
            ErrorCode::SelfOrAncestorReference => "declaration cannot copy from itself or an ancestor",
            ErrorCode::InvalidTypeParameter => "type argument does not satisfy the target's constraints",
            ErrorCode::CircularDependency => "copy directives form a circular dependency",
            ErrorCode::ContainingTypeMustBePartial => "containing type must be partial",
            ErrorCode::MemberMustBePartial => "member must be partial",
            ErrorCode::UnknownPartialPartName => "no partial part with the given name",
            ErrorCode::InvalidPatternAttributeSpecified => "pattern is invalid and will be ignored",
            ErrorCode::RedundantPatternAttribute => "pattern has no effect",
            ErrorCode::EquivalentPatternAttribute => "pattern is equivalent to an earlier pattern",
            ErrorCode::PatternOnDifferentDeclaration => {
                "pattern is declared on a different partial declaration"
            }
            ErrorCode::EquivalentTarget => "another directive already copies this target",
            ErrorCode::EquivalentAttributes => "directive is equivalent to an earlier directive",
            ErrorCode::CannotApplyBaseType => "base type cannot be applied",
            ErrorCode::CannotCopyConstraintsForMethodOrNonGenericMember => {
                "constraints cannot be copied for a method or non-generic member"
            }
            ErrorCode::AlreadyHasConstraints => "destination already declares constraints",
            ErrorCode::AlreadyHasDocumentation => "destination already has documentation",
            ErrorCode::UsingAlreadySpecified => "using is already specified",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
