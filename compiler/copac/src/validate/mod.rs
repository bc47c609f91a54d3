//! Checks on directive bearers and on the directives they carry.
//!
//! Bearer problems are errors that fail every directive of the bearer.
//! Directive-surface problems are warnings.

use copa_diagnostic::{Diagnostic, ErrorCode};
use copa_ir::{CopyDirective, Symbol, SymbolGraphProvider, SymbolId, SymbolKind};
use copa_resolve::display::qualified_signature;
use rustc_hash::FxHashSet;

/// Errors that stop `bearer` from receiving generated content.
pub(crate) fn bearer_errors(graph: &dyn SymbolGraphProvider, bearer: SymbolId) -> Vec<Diagnostic> {
    let symbol = graph.symbol(bearer);
    let location = symbol.location();
    let mut errors = Vec::new();

    if !symbol.is_partial() {
        errors.push(Diagnostic::at(
            ErrorCode::MemberMustBePartial,
            location,
            format!("`{}` must be declared partial", qualified_signature(graph, bearer)),
        ));
    } else if has_own_implementation(symbol) {
        errors.push(
            Diagnostic::at(
                ErrorCode::MemberMustBePartial,
                location,
                format!(
                    "`{}` already has an implementation",
                    qualified_signature(graph, bearer)
                ),
            )
            .with_note("copy directives go on partial declarations without a body"),
        );
    }

    for container in graph.containers(bearer) {
        let outer = graph.symbol(container);
        if outer.kind.is_type() && !outer.is_partial() {
            errors.push(
                Diagnostic::at(
                    ErrorCode::ContainingTypeMustBePartial,
                    location,
                    format!(
                        "containing type `{}` must be declared partial",
                        graph.qualified_name(container)
                    ),
                )
                .with_secondary_label(outer.location(), "declared here"),
            );
        }
    }
    errors
}

fn has_own_implementation(symbol: &Symbol) -> bool {
    match symbol.kind {
        SymbolKind::Property | SymbolKind::Indexer | SymbolKind::Event => {
            symbol.accessors.iter().any(|a| a.body.is_some())
        }
        kind if kind.is_method_like() => symbol.body().is_some(),
        _ => false,
    }
}

/// Warnings about the directive surface of one bearer.
///
/// `directives` is in declaration order. Returns the warnings and the
/// positions of directives that repeat an earlier one.
pub(crate) fn directive_warnings(directives: &[&CopyDirective]) -> (Vec<Diagnostic>, FxHashSet<usize>) {
    let mut warnings = Vec::new();
    let mut repeated = FxHashSet::default();

    for (index, directive) in directives.iter().enumerate() {
        if let Some(first) = directives[..index]
            .iter()
            .find(|earlier| earlier.is_equivalent_to(directive))
        {
            repeated.insert(index);
            warnings.push(
                Diagnostic::at(
                    ErrorCode::EquivalentAttributes,
                    directive.location,
                    "copy directive repeats an earlier one",
                )
                .with_secondary_label(first.location, "first specified here"),
            );
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for using in &directive.add_usings {
            if !seen.insert(using.trim()) {
                warnings.push(Diagnostic::at(
                    ErrorCode::UsingAlreadySpecified,
                    directive.location,
                    format!("using `{}` is specified more than once", using.trim()),
                ));
            }
        }
    }
    (warnings, repeated)
}

/// Error for a directive whose target argument is missing.
pub(crate) fn missing_target(directive: &CopyDirective) -> Diagnostic {
    Diagnostic::at(
        ErrorCode::MalformedReference,
        directive.location,
        "copy directive has no target",
    )
}
