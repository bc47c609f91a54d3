//! Structural filter for [`AdditionalNodes`].
//!
//! A flag the destination cannot carry, or that has nothing to copy, is a
//! no-op with a warning. It never fails the directive.

use copa_diagnostic::{Diagnostic, ErrorCode};
use copa_ir::type_text::substitute_identifiers;
use copa_ir::{AdditionalNodes, Location, Symbol, SymbolGraphProvider, SymbolId, TypeKind};
use copa_resolve::display::qualified_signature;
use rustc_hash::FxHashMap;

use crate::body::map_type_params;
use crate::ExtractedContent;

pub(crate) struct FlagInput<'a> {
    pub graph: &'a dyn SymbolGraphProvider,
    pub source_id: SymbolId,
    pub destination_id: SymbolId,
    pub selected: &'a [usize],
    pub flags: AdditionalNodes,
    pub location: Location,
    pub substitutions: &'a FxHashMap<String, String>,
}

impl FlagInput<'_> {
    fn source(&self) -> &Symbol {
        self.graph.symbol(self.source_id)
    }

    fn destination(&self) -> &Symbol {
        self.graph.symbol(self.destination_id)
    }

    fn name(&self, id: SymbolId) -> String {
        qualified_signature(self.graph, id)
    }

    fn selected_parts(&self) -> impl Iterator<Item = &copa_ir::DeclarationPart> {
        let source = self.source();
        self.selected.iter().filter_map(move |i| source.parts.get(*i))
    }

    fn warn(&self, warnings: &mut Vec<Diagnostic>, code: ErrorCode, message: String) {
        warnings.push(Diagnostic::at(code, self.location, message));
    }
}

/// Fill the optional parts of `content` selected by the directive.
pub(crate) fn apply(input: &FlagInput<'_>, content: &mut ExtractedContent, warnings: &mut Vec<Diagnostic>) {
    let flags = input.flags;
    if flags.contains(AdditionalNodes::DOCUMENTATION) {
        documentation(input, content, warnings);
    }
    if flags.contains(AdditionalNodes::ATTRIBUTES) {
        for part in input.selected_parts() {
            for attribute in &part.attributes {
                if !content.attributes.contains(attribute) {
                    content.attributes.push(attribute.clone());
                }
            }
        }
    }
    if flags.contains(AdditionalNodes::BASE_TYPE) {
        base_type(input, content, warnings);
    }
    if flags.contains(AdditionalNodes::BASE_INTERFACES) {
        base_interfaces(input, content, warnings);
    }
    if flags.contains(AdditionalNodes::CONSTRAINTS) {
        constraints(input, content, warnings);
    }
    if flags.contains(AdditionalNodes::USINGS) {
        usings(input, content);
    }
}

fn documentation(input: &FlagInput<'_>, content: &mut ExtractedContent, warnings: &mut Vec<Diagnostic>) {
    if input.destination().has_documentation() {
        input.warn(
            warnings,
            ErrorCode::AlreadyHasDocumentation,
            format!(
                "`{}` already has documentation; the copied documentation is ignored",
                input.name(input.destination_id)
            ),
        );
        return;
    }
    content.documentation = input
        .selected_parts()
        .find_map(|p| p.documentation.clone())
        .map(|doc| substitute_identifiers(&doc, input.substitutions));
}

/// Why the destination cannot take a base list, if it cannot.
fn base_list_blocker(destination: &Symbol) -> Option<&'static str> {
    let Some(kind) = destination.type_kind() else {
        return Some("it is not a type");
    };
    if destination.is_static() {
        Some("it is a static type")
    } else if kind == TypeKind::Interface {
        Some("it is an interface")
    } else if kind.is_value_type() {
        Some("it is a value type")
    } else if kind == TypeKind::Delegate {
        Some("it is a delegate")
    } else {
        None
    }
}

fn base_type(input: &FlagInput<'_>, content: &mut ExtractedContent, warnings: &mut Vec<Diagnostic>) {
    let destination = input.destination();
    let reason = if let Some(reason) = base_list_blocker(destination) {
        Some(reason.to_string())
    } else if destination.base_type.is_some() {
        Some("it already declares a base type".to_string())
    } else if input.source().base_type.is_none() {
        Some(format!("`{}` has no base type", input.name(input.source_id)))
    } else {
        None
    };

    match reason {
        Some(reason) => input.warn(
            warnings,
            ErrorCode::CannotApplyBaseType,
            format!(
                "base type not copied to `{}`: {reason}",
                input.name(input.destination_id)
            ),
        ),
        None => {
            content.base_type = input
                .source()
                .base_type
                .as_deref()
                .map(|base| substitute_identifiers(base, input.substitutions));
        }
    }
}

fn base_interfaces(input: &FlagInput<'_>, content: &mut ExtractedContent, warnings: &mut Vec<Diagnostic>) {
    let destination = input.destination();
    let reason = if let Some(reason) = base_list_blocker(destination) {
        Some(reason.to_string())
    } else if input.source().interfaces.is_empty() {
        Some(format!("`{}` implements no interfaces", input.name(input.source_id)))
    } else {
        None
    };

    if let Some(reason) = reason {
        input.warn(
            warnings,
            ErrorCode::CannotApplyBaseType,
            format!(
                "base interfaces not copied to `{}`: {reason}",
                input.name(input.destination_id)
            ),
        );
        return;
    }

    for interface in &input.source().interfaces {
        let interface = substitute_identifiers(interface, input.substitutions);
        let declared = destination.interfaces.contains(&interface);
        if !declared && !content.base_interfaces.contains(&interface) {
            content.base_interfaces.push(interface);
        }
    }
}

fn constraints(input: &FlagInput<'_>, content: &mut ExtractedContent, warnings: &mut Vec<Diagnostic>) {
    let source = input.source();
    let destination = input.destination();

    let copyable = source.kind.is_type()
        && destination.kind.is_type()
        && !source.type_params.is_empty()
        && source.type_params.len() == destination.type_params.len();
    if !copyable {
        input.warn(
            warnings,
            ErrorCode::CannotCopyConstraintsForMethodOrNonGenericMember,
            format!(
                "constraints of `{}` cannot be copied to `{}`",
                input.name(input.source_id),
                input.name(input.destination_id)
            ),
        );
        return;
    }
    if destination.has_constraints() {
        input.warn(
            warnings,
            ErrorCode::AlreadyHasConstraints,
            format!(
                "`{}` already declares constraints; the copied constraints are ignored",
                input.name(input.destination_id)
            ),
        );
        return;
    }

    // Constraints are rewritten onto the destination's parameter names only.
    let mut renames = FxHashMap::default();
    map_type_params(&source.type_params, &destination.type_params, &mut renames);
    for (s, d) in source.type_params.iter().zip(&destination.type_params) {
        if s.constraints.is_empty() {
            continue;
        }
        let list: Vec<String> = s
            .constraints
            .iter()
            .map(|c| substitute_identifiers(c, &renames))
            .collect();
        content
            .constraints
            .push(format!("where {} : {}", d.name, list.join(", ")));
    }
}

fn usings(input: &FlagInput<'_>, content: &mut ExtractedContent) {
    let graph = input.graph;
    let own = input.selected_parts().flat_map(|p| p.usings.iter());
    let enclosing = graph
        .containers(input.source_id)
        .into_iter()
        .flat_map(move |id| graph.symbol(id).parts.iter())
        .flat_map(|p| p.usings.iter());
    for using in own.chain(enclosing) {
        if !content.usings.contains(using) {
            content.usings.push(using.clone());
        }
    }
}
