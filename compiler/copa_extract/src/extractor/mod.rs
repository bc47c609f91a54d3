//! Per-directive extraction driver.

use copa_ir::type_text::substitute_identifiers;
use copa_ir::{
    AccessorKind, Body, CopyDirective, Symbol, SymbolGraphProvider, SymbolId, SymbolKind,
};
use copa_resolve::display::qualified_signature;
use copa_resolve::ResolvedTarget;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::body::{
    implicit_accessor_body, map_type_params, returns_value, signature_substitutions, to_block,
};
use crate::flags::{self, FlagInput};
use crate::members::{inherited_members, select_parts, type_members};
use crate::{ContentShape, ExtractError, ExtractedContent, Extraction};

/// One directive's extraction inputs.
#[derive(Copy, Clone, Debug)]
pub struct ExtractRequest<'a> {
    /// Declaration carrying the directive.
    pub destination: SymbolId,
    pub target: &'a ResolvedTarget,
    pub directive: &'a CopyDirective,
    /// Content already generated for the target in this pass, when the
    /// target carries copy directives of its own.
    pub inherited: Option<&'a ContentShape>,
}

/// Extract and adapt the content `request` copies.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(destination = ?request.destination, target = ?request.target.symbol)
)]
pub fn extract(
    graph: &dyn SymbolGraphProvider,
    request: &ExtractRequest<'_>,
) -> Result<Extraction, ExtractError> {
    let destination = graph.symbol(request.destination);
    let source = graph.symbol(request.target.symbol);
    let selected = select_parts(
        source,
        || qualified_signature(graph, request.target.symbol),
        request.directive.partial_part.as_deref(),
    )?;

    let (mut content, substitutions) = if destination.kind.is_type() {
        type_content(graph, request, source, destination, &selected)?
    } else if matches!(
        destination.kind,
        SymbolKind::Property | SymbolKind::Indexer | SymbolKind::Event
    ) && request.target.accessor.is_none()
    {
        accessor_content(request, source, destination)?
    } else {
        body_content(graph, request, source, destination, &selected)?
    };

    let mut warnings = Vec::new();
    flags::apply(
        &FlagInput {
            graph,
            source_id: request.target.symbol,
            destination_id: request.destination,
            selected: &selected,
            flags: request.directive.additional_nodes,
            location: request.directive.location,
            substitutions: &substitutions,
        },
        &mut content,
        &mut warnings,
    );

    trace!(warnings = warnings.len(), "extracted content");
    Ok(Extraction { content, warnings })
}

fn incompatible(source: &Symbol, destination: &Symbol) -> ExtractError {
    ExtractError::Incompatible {
        found: source.kind.describe(),
        destination: destination.kind.describe(),
    }
}

type Extracted = (ExtractedContent, FxHashMap<String, String>);

fn type_content(
    graph: &dyn SymbolGraphProvider,
    request: &ExtractRequest<'_>,
    source: &Symbol,
    destination: &Symbol,
    selected: &[usize],
) -> Result<Extracted, ExtractError> {
    if !source.kind.is_type() {
        return Err(incompatible(source, destination));
    }
    let mut substitutions: FxHashMap<String, String> =
        request.target.type_arguments.iter().cloned().collect();
    map_type_params(&source.type_params, &destination.type_params, &mut substitutions);

    let mut members = type_members(
        graph,
        source,
        selected,
        destination,
        request.directive.handle_special_members,
        &substitutions,
    );
    if let Some(ContentShape::Members(generated)) = request.inherited {
        members.extend(inherited_members(
            generated,
            source,
            destination,
            request.directive.handle_special_members,
            &substitutions,
        ));
    }
    Ok((
        ExtractedContent::new(ContentShape::Members(members)),
        substitutions,
    ))
}

fn accessor_content(
    request: &ExtractRequest<'_>,
    source: &Symbol,
    destination: &Symbol,
) -> Result<Extracted, ExtractError> {
    let same_family = match destination.kind {
        SymbolKind::Event => source.kind == SymbolKind::Event,
        _ => matches!(source.kind, SymbolKind::Property | SymbolKind::Indexer),
    };
    if !same_family {
        return Err(incompatible(source, destination));
    }

    let substitutions = signature_substitutions(
        source,
        None,
        destination,
        &request.target.type_arguments,
    );
    let mut accessors: Vec<(AccessorKind, String)> = source
        .accessors
        .iter()
        .map(|accessor| {
            let generated = generated_accessor(request.inherited, accessor.kind);
            let block = match (&accessor.body, generated) {
                (Some(body), _) => to_block(body, accessor.kind == AccessorKind::Get),
                (None, Some(generated)) => generated.to_string(),
                (None, None) => implicit_accessor_body(source, accessor.kind),
            };
            (accessor.kind, substitute_identifiers(&block, &substitutions))
        })
        .collect();
    if let Some(ContentShape::Accessors(generated)) = request.inherited {
        for (kind, block) in generated {
            if !accessors.iter().any(|(k, _)| k == kind) {
                accessors.push((*kind, substitute_identifiers(block, &substitutions)));
            }
        }
    }

    Ok((
        ExtractedContent::new(ContentShape::Accessors(accessors)),
        substitutions,
    ))
}

fn body_content(
    graph: &dyn SymbolGraphProvider,
    request: &ExtractRequest<'_>,
    source: &Symbol,
    destination: &Symbol,
    selected: &[usize],
) -> Result<Extracted, ExtractError> {
    let name = || qualified_signature(graph, request.target.symbol);
    let returns = returns_value(destination);
    let accessor = request.target.accessor;

    let block = match accessor {
        Some(kind) => {
            let found = source.accessor(kind);
            let generated = generated_accessor(request.inherited, kind);
            match (found.and_then(|a| a.body.as_ref()), generated) {
                (Some(body), _) => to_block(body, returns),
                (None, Some(generated)) => generated.to_string(),
                (None, None) if found.is_some() => implicit_accessor_body(source, kind),
                (None, None) => {
                    return Err(ExtractError::MissingAccessor {
                        member: name(),
                        accessor: kind.keyword(),
                    })
                }
            }
        }
        None if source.kind.is_method_like() => {
            let inherited = match request.inherited {
                Some(ContentShape::Body(text)) => Some(Body::Block(text.clone())),
                _ => None,
            };
            let body = selected
                .iter()
                .filter_map(|i| source.parts.get(*i))
                .find_map(|p| p.body.as_ref())
                .or(inherited.as_ref());
            match body {
                Some(body) => to_block(body, returns),
                None if source.is_implicit() => "{ }".to_string(),
                None => return Err(ExtractError::MissingBody { name: name() }),
            }
        }
        None => return Err(incompatible(source, destination)),
    };

    let substitutions =
        signature_substitutions(source, accessor, destination, &request.target.type_arguments);
    let mut content =
        ExtractedContent::new(ContentShape::Body(substitute_identifiers(&block, &substitutions)));

    if destination.kind == SymbolKind::Constructor && source.kind == SymbolKind::Constructor {
        content.initializer = selected
            .iter()
            .filter_map(|i| source.parts.get(*i))
            .find_map(|p| p.initializer.as_deref())
            .map(|init| substitute_identifiers(init, &substitutions));
    }
    Ok((content, substitutions))
}

/// Accessor block of kind `kind` generated earlier for the target.
fn generated_accessor(inherited: Option<&ContentShape>, kind: AccessorKind) -> Option<&str> {
    match inherited? {
        ContentShape::Accessors(accessors) => accessors
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, block)| block.as_str()),
        _ => None,
    }
}
