//! Binding of parsed references against the symbol graph.
//!
//! # Lookup order
//!
//! The first segment of an unqualified reference is looked up in the
//! requesting declaration's lexical scopes, innermost first (types include
//! inherited members), then among using aliases and imported namespaces.
//! `global::`, `this.`, `base.` and `alias::` anchor the first segment at a
//! specific scope instead. Later segments are looked up inside the symbol the
//! previous segment bound to.
//!
//! # Rejection order
//!
//! Once a unique candidate is bound it is checked, in order, for: accessor
//! presence, self or ancestor targeting, accessibility, declaration shape
//! relative to the destination, implementation presence and finally type
//! argument constraints.

use copa_ir::type_text::same_type;
use copa_ir::{AccessorKind, Symbol, SymbolGraphProvider, SymbolId, SymbolKind};
use copa_reference::{
    GenericArgs, MemberReference, NameSegment, ParamList, Qualifier, ReferenceKind,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

use crate::constraints::{violated_constraint, TypeArgument};
use crate::display::{member_signature, qualified_signature};
use crate::overload::{parameters_match, takes_parameter_list};
use crate::{ResolutionFailure, ResolvedTarget};

/// Symbols bound so far, with the generic arguments their segment carried.
type Bindings = SmallVec<[(SymbolId, GenericArgs); 4]>;

/// Where the final segment of a reference is looked up.
#[derive(Copy, Clone, Debug)]
enum Scope {
    /// Lexical lookup from the requesting declaration.
    Lexical,
    /// Inside a specific namespace or type.
    At(SymbolId),
}

/// Resolves references on behalf of one requesting declaration.
pub struct Resolver<'a> {
    graph: &'a dyn SymbolGraphProvider,
    context: SymbolId,
}

impl<'a> Resolver<'a> {
    pub fn new(graph: &'a dyn SymbolGraphProvider, context: SymbolId) -> Self {
        Resolver { graph, context }
    }

    fn sym(&self, id: SymbolId) -> &'a Symbol {
        self.graph.symbol(id)
    }

    /// Bind `reference` to exactly one usable symbol.
    pub fn resolve(&self, reference: &MemberReference) -> Result<ResolvedTarget, ResolutionFailure> {
        let mut bindings = Bindings::new();
        let scope = self.bind_container(reference, &mut bindings)?;

        let (symbol, accessor) = match &reference.kind {
            ReferenceKind::Path {
                segments,
                params,
                accessor,
            } => {
                let Some(last) = segments.last() else {
                    return Err(self.not_found("<empty>", scope));
                };
                self.resolve_member(scope, last, params.as_ref(), *accessor, &mut bindings)?
            }
            ReferenceKind::Operator { op, params, .. } => {
                let ty = self.type_scope(scope)?;
                let name = format!("operator {}", op.token());
                let hits = self.members_where(ty, |s| s.kind == SymbolKind::Operator(*op));
                (self.select_overload(hits, &name, params.as_ref(), &bindings)?, None)
            }
            ReferenceKind::Conversion {
                explicit,
                target,
                params,
                ..
            } => {
                let ty = self.type_scope(scope)?;
                let keyword = if *explicit { "explicit" } else { "implicit" };
                let name = format!("{keyword} operator {target}");
                let hits = self.members_where(ty, |s| {
                    s.kind == SymbolKind::Conversion {
                        explicit: *explicit,
                    } && s.return_type.as_deref().is_some_and(|r| same_type(r, target))
                });
                (self.select_overload(hits, &name, params.as_ref(), &bindings)?, None)
            }
            ReferenceKind::Indexer {
                params, accessor, ..
            } => {
                let ty = self.type_scope(scope)?;
                let hits = self.members_where(ty, |s| s.kind == SymbolKind::Indexer);
                let id = self.select_overload(hits, "this[]", params.as_ref(), &bindings)?;
                (id, *accessor)
            }
            ReferenceKind::Constructor { params, .. } => {
                let ty = self.type_scope(scope)?;
                let hits = self.members_where(ty, |s| s.kind == SymbolKind::Constructor);
                let name = format!("{}.#ctor", self.sym(ty).name);
                (self.select_overload(hits, &name, params.as_ref(), &bindings)?, None)
            }
            ReferenceKind::Destructor { .. } => {
                let ty = self.type_scope(scope)?;
                let hits = self.members_where(ty, |s| s.kind == SymbolKind::Destructor);
                let name = format!("~{}", self.sym(ty).name);
                (self.select_overload(hits, &name, None, &bindings)?, None)
            }
        };

        trace!(reference = %reference, symbol = ?symbol, "bound reference");
        self.validate(symbol, accessor, &bindings)
    }

    /// Validate an already-bound type handle (`typeof(T)` directives).
    pub fn resolve_symbol(&self, symbol: SymbolId) -> Result<ResolvedTarget, ResolutionFailure> {
        self.validate(symbol, None, &Bindings::new())
    }

    // Scope binding

    /// Bind the qualifier and container segments; returns the scope of the
    /// final segment.
    fn bind_container(
        &self,
        reference: &MemberReference,
        bindings: &mut Bindings,
    ) -> Result<Scope, ResolutionFailure> {
        let mut scope = match &reference.qualifier {
            Qualifier::None => Scope::Lexical,
            Qualifier::Global => Scope::At(self.graph.global_namespace()),
            Qualifier::This => Scope::At(self.this_type()?),
            Qualifier::Base => Scope::At(self.base_type()?),
            Qualifier::Alias(alias) => {
                let target = self.graph.resolve_alias(self.context, alias).ok_or_else(|| {
                    ResolutionFailure::NotFound {
                        name: alias.clone(),
                        scope: "the using aliases of this file".to_string(),
                    }
                })?;
                Scope::At(target)
            }
        };

        for segment in reference.container() {
            let hits = self.lookup(scope, &segment.name, |s| s.kind.is_container())?;
            let id = self.pick_container(hits, segment, scope)?;
            bindings.push((id, segment.generics.clone()));
            scope = Scope::At(id);
        }
        Ok(scope)
    }

    /// The type containing the requesting declaration.
    fn this_type(&self) -> Result<SymbolId, ResolutionFailure> {
        self.graph
            .enclosing_type(self.context)
            .ok_or_else(|| ResolutionFailure::NotFound {
                name: "this".to_string(),
                scope: "a declaration outside any type".to_string(),
            })
    }

    fn base_type(&self) -> Result<SymbolId, ResolutionFailure> {
        let this = self.this_type()?;
        self.sym(this)
            .base_symbol
            .ok_or_else(|| ResolutionFailure::NotFound {
                name: "base".to_string(),
                scope: format!("`{}`, which has no known base type", member_signature(self.graph, this)),
            })
    }

    /// Type that owns special members for the given scope.
    fn type_scope(&self, scope: Scope) -> Result<SymbolId, ResolutionFailure> {
        let id = match scope {
            Scope::Lexical => return self.this_type(),
            Scope::At(id) => id,
        };
        let sym = self.sym(id);
        if sym.kind.is_type() {
            Ok(id)
        } else {
            Err(ResolutionFailure::WrongKind {
                name: member_signature(self.graph, id),
                found: sym.kind.describe(),
                expected: "type",
            })
        }
    }

    fn lexical_scopes(&self) -> impl Iterator<Item = SymbolId> + '_ {
        std::iter::once(self.context)
            .chain(self.graph.containers(self.context))
            .filter(|id| self.sym(*id).kind.is_container())
    }

    /// Members named `name` in `scope`; types also search their base chain.
    fn lookup_in(&self, scope: SymbolId, name: &str) -> Vec<SymbolId> {
        let mut seen = FxHashSet::default();
        let mut current = Some(scope);
        while let Some(id) = current {
            if !seen.insert(id) {
                break;
            }
            // Constructors and destructors share the type's name but are only
            // reachable through constructor and destructor syntax.
            let hits: Vec<SymbolId> = self
                .graph
                .lookup_member(id, name)
                .into_iter()
                .filter(|m| {
                    !matches!(
                        self.sym(*m).kind,
                        SymbolKind::Constructor | SymbolKind::Destructor
                    )
                })
                .collect();
            if !hits.is_empty() {
                return hits;
            }
            current = self.sym(id).base_symbol;
        }
        Vec::new()
    }

    /// Look `name` up in `scope`, keeping symbols accepted by `filter`.
    fn lookup(
        &self,
        scope: Scope,
        name: &str,
        filter: impl Fn(&Symbol) -> bool,
    ) -> Result<Vec<SymbolId>, ResolutionFailure> {
        let keep = |hits: Vec<SymbolId>| -> Vec<SymbolId> {
            hits.into_iter().filter(|id| filter(self.sym(*id))).collect()
        };

        if let Scope::At(id) = scope {
            return Ok(keep(self.lookup_in(id, name)));
        }

        for scope in self.lexical_scopes() {
            let hits = keep(self.lookup_in(scope, name));
            if !hits.is_empty() {
                trace!(name, scope = ?scope, count = hits.len(), "lexical hit");
                return Ok(hits);
            }
        }

        let alias = self
            .graph
            .resolve_alias(self.context, name)
            .filter(|id| filter(self.sym(*id)));

        let mut sources = Vec::new();
        let mut imported = Vec::new();
        for namespace in self.graph.imported_namespaces(self.context) {
            let hits = keep(self.graph.lookup_member(namespace, name));
            if !hits.is_empty() {
                sources.push(namespace);
                imported.extend(hits);
            }
        }

        match alias {
            Some(target) if sources.is_empty() => Ok(vec![target]),
            Some(_) => {
                let mut candidates = vec![format!("using alias `{name}`")];
                candidates.extend(sources.iter().map(|ns| self.graph.qualified_name(*ns)));
                Err(ResolutionFailure::Conflict {
                    name: name.to_string(),
                    candidates,
                })
            }
            None if sources.len() > 1 => Err(ResolutionFailure::Conflict {
                name: name.to_string(),
                candidates: sources
                    .iter()
                    .map(|ns| self.graph.qualified_name(*ns))
                    .collect(),
            }),
            None => Ok(imported),
        }
    }

    /// Choose the namespace or type a container segment names.
    fn pick_container(
        &self,
        hits: Vec<SymbolId>,
        segment: &NameSegment,
        scope: Scope,
    ) -> Result<SymbolId, ResolutionFailure> {
        let arity = segment.generics.arity();
        let exact: Vec<SymbolId> = hits
            .iter()
            .copied()
            .filter(|id| self.sym(*id).type_params.len() == arity)
            .collect();
        match (exact.as_slice(), hits.as_slice()) {
            ([id], _) => Ok(*id),
            // `Box` may name the only generic `Box<T>` in scope.
            ([], [id]) if arity == 0 => Ok(*id),
            ([], _) => Err(self.not_found(&segment.to_string(), scope)),
            (many, _) => Err(ResolutionFailure::Ambiguous {
                name: segment.to_string(),
                count: many.len(),
            }),
        }
    }

    fn members_where(&self, ty: SymbolId, filter: impl Fn(&Symbol) -> bool) -> Vec<SymbolId> {
        self.sym(ty)
            .members
            .iter()
            .copied()
            .filter(|id| filter(self.sym(*id)))
            .collect()
    }

    fn not_found(&self, name: &str, scope: Scope) -> ResolutionFailure {
        let scope = match scope {
            Scope::Lexical => format!(
                "the scope of `{}`",
                qualified_signature(self.graph, self.context)
            ),
            Scope::At(id) if id == self.graph.global_namespace() => "the global namespace".to_string(),
            Scope::At(id) => format!("`{}`", member_signature(self.graph, id)),
        };
        ResolutionFailure::NotFound {
            name: name.to_string(),
            scope,
        }
    }

    // Member selection

    fn resolve_member(
        &self,
        scope: Scope,
        last: &NameSegment,
        params: Option<&ParamList>,
        accessor: Option<AccessorKind>,
        bindings: &mut Bindings,
    ) -> Result<(SymbolId, Option<AccessorKind>), ResolutionFailure> {
        let mut hits = self.lookup(scope, &last.name, |_| true)?;

        if let Some(kind) = accessor {
            let owners: Vec<SymbolId> = hits
                .iter()
                .copied()
                .filter(|id| kind.applies_to(self.sym(*id).kind))
                .collect();
            if owners.is_empty() {
                // A method literally named `Name_get`.
                let literal = NameSegment {
                    name: format!("{}_{}", last.name, kind.keyword()),
                    generics: last.generics.clone(),
                };
                let literal_hits = self.lookup(scope, &literal.name, |_| true)?;
                if !literal_hits.is_empty() {
                    let id = self.select(literal_hits, &literal, params, bindings, scope)?;
                    return Ok((id, None));
                }
                return match hits.first() {
                    Some(&other) => Err(ResolutionFailure::WrongKind {
                        name: last.name.clone(),
                        found: self.sym(other).kind.describe(),
                        expected: "property, indexer or event",
                    }),
                    None => Err(self.not_found(&literal.name, scope)),
                };
            }
            hits = owners;
        }

        // `Type(..)` names a constructor of that type.
        if params.is_some()
            && accessor.is_none()
            && !hits.is_empty()
            && hits.iter().all(|id| self.sym(*id).kind.is_type())
        {
            let ty = self.pick_container(hits, last, scope)?;
            bindings.push((ty, last.generics.clone()));
            let ctors = self.members_where(ty, |s| s.kind == SymbolKind::Constructor);
            let name = format!("{}.#ctor", self.sym(ty).name);
            return Ok((self.select_overload(ctors, &name, params, bindings)?, None));
        }

        let id = self.select(hits, last, params, bindings, scope)?;
        Ok((id, accessor))
    }

    /// Filter `hits` by generic arity and parameter list.
    fn select(
        &self,
        hits: Vec<SymbolId>,
        segment: &NameSegment,
        params: Option<&ParamList>,
        bindings: &mut Bindings,
        scope: Scope,
    ) -> Result<SymbolId, ResolutionFailure> {
        if hits.is_empty() {
            return Err(self.not_found(&segment.to_string(), scope));
        }

        let arity = segment.generics.arity();
        let mut by_arity: Vec<SymbolId> = hits
            .iter()
            .copied()
            .filter(|id| {
                let sym = self.sym(*id);
                (arity == 0 && !sym.kind.is_type()) || sym.type_params.len() == arity
            })
            .collect();
        if by_arity.is_empty() && arity == 0 && hits.len() == 1 {
            by_arity = hits;
        }
        if by_arity.is_empty() {
            return Err(self.not_found(&segment.to_string(), scope));
        }

        let id = match params {
            None => single(by_arity, &segment.to_string())?,
            Some(list) => {
                let matching: Vec<SymbolId> = by_arity
                    .into_iter()
                    .filter(|id| {
                        let sym = self.sym(*id);
                        let substitutions = self.substitutions(bindings, Some((sym, &segment.generics)));
                        takes_parameter_list(sym.kind) && parameters_match(sym, list, &substitutions)
                    })
                    .collect();
                if matching.is_empty() {
                    return Err(ResolutionFailure::NoMatchingOverload {
                        name: segment.to_string(),
                        signature: list.to_string(),
                    });
                }
                single(matching, &segment.to_string())?
            }
        };
        bindings.push((id, segment.generics.clone()));
        Ok(id)
    }

    /// Select among special members, which carry no generic arguments.
    fn select_overload(
        &self,
        hits: Vec<SymbolId>,
        name: &str,
        params: Option<&ParamList>,
        bindings: &Bindings,
    ) -> Result<SymbolId, ResolutionFailure> {
        if hits.is_empty() {
            return Err(ResolutionFailure::NotFound {
                name: name.to_string(),
                scope: format!("the scope of `{}`", qualified_signature(self.graph, self.context)),
            });
        }
        let Some(list) = params else {
            return single(hits, name);
        };
        let substitutions = self.substitutions(bindings, None);
        let matching: Vec<SymbolId> = hits
            .into_iter()
            .filter(|id| parameters_match(self.sym(*id), list, &substitutions))
            .collect();
        if matching.is_empty() {
            return Err(ResolutionFailure::NoMatchingOverload {
                name: name.to_string(),
                signature: list.to_string(),
            });
        }
        single(matching, name)
    }

    /// Type parameter substitutions from the bound segments, plus an
    /// optional candidate's own type parameters.
    fn substitutions(
        &self,
        bindings: &Bindings,
        candidate: Option<(&Symbol, &GenericArgs)>,
    ) -> FxHashMap<String, String> {
        let mut bound: Vec<(&Symbol, &GenericArgs)> = bindings
            .iter()
            .map(|(id, args)| (self.sym(*id), args))
            .collect();
        bound.extend(candidate);
        let mut map = FxHashMap::default();
        for (sym, args) in bound {
            for (param, arg) in sym.type_params.iter().zip(args.bound()) {
                map.insert(param.name.clone(), arg.clone());
            }
        }
        map
    }

    // Validation

    fn validate(
        &self,
        symbol: SymbolId,
        accessor: Option<AccessorKind>,
        bindings: &Bindings,
    ) -> Result<ResolvedTarget, ResolutionFailure> {
        let sym = self.sym(symbol);
        let name = || qualified_signature(self.graph, symbol);

        if let Some(kind) = accessor {
            if !kind.applies_to(sym.kind) {
                return Err(ResolutionFailure::WrongKind {
                    name: name(),
                    found: sym.kind.describe(),
                    expected: "property, indexer or event",
                });
            }
            if sym.accessor(kind).is_none() {
                return Err(ResolutionFailure::MissingAccessor {
                    member: name(),
                    accessor: kind.keyword(),
                });
            }
        }

        if self.is_self_or_ancestor(symbol) {
            return Err(ResolutionFailure::SelfOrAncestor { name: name() });
        }

        if sym.is_external() || !self.graph.is_accessible(symbol, self.context) {
            return Err(ResolutionFailure::NotAccessible { name: name() });
        }

        self.check_shape(symbol, accessor)?;

        if (sym.kind.is_method_like() || accessor.is_some())
            && !self.graph.has_implementation(symbol, accessor)
        {
            return Err(ResolutionFailure::NoImplementation { name: name() });
        }

        self.check_type_arguments(bindings)?;

        let type_arguments = bindings
            .iter()
            .flat_map(|(id, args)| {
                self.sym(*id)
                    .type_params
                    .iter()
                    .zip(args.bound())
                    .map(|(param, arg)| (param.name.clone(), arg.clone()))
            })
            .collect();

        Ok(ResolvedTarget {
            symbol,
            kind: sym.kind,
            accessor,
            declaration: (!sym.parts.is_empty()).then(|| sym.location()),
            type_arguments,
        })
    }

    /// The destination itself, a member it overrides, a type containing it,
    /// or (for type destinations) a type it derives from.
    fn is_self_or_ancestor(&self, target: SymbolId) -> bool {
        if target == self.context {
            return true;
        }

        let mut seen = FxHashSet::default();
        let mut overridden = self.sym(self.context).overridden;
        while let Some(id) = overridden {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                break;
            }
            overridden = self.sym(id).overridden;
        }

        if self.graph.containers(self.context).contains(&target) {
            return true;
        }

        seen.clear();
        let mut base = self.sym(self.context).base_symbol;
        while let Some(id) = base {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                break;
            }
            base = self.sym(id).base_symbol;
        }
        false
    }

    /// Whether the target's declaration kind fits the destination's.
    fn check_shape(
        &self,
        target: SymbolId,
        accessor: Option<AccessorKind>,
    ) -> Result<(), ResolutionFailure> {
        let found = self.sym(target).kind;
        let destination = self.sym(self.context).kind;

        let (fits, expected) = match destination {
            SymbolKind::Type(_) => (found.is_type(), "type"),
            SymbolKind::Method
            | SymbolKind::Constructor
            | SymbolKind::Destructor
            | SymbolKind::Operator(_)
            | SymbolKind::Conversion { .. } => (
                found.is_method_like() || accessor.is_some(),
                "method or accessor",
            ),
            SymbolKind::Property | SymbolKind::Indexer => (
                matches!(found, SymbolKind::Property | SymbolKind::Indexer) && accessor.is_none(),
                "property or indexer",
            ),
            SymbolKind::Event => (
                found == SymbolKind::Event && accessor.is_none(),
                "event",
            ),
            SymbolKind::Field | SymbolKind::Namespace => (false, "copyable declaration"),
        };

        if fits {
            Ok(())
        } else {
            let found = match accessor {
                Some(_) => "accessor",
                None => found.describe(),
            };
            Err(ResolutionFailure::WrongKind {
                name: qualified_signature(self.graph, target),
                found,
                expected,
            })
        }
    }

    fn check_type_arguments(&self, bindings: &Bindings) -> Result<(), ResolutionFailure> {
        for (id, args) in bindings {
            let sym = self.sym(*id);
            for (param, arg) in sym.type_params.iter().zip(args.bound()) {
                let argument = TypeArgument {
                    text: arg,
                    symbol: self.find_type(arg),
                };
                if let Some(constraint) = violated_constraint(self.graph, param, argument) {
                    return Err(ResolutionFailure::InvalidTypeArgument {
                        symbol: member_signature(self.graph, *id),
                        parameter: param.name.clone(),
                        argument: arg.clone(),
                        constraint: constraint.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Best-effort lookup of the type a type argument names.
    fn find_type(&self, text: &str) -> Option<SymbolId> {
        let text = text.trim().trim_end_matches('?');
        if text.contains(['[', '(', '*']) {
            return None;
        }
        let text = text.strip_prefix("global::").unwrap_or(text);
        let name = text.split('<').next().unwrap_or(text);

        let mut scope = Scope::Lexical;
        let mut found = None;
        for segment in name.split('.') {
            let hits = self.lookup(scope, segment.trim(), |s| s.kind.is_container()).ok()?;
            let [id] = hits.as_slice() else {
                return None;
            };
            found = Some(*id);
            scope = Scope::At(*id);
        }
        found.filter(|id| self.sym(*id).kind.is_type())
    }
}

fn single(hits: Vec<SymbolId>, name: &str) -> Result<SymbolId, ResolutionFailure> {
    match hits.as_slice() {
        [id] => Ok(*id),
        _ => Err(ResolutionFailure::Ambiguous {
            name: name.to_string(),
            count: hits.len(),
        }),
    }
}
