//! The generation pass state machine.

use std::collections::hash_map::Entry;
use std::fmt;

use copa_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue, ErrorCode, ErrorGuaranteed};
use copa_extract::{extract, ContentShape, ExtractRequest, ExtractedContent};
use copa_graph::{analyze, DependencyGraph, DirectiveNode, NodeId};
use copa_ir::{AccessorKind, CopyDirective, SymbolGraphProvider, SymbolId, SymbolKind};
use copa_resolve::display::{provenance, qualified_signature};
use copa_resolve::{resolve_target, ResolutionFailure, ResolvedTarget};
use copa_rewrite::{PatternSet, PatternSource};
use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::emit::{render, HintNames, RenderInput};
use crate::validate::{bearer_errors, directive_warnings, missing_target};
use crate::{CancellationToken, GenerationUnit, GeneratorConfig, PassError, PassOutput};

/// Pass-level phase.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
enum Phase {
    Collected,
    GraphBuilt,
    Ordered,
    PerDirective,
    Done,
}

/// Where one directive stands.
#[derive(Clone, Debug)]
enum DirectiveState {
    Pending,
    Resolved(ResolvedTarget),
    Failed(ErrorGuaranteed),
    Generated,
}

/// One directive and the declaration carrying it.
struct Slot<'g> {
    bearer: SymbolId,
    /// Part of the bearer the directive is written on.
    part: usize,
    /// Position among the bearer's directives.
    index: usize,
    directive: &'g CopyDirective,
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({:?}#{})", self.bearer, self.index)
    }
}

/// Validated patterns of one bearer part, shared by its directives.
#[derive(Clone)]
struct PatternEntry {
    set: PatternSet,
    warnings: Vec<Diagnostic>,
}

/// What per-directive generation produced, before hints are assigned.
struct Generated {
    slot: usize,
    target: ResolvedTarget,
    content: ExtractedContent,
    text: String,
    warnings: Vec<Diagnostic>,
}

/// Runs generation passes over symbol snapshots.
///
/// # Example
///
/// ```text
/// let generator = Generator::with_config(GeneratorConfig::default());
/// let output = generator.run(&snapshot)?;
/// for unit in output.units { host.add_source(unit.hint, unit.text); }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Generator {
    config: GeneratorConfig,
    token: CancellationToken,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Generator {
            config,
            token: CancellationToken::new(),
        }
    }

    /// Share `token` with the host so it can cancel a running pass.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Run one pass over every copy directive of `graph`.
    ///
    /// Returns `Err(PassError::Cancelled)` if cancellation was observed at
    /// any point; no partial output is returned in that case.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&self, graph: &dyn SymbolGraphProvider) -> Result<PassOutput, PassError> {
        let mut pass = Pass::collect(graph, self);
        pass.validate();
        pass.resolve()?;
        pass.order()?;
        pass.generate()?;
        Ok(pass.finish())
    }

    fn check_cancelled(&self) -> Result<(), PassError> {
        if self.token.is_cancelled() {
            debug!("cancellation observed");
            return Err(PassError::Cancelled);
        }
        Ok(())
    }

    /// Map `f` over `items`, on a scoped pool when configured.
    fn map_items<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        if !self.config.parallel || items.len() < 2 {
            return items.iter().map(&f).collect();
        }
        rayon::ThreadPoolBuilder::new()
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| items.par_iter().map(&f).collect::<Vec<_>>())
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                items.iter().map(&f).collect()
            })
    }
}

/// Run one pass with `config` and no external cancellation.
pub fn generate(
    graph: &dyn SymbolGraphProvider,
    config: GeneratorConfig,
) -> Result<PassOutput, PassError> {
    Generator::with_config(config).run(graph)
}

/// State of one pass. Created and dropped inside [`Generator::run`].
struct Pass<'g> {
    graph: &'g dyn SymbolGraphProvider,
    generator: &'g Generator,
    phase: Phase,
    slots: Vec<Slot<'g>>,
    states: Vec<DirectiveState>,
    /// Slots that repeat an earlier directive of the same bearer.
    repeated: FxHashSet<usize>,
    /// Directives to generate with their dependency level, in output order.
    order: Vec<(NodeId, u32)>,
    queue: DiagnosticQueue,
    units: Vec<GenerationUnit>,
}

impl<'g> Pass<'g> {
    fn collect(graph: &'g dyn SymbolGraphProvider, generator: &'g Generator) -> Self {
        let mut slots = Vec::new();
        for bearer in graph.directive_bearers() {
            for (index, (part, directive)) in graph.symbol(bearer).directives().enumerate() {
                slots.push(Slot {
                    bearer,
                    part,
                    index,
                    directive,
                });
            }
        }
        debug!(directives = slots.len(), "directives collected");

        let states = vec![DirectiveState::Pending; slots.len()];
        Pass {
            graph,
            generator,
            phase: Phase::Collected,
            slots,
            states,
            repeated: FxHashSet::default(),
            order: Vec::new(),
            queue: DiagnosticQueue::with_config(DiagnosticConfig {
                error_limit: generator.config.error_limit,
                ..DiagnosticConfig::default()
            }),
            units: Vec::new(),
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug_assert!(phase > self.phase, "pass phases only move forward");
        debug!(from = ?self.phase, to = ?phase, "pass phase");
        self.phase = phase;
    }

    fn fail(&mut self, slot: usize, diagnostic: Diagnostic) {
        let guarantee = self.queue.emit_error(diagnostic);
        self.states[slot] = DirectiveState::Failed(guarantee);
    }

    /// Bearer and directive-surface checks.
    fn validate(&mut self) {
        let mut start = 0;
        while start < self.slots.len() {
            let bearer = self.slots[start].bearer;
            let end = start
                + self.slots[start..]
                    .iter()
                    .take_while(|s| s.bearer == bearer)
                    .count();

            let errors = bearer_errors(self.graph, bearer);
            if errors.is_empty() {
                let directives: Vec<&CopyDirective> =
                    self.slots[start..end].iter().map(|s| s.directive).collect();
                let (warnings, repeated) = directive_warnings(&directives);
                self.queue.extend(warnings);
                self.repeated.extend(repeated.into_iter().map(|i| start + i));

                for slot in start..end {
                    if self.slots[slot].directive.target.is_none() {
                        let diagnostic = missing_target(self.slots[slot].directive);
                        self.fail(slot, diagnostic);
                    }
                }
            } else {
                let mut guarantee = None;
                for error in errors {
                    guarantee = Some(self.queue.emit_error(error));
                }
                if let Some(guarantee) = guarantee {
                    for state in &mut self.states[start..end] {
                        *state = DirectiveState::Failed(guarantee);
                    }
                }
            }
            start = end;
        }
    }

    /// Bind every pending directive to its target.
    fn resolve(&mut self) -> Result<(), PassError> {
        let graph = self.graph;
        let generator = self.generator;
        let pending: Vec<(usize, &Slot<'g>)> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(i, _)| matches!(self.states[*i], DirectiveState::Pending))
            .collect();

        let results = generator.map_items(&pending, |(i, slot)| {
            if generator.token.is_cancelled() {
                return None;
            }
            let target = slot.directive.target.as_ref()?;
            trace!(slot = ?slot, "resolving");
            Some((*i, resolve_target(graph, target, slot.bearer)))
        });
        generator.check_cancelled()?;

        for (slot, result) in results.into_iter().flatten() {
            match result {
                Ok(target) => self.states[slot] = DirectiveState::Resolved(target),
                Err(failure) => {
                    let diagnostic = self.resolution_diagnostic(slot, &failure);
                    self.fail(slot, diagnostic);
                }
            }
        }
        self.flag_equivalent_targets();
        Ok(())
    }

    fn resolution_diagnostic(&self, slot: usize, failure: &ResolutionFailure) -> Diagnostic {
        let directive = self.slots[slot].directive;
        failure.to_diagnostic(directive.location)
    }

    /// Warn about a directive binding to the same target as an earlier one
    /// of its bearer. Different `PartialPart` values make targets distinct.
    fn flag_equivalent_targets(&mut self) {
        let mut seen: FxHashMap<(SymbolId, &ResolvedTarget, Option<&str>), usize> =
            FxHashMap::default();
        let mut warnings = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let DirectiveState::Resolved(target) = &self.states[i] else {
                continue;
            };
            let key = (slot.bearer, target, slot.directive.partial_part.as_deref());
            match seen.get(&key) {
                Some(first) if !self.repeated.contains(&i) => {
                    warnings.push(
                        Diagnostic::at(
                            ErrorCode::EquivalentTarget,
                            slot.directive.location,
                            format!(
                                "`{}` is already copied by another directive",
                                qualified_signature(self.graph, target.symbol)
                            ),
                        )
                        .with_secondary_label(self.slots[*first].directive.location, "first copied here"),
                    );
                }
                Some(_) => {}
                None => {
                    seen.insert(key, i);
                }
            }
        }
        self.queue.extend(warnings);
    }

    /// Build the dependency graph, exclude cycles and order the rest.
    fn order(&mut self) -> Result<(), PassError> {
        let nodes: Vec<DirectiveNode> = self
            .slots
            .iter()
            .zip(&self.states)
            .map(|(slot, state)| DirectiveNode {
                bearer: slot.bearer,
                slot: slot.index,
                target: match state {
                    DirectiveState::Resolved(target) => Some(target.symbol),
                    _ => None,
                },
                order: slot.directive.order,
                location: slot.directive.location,
                label: qualified_signature(self.graph, slot.bearer),
            })
            .collect();
        let dependencies = DependencyGraph::build(nodes);
        self.enter(Phase::GraphBuilt);

        let token = &self.generator.token;
        let analysis = analyze(&dependencies, &|| token.is_cancelled())?;

        for cycle in &analysis.cycles {
            let guarantee = self.queue.emit_error(cycle.to_diagnostic(&dependencies));
            for member in cycle.members() {
                self.states[member.index()] = DirectiveState::Failed(guarantee);
            }
        }
        self.order = analysis
            .order
            .iter()
            .map(|id| (*id, analysis.level(*id).unwrap_or(0)))
            .collect();
        self.enter(Phase::Ordered);
        Ok(())
    }

    /// Extract, rewrite and render every resolved directive, one dependency
    /// level at a time so later levels can build on content generated earlier.
    fn generate(&mut self) -> Result<(), PassError> {
        self.enter(Phase::PerDirective);
        let graph = self.graph;
        let generator = self.generator;
        let patterns: Mutex<FxHashMap<(SymbolId, usize), PatternEntry>> =
            Mutex::new(FxHashMap::default());
        let mut inherited: FxHashMap<SymbolId, ContentShape> = FxHashMap::default();
        let mut hints = HintNames::default();

        let order = std::mem::take(&mut self.order);
        for level in order.chunk_by(|a, b| a.1 == b.1) {
            let work: Vec<(usize, ResolvedTarget)> = level
                .iter()
                .filter_map(|(id, _)| match &self.states[id.index()] {
                    DirectiveState::Resolved(target) => Some((id.index(), target.clone())),
                    _ => None,
                })
                .collect();

            let slots = &self.slots;
            let generated_so_far = &inherited;
            let results = generator.map_items(&work, |(i, target)| {
                if generator.token.is_cancelled() {
                    return None;
                }
                let job = Job {
                    slot: &slots[*i],
                    index: *i,
                    target,
                    inherited: generated_so_far.get(&target.symbol),
                };
                Some(generate_one(graph, &generator.config, &job, &patterns))
            });
            generator.check_cancelled()?;

            for result in results.into_iter().flatten() {
                match result {
                    Ok(generated) => {
                        let bearer = self.slots[generated.slot].bearer;
                        record_generated(
                            &mut inherited,
                            graph.symbol(bearer).kind,
                            bearer,
                            generated.target.accessor,
                            &generated.content.shape,
                        );
                        let hint = hints.assign(graph, bearer, &generator.config.hint_suffix);
                        self.queue.extend(generated.warnings.iter().cloned());
                        let mut diagnostics = generated.warnings;
                        diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
                        diagnostics.dedup();
                        self.units.push(GenerationUnit {
                            hint,
                            text: generated.text,
                            destination: bearer,
                            provenance: provenance(graph, &generated.target),
                            target: generated.target,
                            content: generated.content,
                            diagnostics,
                        });
                        self.states[generated.slot] = DirectiveState::Generated;
                    }
                    Err((slot, diagnostic)) => self.fail(slot, diagnostic),
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> PassOutput {
        self.enter(Phase::Done);
        let generated = self
            .states
            .iter()
            .filter(|s| matches!(s, DirectiveState::Generated))
            .count();
        let failed: Vec<ErrorGuaranteed> = self
            .states
            .iter()
            .filter_map(|s| match s {
                DirectiveState::Failed(guarantee) => Some(*guarantee),
                _ => None,
            })
            .collect();
        debug_assert!(failed.is_empty() || self.queue.has_errors().is_some());
        debug!(
            generated,
            failed = failed.len(),
            errors = self.queue.error_count(),
            "pass complete"
        );
        PassOutput {
            units: self.units,
            diagnostics: self.queue.flush(),
        }
    }
}

/// One directive's generation inputs.
struct Job<'a> {
    slot: &'a Slot<'a>,
    index: usize,
    target: &'a ResolvedTarget,
    /// Content generated earlier in the pass for the target.
    inherited: Option<&'a ContentShape>,
}

/// Remember what `bearer` received so directives copying from it see the
/// generated content. A body copied into a property, indexer or event is
/// rendered as one of its accessors and recorded as such.
fn record_generated(
    inherited: &mut FxHashMap<SymbolId, ContentShape>,
    kind: SymbolKind,
    bearer: SymbolId,
    accessor: Option<AccessorKind>,
    shape: &ContentShape,
) {
    let shape = match shape {
        ContentShape::Body(body)
            if matches!(kind, SymbolKind::Property | SymbolKind::Indexer | SymbolKind::Event) =>
        {
            ContentShape::Accessors(vec![(accessor.unwrap_or(AccessorKind::Get), body.clone())])
        }
        other => other.clone(),
    };
    match inherited.entry(bearer) {
        Entry::Occupied(mut entry) => entry.get_mut().absorb(shape),
        Entry::Vacant(entry) => {
            entry.insert(shape);
        }
    }
}

/// Extract, rewrite and render one directive.
fn generate_one(
    graph: &dyn SymbolGraphProvider,
    config: &GeneratorConfig,
    job: &Job<'_>,
    patterns: &Mutex<FxHashMap<(SymbolId, usize), PatternEntry>>,
) -> Result<Generated, (usize, Diagnostic)> {
    let Job {
        slot,
        index,
        target,
        inherited,
    } = *job;
    let directive = slot.directive;
    let request = ExtractRequest {
        destination: slot.bearer,
        target,
        directive,
        inherited,
    };
    let extraction =
        extract(graph, &request).map_err(|e| (index, e.to_diagnostic(directive.location)))?;
    let mut content = extraction.content;
    let mut warnings = extraction.warnings;

    let entry = pattern_entry(graph, slot, patterns);
    if !entry.set.is_empty() {
        content.map_text(|text| entry.set.apply(text));
    }
    warnings.extend(entry.warnings);

    for using in &directive.add_usings {
        let using = using.trim();
        if !content.usings.iter().any(|u| u == using) {
            content.usings.push(using.to_string());
        }
    }

    let text = render(&RenderInput {
        graph,
        destination: slot.bearer,
        accessor: target.accessor,
        content: &content,
        config,
    });
    trace!(slot = ?slot, bytes = text.len(), "rendered");
    Ok(Generated {
        slot: index,
        target: target.clone(),
        content,
        text,
        warnings,
    })
}

/// Patterns for the bearer part carrying `slot`, validated once per pass.
fn pattern_entry(
    graph: &dyn SymbolGraphProvider,
    slot: &Slot<'_>,
    cache: &Mutex<FxHashMap<(SymbolId, usize), PatternEntry>>,
) -> PatternEntry {
    let key = (slot.bearer, slot.part);
    if let Some(entry) = cache.lock().get(&key) {
        return entry.clone();
    }

    let bearer = graph.symbol(slot.bearer);
    let sources: Vec<PatternSource<'_>> = bearer
        .patterns()
        .map(|(part, attribute)| PatternSource { part, attribute })
        .collect();
    // Warnings point at the first directive of the part so every directive
    // sharing the entry sees the same diagnostics.
    let anchor = bearer
        .parts
        .get(slot.part)
        .and_then(|p| p.directives.first())
        .map_or(slot.directive.location, |d| d.location);
    let (set, warnings) = PatternSet::validate(&sources, slot.part, anchor);
    let entry = PatternEntry { set, warnings };
    cache.lock().entry(key).or_insert(entry).clone()
}

#[cfg(test)]
mod tests;
