use copa_diagnostic::Diagnostic;
use copa_extract::ExtractedContent;
use copa_ir::SymbolId;
use copa_resolve::ResolvedTarget;

/// One emitted artifact: the rewritten copy of one resolved target.
#[derive(Clone, Debug)]
pub struct GenerationUnit {
    /// Unique within the pass, e.g. `App.Widget.Method.g.cs`.
    pub hint: String,
    pub text: String,
    /// Declaration that carried the directive.
    pub destination: SymbolId,
    pub target: ResolvedTarget,
    /// Signature of the copied member, e.g. `Target()` or `Count_set`.
    pub provenance: String,
    /// Copied content after pattern rewriting.
    pub content: ExtractedContent,
    /// Warnings raised while producing this unit.
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything a completed pass hands to the host.
#[derive(Clone, Debug, Default)]
pub struct PassOutput {
    /// In dependency order.
    pub units: Vec<GenerationUnit>,
    /// Sorted by location, then code.
    pub diagnostics: Vec<Diagnostic>,
}

impl PassOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Units generated for `destination`, in output order.
    pub fn units_for(&self, destination: SymbolId) -> impl Iterator<Item = &GenerationUnit> {
        self.units
            .iter()
            .filter(move |u| u.destination == destination)
    }
}
