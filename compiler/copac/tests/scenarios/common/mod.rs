//! Snapshot builders shared by the scenario tests.

use copa_diagnostic::ErrorCode;
use copa_extract::ContentShape;
use copa_ir::{
    Body, CopyDirective, DeclarationPart, DirectiveTarget, FileId, Location, PatternAttribute,
    ProgramSnapshot, SnapshotBuilder, Symbol, SymbolId,
};
use copac::{GenerationUnit, Generator, GeneratorConfig, PassOutput};

/// Builds a snapshot with source positions handed out in declaration order.
pub struct Program {
    builder: SnapshotBuilder,
    file: FileId,
    offset: u32,
}

impl Program {
    pub fn new() -> Self {
        let mut builder = SnapshotBuilder::new();
        let file = builder.file("Program.cs");
        Program {
            builder,
            file,
            offset: 0,
        }
    }

    /// Next source location.
    pub fn loc(&mut self) -> Location {
        self.offset += 10;
        Location::at(self.file, self.offset)
    }

    pub fn part(&mut self) -> DeclarationPart {
        let location = self.loc();
        DeclarationPart::new(location)
    }

    pub fn global(&self) -> SymbolId {
        self.builder.global()
    }

    pub fn namespace(&mut self, name: &str) -> SymbolId {
        let global = self.builder.global();
        self.builder.namespace(global, name)
    }

    pub fn add(&mut self, container: SymbolId, symbol: Symbol) -> SymbolId {
        self.builder.add(container, symbol)
    }

    /// Partial public class with one part.
    pub fn class(&mut self, container: SymbolId, name: &str) -> SymbolId {
        let part = self.part();
        self.add(container, Symbol::class(name).public().partial().with_part(part))
    }

    /// Public method with a block body.
    pub fn method_with_body(&mut self, container: SymbolId, name: &str, body: &str) -> SymbolId {
        let part = self.part().with_body(Body::Block(body.to_string()));
        self.add(container, Symbol::method(name).public().with_part(part))
    }

    /// Partial method carrying one directive per reference.
    pub fn copying(&mut self, container: SymbolId, name: &str, references: &[&str]) -> SymbolId {
        let directives: Vec<CopyDirective> = references
            .iter()
            .map(|r| self.directive(r))
            .collect();
        self.copying_with(container, Symbol::method(name), directives, Vec::new())
    }

    /// `symbol`, made public and partial, carrying `directives` and `patterns`.
    pub fn copying_with(
        &mut self,
        container: SymbolId,
        symbol: Symbol,
        directives: Vec<CopyDirective>,
        patterns: Vec<PatternAttribute>,
    ) -> SymbolId {
        let mut part = self.part();
        part.directives = directives;
        part.patterns = patterns;
        self.add(container, symbol.public().partial().with_part(part))
    }

    pub fn directive(&mut self, reference: &str) -> CopyDirective {
        let location = self.loc();
        CopyDirective::new(DirectiveTarget::text(reference), location)
    }

    pub fn pattern(&mut self, search: &str, replacement: &str, order: i32) -> PatternAttribute {
        let location = self.loc();
        PatternAttribute::new(search, replacement, location).with_order(order)
    }

    pub fn finish(self) -> ProgramSnapshot {
        self.builder.finish()
    }
}

pub fn run(snapshot: &ProgramSnapshot) -> PassOutput {
    run_with(snapshot, GeneratorConfig::sequential())
}

pub fn run_with(snapshot: &ProgramSnapshot, config: GeneratorConfig) -> PassOutput {
    Generator::with_config(config).run(snapshot).unwrap()
}

pub fn codes(output: &PassOutput) -> Vec<ErrorCode> {
    output.diagnostics.iter().map(|d| d.code).collect()
}

pub fn body(unit: &GenerationUnit) -> &str {
    match &unit.content.shape {
        ContentShape::Body(body) => body,
        other => panic!("expected a body, got {other:?}"),
    }
}

pub fn only_unit(output: &PassOutput) -> &GenerationUnit {
    assert_eq!(output.units.len(), 1, "units: {:#?}", output.units);
    &output.units[0]
}
