//! Rendering of generation units.
//!
//! A unit is laid out as banner, usings, namespace block, partial
//! containing types, then the destination declaration with the copied
//! content in place.

use copa_extract::{ContentShape, ExtractedContent};
use copa_ir::{AccessorKind, Symbol, SymbolGraphProvider, SymbolId, SymbolKind};
use rustc_hash::FxHashSet;

use crate::GeneratorConfig;

/// Line-oriented text builder with an indentation level.
struct Writer<'a> {
    out: String,
    indent: &'a str,
    depth: usize,
}

impl<'a> Writer<'a> {
    fn new(indent: &'a str) -> Self {
        Writer {
            out: String::new(),
            indent,
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(self.indent);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    /// Write multi-line source text, re-indented to the current level.
    fn block(&mut self, text: &str) {
        for line in dedent(text) {
            self.line(line);
        }
    }

    fn open(&mut self) {
        self.line("{");
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Lines of `text` with the indentation shared by its continuation lines removed.
///
/// The first line usually starts right after the declaration header and
/// carries no indentation of its own. Only a whitespace prefix common to
/// every non-blank continuation line is removed, so mixed tabs, spaces and
/// other whitespace are never cut mid-character.
fn dedent(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let common = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| &l[..l.len() - l.trim_start().len()])
        .reduce(shared_prefix)
        .unwrap_or("");
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.trim_start()
            } else {
                line.strip_prefix(common).unwrap_or_else(|| line.trim_start())
            }
        })
        .collect()
}

/// Longest common prefix of `a` and `b`, cut on a character boundary.
fn shared_prefix<'t>(a: &'t str, b: &str) -> &'t str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or(a.len().min(b.len()), |((i, _), _)| i);
    &a[..end]
}

fn type_params(symbol: &Symbol) -> String {
    if symbol.type_params.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = symbol.type_params.iter().map(|tp| tp.name.as_str()).collect();
    format!("<{}>", names.join(", "))
}

fn params(symbol: &Symbol) -> String {
    let mut list: Vec<String> = symbol
        .params
        .iter()
        .map(|p| match p.ref_kind.keyword() {
            Some(kw) => format!("{kw} {} {}", p.ty, p.name),
            None => format!("{} {}", p.ty, p.name),
        })
        .collect();
    if symbol.varargs {
        list.push("__arglist".to_string());
    }
    list.join(", ")
}

/// Header of a partial type declaration, e.g. `partial class Widget<T>`.
fn type_header(symbol: &Symbol) -> String {
    let keyword = symbol.type_kind().map_or("class", |kind| kind.keyword());
    format!("partial {keyword} {}{}", symbol.name, type_params(symbol))
}

/// Header of a member declaration without its body or terminator.
///
/// Taken from the declaration's own text when present, synthesized from
/// the symbol model otherwise.
fn member_header(symbol: &Symbol) -> String {
    if let Some(text) = symbol.parts.first().map(|p| p.text.trim()) {
        if !text.is_empty() {
            let end = [text.find('{'), text.find("=>"), text.find(';')]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(text.len());
            return text[..end].trim_end().to_string();
        }
    }

    let accessibility = symbol.accessibility.keyword();
    let ty = symbol.return_type.as_deref().unwrap_or("void");
    let statik = if symbol.is_static() { "static " } else { "" };
    match symbol.kind {
        SymbolKind::Constructor => format!("{accessibility} {}({})", symbol.name, params(symbol)),
        SymbolKind::Destructor => format!("~{}()", symbol.name),
        SymbolKind::Operator(_) | SymbolKind::Conversion { .. } => {
            format!("{accessibility} static {}({})", operator_head(symbol, ty), params(symbol))
        }
        SymbolKind::Indexer => format!("{accessibility} partial {ty} this[{}]", params(symbol)),
        SymbolKind::Property => format!("{accessibility} {statik}partial {ty} {}", symbol.name),
        SymbolKind::Event => format!("{accessibility} {statik}partial event {ty} {}", symbol.name),
        _ => format!(
            "{accessibility} {statik}partial {ty} {}{}({})",
            symbol.name,
            type_params(symbol),
            params(symbol)
        ),
    }
}

/// `int operator +` for operators, `explicit operator int` for conversions.
fn operator_head(symbol: &Symbol, ty: &str) -> String {
    match symbol.kind {
        SymbolKind::Conversion { .. } => symbol.name.clone(),
        _ => format!("{ty} {}", symbol.name),
    }
}

/// Inputs to render one unit.
pub(crate) struct RenderInput<'a> {
    pub graph: &'a dyn SymbolGraphProvider,
    pub destination: SymbolId,
    /// Accessor the copied body belongs to, for member destinations.
    pub accessor: Option<AccessorKind>,
    pub content: &'a ExtractedContent,
    pub config: &'a GeneratorConfig,
}

pub(crate) fn render(input: &RenderInput<'_>) -> String {
    let graph = input.graph;
    let content = input.content;
    let mut w = Writer::new(&input.config.indent);

    if input.config.emit_header {
        w.line("// <auto-generated/>");
        w.blank();
    }

    if !content.usings.is_empty() {
        for using in &content.usings {
            w.line(&format!("using {using};"));
        }
        w.blank();
    }

    let containers = graph.containers(input.destination);
    let namespace = containers
        .iter()
        .copied()
        .find(|c| graph.symbol(*c).kind == SymbolKind::Namespace)
        .filter(|c| *c != graph.global_namespace());
    if let Some(ns) = namespace {
        w.line(&format!("namespace {}", graph.qualified_name(ns)));
        w.open();
    }

    let outer_types: Vec<SymbolId> = containers
        .iter()
        .rev()
        .copied()
        .filter(|c| graph.symbol(*c).kind.is_type())
        .collect();
    for outer in &outer_types {
        w.line(&type_header(graph.symbol(*outer)));
        w.open();
    }

    declaration(&mut w, graph.symbol(input.destination), input.accessor, content);

    for _ in &outer_types {
        w.close();
    }
    if namespace.is_some() {
        w.close();
    }
    w.finish()
}

fn declaration(
    w: &mut Writer<'_>,
    destination: &Symbol,
    accessor: Option<AccessorKind>,
    content: &ExtractedContent,
) {
    if let Some(doc) = &content.documentation {
        w.block(doc);
    }
    for attribute in &content.attributes {
        w.line(attribute);
    }

    let is_type = destination.kind.is_type();
    let mut header = if is_type {
        type_header(destination)
    } else {
        member_header(destination)
    };
    let bases: Vec<&str> = content
        .base_type
        .iter()
        .chain(&content.base_interfaces)
        .map(String::as_str)
        .collect();
    if !bases.is_empty() {
        header.push_str(" : ");
        header.push_str(&bases.join(", "));
    }
    if let Some(initializer) = &content.initializer {
        header.push_str(" : ");
        header.push_str(initializer);
    }
    w.line(&header);

    w.depth += 1;
    for clause in &content.constraints {
        w.line(clause);
    }
    w.depth -= 1;

    match &content.shape {
        ContentShape::Members(members) => {
            w.open();
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    w.blank();
                }
                w.block(member);
            }
            w.close();
        }
        ContentShape::Accessors(accessors) => {
            w.open();
            for (kind, body) in accessors {
                accessor_block(w, *kind, body);
            }
            w.close();
        }
        ContentShape::Body(body)
            if matches!(
                destination.kind,
                SymbolKind::Property | SymbolKind::Indexer | SymbolKind::Event
            ) =>
        {
            w.open();
            accessor_block(w, accessor.unwrap_or(AccessorKind::Get), body);
            w.close();
        }
        ContentShape::Body(body) => w.block(body),
    }
}

fn accessor_block(w: &mut Writer<'_>, kind: AccessorKind, body: &str) {
    let mut lines = dedent(body).into_iter();
    let first = lines.next().unwrap_or("{ }");
    w.line(&format!("{} {first}", kind.keyword()));
    for line in lines {
        w.line(line);
    }
}

/// Assigns unique hint names in output order.
#[derive(Default)]
pub(crate) struct HintNames {
    used: FxHashSet<String>,
}

impl HintNames {
    /// `<qualified destination><suffix>`, or `<qualified destination>_<n><suffix>`
    /// when that name is taken.
    pub(crate) fn assign(
        &mut self,
        graph: &dyn SymbolGraphProvider,
        destination: SymbolId,
        suffix: &str,
    ) -> String {
        let base: String = graph
            .qualified_name(destination)
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '.' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let mut candidate = format!("{base}{suffix}");
        let mut n = 1;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{base}_{n}{suffix}");
            n += 1;
        }
        candidate
    }
}
