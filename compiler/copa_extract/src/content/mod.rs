use copa_diagnostic::Diagnostic;
use copa_ir::AccessorKind;

/// The copied syntax proper.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContentShape {
    /// Block body for a method-like destination.
    Body(String),
    /// Accessor blocks for a property, indexer or event destination.
    Accessors(Vec<(AccessorKind, String)>),
    /// Member declarations for a type destination.
    Members(Vec<String>),
}

/// Everything extracted for one directive, already adapted to the destination.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtractedContent {
    pub shape: ContentShape,
    /// Constructor initializer (`base(x)`), constructor destinations only.
    pub initializer: Option<String>,
    pub documentation: Option<String>,
    pub attributes: Vec<String>,
    pub base_type: Option<String>,
    pub base_interfaces: Vec<String>,
    /// Complete `where` clauses.
    pub constraints: Vec<String>,
    pub usings: Vec<String>,
}

impl ExtractedContent {
    pub fn new(shape: ContentShape) -> Self {
        ExtractedContent {
            shape,
            initializer: None,
            documentation: None,
            attributes: Vec::new(),
            base_type: None,
            base_interfaces: Vec::new(),
            constraints: Vec::new(),
            usings: Vec::new(),
        }
    }

    /// Rewrite every piece of copied text in place. Usings are left alone.
    pub fn map_text(&mut self, mut f: impl FnMut(&str) -> String) {
        self.shape.map_text(&mut f);
        for text in self
            .initializer
            .iter_mut()
            .chain(&mut self.documentation)
            .chain(&mut self.attributes)
            .chain(&mut self.base_type)
            .chain(&mut self.base_interfaces)
            .chain(&mut self.constraints)
        {
            *text = f(text);
        }
    }
}

impl ContentShape {
    pub fn map_text(&mut self, mut f: impl FnMut(&str) -> String) {
        match self {
            ContentShape::Body(body) => *body = f(body),
            ContentShape::Accessors(accessors) => {
                for (_, body) in accessors {
                    *body = f(body);
                }
            }
            ContentShape::Members(members) => {
                for member in members {
                    *member = f(member);
                }
            }
        }
    }

    /// Fold the content of another unit for the same declaration into this one.
    ///
    /// Members accumulate in order. Accessors are added for kinds not yet
    /// present. A body, or a shape of a different kind, keeps the first.
    pub fn absorb(&mut self, other: ContentShape) {
        match (self, other) {
            (ContentShape::Members(members), ContentShape::Members(more)) => members.extend(more),
            (ContentShape::Accessors(accessors), ContentShape::Accessors(more)) => {
                for (kind, body) in more {
                    if !accessors.iter().any(|(k, _)| *k == kind) {
                        accessors.push((kind, body));
                    }
                }
            }
            _ => {}
        }
    }
}

/// Extracted content plus the warnings raised by the structural filter.
#[derive(Clone, Debug)]
pub struct Extraction {
    pub content: ExtractedContent,
    pub warnings: Vec<Diagnostic>,
}
