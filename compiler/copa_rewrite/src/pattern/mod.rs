//! Validation of pattern attributes.

use std::borrow::Cow;
use std::fmt;

use copa_diagnostic::{Diagnostic, ErrorCode};
use copa_ir::{Location, PatternAttribute};
use regex::Regex;

/// A pattern attribute and the declaration part it was written on.
#[derive(Copy, Clone, Debug)]
pub struct PatternSource<'a> {
    pub part: usize,
    pub attribute: &'a PatternAttribute,
}

/// A validated search/replace step.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
    replacement: String,
    order: i32,
    location: Location,
}

impl Pattern {
    pub fn search(&self) -> &str {
        self.regex.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Replace every match; `$1` and `${name}` expand to captures.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.regex.replace_all(text, self.replacement.as_str())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pattern({:?} -> {:?}, order {})",
            self.search(),
            self.replacement,
            self.order
        )
    }
}

/// The patterns of one declaration, in application order.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `sources` for a directive written on part `directive_part`.
    ///
    /// Problems never remove the directive's output. A pattern with no
    /// search, no replacement or an invalid expression is dropped, as are
    /// patterns that replace a match with itself and exact duplicates.
    /// Patterns written on another part are kept but flagged.
    #[tracing::instrument(level = "debug", skip_all, fields(count = sources.len()))]
    pub fn validate(
        sources: &[PatternSource<'_>],
        directive_part: usize,
        directive_location: Location,
    ) -> (PatternSet, Vec<Diagnostic>) {
        let mut ordered: Vec<&PatternSource<'_>> = sources.iter().collect();
        ordered.sort_by_key(|source| (source.attribute.order, source.attribute.location));

        let mut patterns: Vec<Pattern> = Vec::with_capacity(ordered.len());
        let mut warnings = Vec::new();

        for source in ordered {
            let attribute = source.attribute;
            let location = attribute.location;

            let Some(search) = attribute.search.as_ref().filter(|s| !s.is_empty()) else {
                warnings.push(Diagnostic::at(
                    ErrorCode::InvalidPatternAttributeSpecified,
                    location,
                    "pattern has no search expression",
                ));
                continue;
            };
            let Some(replacement) = attribute.replacement.as_ref() else {
                warnings.push(Diagnostic::at(
                    ErrorCode::InvalidPatternAttributeSpecified,
                    location,
                    format!("pattern `{search}` has no replacement"),
                ));
                continue;
            };

            if search == replacement {
                warnings.push(Diagnostic::at(
                    ErrorCode::RedundantPatternAttribute,
                    location,
                    format!("pattern `{search}` replaces matches with themselves"),
                ));
                continue;
            }

            if let Some(previous) = patterns
                .iter()
                .find(|p| p.search() == search.as_str() && p.replacement == *replacement)
            {
                warnings.push(
                    Diagnostic::at(
                        ErrorCode::EquivalentPatternAttribute,
                        location,
                        format!("pattern `{search}` -> `{replacement}` is specified twice"),
                    )
                    .with_secondary_label(previous.location, "first specified here"),
                );
                continue;
            }

            let regex = match Regex::new(search) {
                Ok(regex) => regex,
                Err(error) => {
                    warnings.push(
                        Diagnostic::at(
                            ErrorCode::InvalidPatternAttributeSpecified,
                            location,
                            format!("pattern `{search}` is not a valid regular expression"),
                        )
                        .with_note(error.to_string()),
                    );
                    continue;
                }
            };

            if let Some(previous) = patterns.iter().find(|p| p.search() == search.as_str()) {
                warnings.push(
                    Diagnostic::at(
                        ErrorCode::RedundantPatternAttribute,
                        location,
                        format!("pattern `{search}` already has a replacement"),
                    )
                    .with_secondary_label(previous.location, "earlier replacement"),
                );
            }

            if source.part != directive_part {
                warnings.push(
                    Diagnostic::at(
                        ErrorCode::PatternOnDifferentDeclaration,
                        location,
                        format!("pattern `{search}` is written on another part of the declaration"),
                    )
                    .with_secondary_label(directive_location, "copy directive is here"),
                );
            }

            tracing::trace!(search = %search, replacement = %replacement, "pattern accepted");
            patterns.push(Pattern {
                regex,
                replacement: replacement.clone(),
                order: attribute.order,
                location,
            });
        }

        (PatternSet { patterns }, warnings)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Fold every pattern over `text`.
    pub fn apply(&self, text: &str) -> String {
        crate::rewrite(text, &self.patterns)
    }
}

#[cfg(test)]
mod tests;
