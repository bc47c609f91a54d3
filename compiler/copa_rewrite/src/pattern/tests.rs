use super::*;
use copa_ir::FileId;
use pretty_assertions::assert_eq;

fn loc(offset: u32) -> Location {
    Location::at(FileId::from_raw(0), offset)
}

fn attr(search: &str, replacement: &str, order: i32, offset: u32) -> PatternAttribute {
    PatternAttribute::new(search, replacement, loc(offset)).with_order(order)
}

fn sources(attrs: &[PatternAttribute]) -> Vec<PatternSource<'_>> {
    attrs
        .iter()
        .map(|attribute| PatternSource { part: 0, attribute })
        .collect()
}

fn codes(warnings: &[Diagnostic]) -> Vec<ErrorCode> {
    warnings.iter().map(|d| d.code).collect()
}

#[test]
fn sorted_by_order_then_location() {
    let attrs = [attr("c", "d", 1, 5), attr("a", "b", 0, 9), attr("x", "y", 1, 2)];
    let (set, warnings) = PatternSet::validate(&sources(&attrs), 0, loc(0));
    assert!(warnings.is_empty());
    let searches: Vec<&str> = set.iter().map(Pattern::search).collect();
    assert_eq!(searches, vec!["a", "x", "c"]);
}

#[test]
fn missing_search_or_replacement_degrades_to_no_op() {
    let attrs = [
        PatternAttribute {
            search: None,
            replacement: Some("b".to_string()),
            order: 0,
            location: loc(1),
        },
        PatternAttribute {
            search: Some("a".to_string()),
            replacement: None,
            order: 0,
            location: loc(2),
        },
        attr("", "b", 0, 3),
    ];
    let (set, warnings) = PatternSet::validate(&sources(&attrs), 0, loc(0));
    assert!(set.is_empty());
    assert_eq!(
        codes(&warnings),
        vec![ErrorCode::InvalidPatternAttributeSpecified; 3]
    );
    assert_eq!(set.apply("a b"), "a b");
}

#[test]
fn invalid_expression_is_dropped_with_note() {
    let attrs = [attr("(unclosed", "x", 0, 1), attr("ok", "fine", 1, 2)];
    let (set, warnings) = PatternSet::validate(&sources(&attrs), 0, loc(0));
    assert_eq!(set.len(), 1);
    assert_eq!(codes(&warnings), vec![ErrorCode::InvalidPatternAttributeSpecified]);
    assert_eq!(warnings[0].notes.len(), 1);
    assert_eq!(set.apply("ok"), "fine");
}

#[test]
fn self_replacement_is_redundant() {
    let attrs = [attr("Foo", "Foo", 0, 1)];
    let (set, warnings) = PatternSet::validate(&sources(&attrs), 0, loc(0));
    assert!(set.is_empty());
    assert_eq!(codes(&warnings), vec![ErrorCode::RedundantPatternAttribute]);
}

#[test]
fn repeated_search_is_redundant_but_kept() {
    let attrs = [attr("Foo", "Bar", 0, 1), attr("Foo", "Baz", 1, 2)];
    let (set, warnings) = PatternSet::validate(&sources(&attrs), 0, loc(0));
    assert_eq!(set.len(), 2);
    assert_eq!(codes(&warnings), vec![ErrorCode::RedundantPatternAttribute]);
    assert_eq!(warnings[0].primary_location(), Some(loc(2)));
}

#[test]
fn identical_pattern_is_equivalent_and_dropped() {
    let attrs = [attr("Foo", "Bar", 0, 1), attr("Foo", "Bar", 0, 2)];
    let (set, warnings) = PatternSet::validate(&sources(&attrs), 0, loc(0));
    assert_eq!(set.len(), 1);
    assert_eq!(codes(&warnings), vec![ErrorCode::EquivalentPatternAttribute]);
    assert_eq!(warnings[0].labels.len(), 2);
}

#[test]
fn pattern_on_other_part_is_flagged_and_applied() {
    let attrs = [attr("Foo", "Bar", 0, 40)];
    let source = [PatternSource {
        part: 1,
        attribute: &attrs[0],
    }];
    let (set, warnings) = PatternSet::validate(&source, 0, loc(3));
    assert_eq!(codes(&warnings), vec![ErrorCode::PatternOnDifferentDeclaration]);
    assert_eq!(set.apply("Foo()"), "Bar()");
}

#[test]
fn captures_expand_in_replacement() {
    let attrs = [attr(r"Get(\w+)", "Fetch$1", 0, 1)];
    let (set, _) = PatternSet::validate(&sources(&attrs), 0, loc(0));
    assert_eq!(set.apply("GetName(); GetAge();"), "FetchName(); FetchAge();");
}
