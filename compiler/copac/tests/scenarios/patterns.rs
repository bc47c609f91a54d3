use copa_diagnostic::ErrorCode;
use copa_ir::{AdditionalNodes, Symbol};
use pretty_assertions::assert_eq;

use crate::common::{body, codes, only_unit, run, Program};

#[test]
fn patterns_compose_in_order() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "Target", "{ A(); }");
    let directive = p.directive("Target");
    // Written in reverse so only `order` decides.
    let second = p.pattern("B", "C", 1);
    let first = p.pattern("A", "B", 0);
    p.copying_with(widget, Symbol::method("Method"), vec![directive], vec![second, first]);
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    assert_eq!(body(only_unit(&output)), "{ C(); }");
}

#[test]
fn captures_rename_identifiers() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "Target", "{ counter += step; }");
    let directive = p.directive("Target");
    let rename = p.pattern(r"\b(counter|step)\b", "my_$1", 0);
    p.copying_with(widget, Symbol::method("Method"), vec![directive], vec![rename]);
    let output = run(&p.finish());

    assert_eq!(body(only_unit(&output)), "{ my_counter += my_step; }");
}

#[test]
fn bad_patterns_warn_without_blocking_output() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "Target", "{ A(); }");
    let directive = p.directive("Target");
    let same = p.pattern("A", "A", 0);
    let broken = p.pattern("(", "x", 1);
    let rename = p.pattern("A", "Z", 2);
    p.copying_with(
        widget,
        Symbol::method("Method"),
        vec![directive],
        vec![same, broken, rename],
    );
    let output = run(&p.finish());

    assert_eq!(
        codes(&output),
        vec![
            ErrorCode::RedundantPatternAttribute,
            ErrorCode::InvalidPatternAttributeSpecified,
        ]
    );
    assert!(!output.has_errors());
    let unit = only_unit(&output);
    assert_eq!(body(unit), "{ Z(); }");
    assert_eq!(unit.diagnostics.len(), 2);
}

#[test]
fn patterns_are_shared_by_directives_of_a_declaration() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "First", "{ A(); }");
    p.method_with_body(widget, "Second", "{ A(); A(); }");
    let one = p.directive("First");
    let two = p.directive("Second");
    let duplicate = p.pattern("A", "B", 0);
    let again = p.pattern("A", "B", 0);
    p.copying_with(
        widget,
        Symbol::method("Method"),
        vec![one, two],
        vec![duplicate, again],
    );
    let output = run(&p.finish());

    let bodies: Vec<&str> = output.units.iter().map(body).collect();
    assert_eq!(bodies, vec!["{ B(); }", "{ B(); B(); }"]);
    // Reported once even though both directives use the set.
    assert_eq!(codes(&output), vec![ErrorCode::EquivalentPatternAttribute]);
}

#[test]
fn patterns_reach_attributes_and_base_lists() {
    let mut p = Program::new();
    let global = p.global();
    let part = p.part().with_attribute("[Foo]");
    p.add(
        global,
        Symbol::class("Shape")
            .public()
            .with_base_type("FooBase")
            .with_interface("IFoo")
            .with_part(part),
    );
    let directive = p.directive("Shape").with_nodes(
        AdditionalNodes::ATTRIBUTES | AdditionalNodes::BASE_TYPE | AdditionalNodes::BASE_INTERFACES,
    );
    let rename = p.pattern("Foo", "Bar", 0);
    p.copying_with(global, Symbol::class("Dest"), vec![directive], vec![rename]);
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let unit = only_unit(&output);
    assert_eq!(unit.content.attributes, vec!["[Bar]"]);
    assert_eq!(unit.content.base_type.as_deref(), Some("BarBase"));
    assert_eq!(unit.content.base_interfaces, vec!["IBar"]);
    assert!(!unit.text.contains("Foo"), "{}", unit.text);
    assert!(unit.text.contains("[Bar]\npartial class Dest : BarBase, IBar\n"), "{}", unit.text);
}
