use copa_diagnostic::ErrorCode;
use copa_ir::{AdditionalNodes, Body, Symbol};
use pretty_assertions::assert_eq;

use crate::common::{codes, only_unit, run, Program};

#[test]
fn base_type_is_copied_between_classes() {
    let mut p = Program::new();
    let global = p.global();
    let part = p.part();
    let source = p.add(
        global,
        Symbol::class("Source").public().with_base_type("Shape").with_part(part),
    );
    let member = p.part().with_text("public int Sides;");
    p.add(source, Symbol::field("Sides", "int").public().with_part(member));
    let directive = p.directive("Source").with_nodes(AdditionalNodes::BASE_TYPE);
    p.copying_with(global, Symbol::class("Dest"), vec![directive], Vec::new());
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let unit = only_unit(&output);
    assert_eq!(unit.content.base_type.as_deref(), Some("Shape"));
    assert!(unit.text.contains("partial class Dest : Shape\n{\n    public int Sides;\n}\n"));
}

#[test]
fn base_type_on_a_method_is_a_warning() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "Target", "{ }");
    let directive = p.directive("Target").with_nodes(AdditionalNodes::BASE_TYPE);
    p.copying_with(widget, Symbol::method("Method"), vec![directive], Vec::new());
    let output = run(&p.finish());

    assert_eq!(codes(&output), vec![ErrorCode::CannotApplyBaseType]);
    let unit = only_unit(&output);
    assert_eq!(unit.content.base_type, None);
    assert!(!unit.text.contains(" : "));
}

#[test]
fn added_usings_are_merged_into_the_unit() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    let part = p
        .part()
        .with_using("System.Linq")
        .with_body(Body::Block("{ items.Count(); }".to_string()));
    p.add(widget, Symbol::method("Target").public().with_part(part));
    let directive = p
        .directive("Target")
        .with_nodes(AdditionalNodes::USINGS)
        .with_using("System.Text")
        .with_using(" System.Linq ");
    p.copying_with(widget, Symbol::method("Method"), vec![directive], Vec::new());
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let unit = only_unit(&output);
    assert_eq!(unit.content.usings, vec!["System.Linq", "System.Text"]);
    assert!(unit.text.contains("using System.Linq;\nusing System.Text;\n"));
}

#[test]
fn repeated_using_is_a_warning() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "Target", "{ }");
    let directive = p
        .directive("Target")
        .with_using("System")
        .with_using("System");
    p.copying_with(widget, Symbol::method("Method"), vec![directive], Vec::new());
    let output = run(&p.finish());

    assert_eq!(codes(&output), vec![ErrorCode::UsingAlreadySpecified]);
    assert_eq!(only_unit(&output).content.usings, vec!["System"]);
}
