use copa_diagnostic::ErrorCode;
use copa_extract::ContentShape;
use copa_ir::{Accessor, AccessorKind, Body, CopyDirective, Location, Param, Symbol};
use pretty_assertions::assert_eq;

use crate::common::{body, codes, only_unit, run, Program};

#[test]
fn method_body_is_copied_verbatim() {
    let mut p = Program::new();
    let ns = p.namespace("App");
    let widget = p.class(ns, "Widget");
    p.method_with_body(widget, "Target", "{ x = 1; }");
    let method = p.copying(widget, "Method", &["Target"]);
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let unit = only_unit(&output);
    assert_eq!(body(unit), "{ x = 1; }");
    assert_eq!(unit.provenance, "Target()");
    assert_eq!(unit.destination, method);
    assert_eq!(unit.hint, "App.Widget.Method.g.cs");
    assert!(unit.text.contains("public partial void Method()\n        { x = 1; }\n"));
}

#[test]
fn missing_setter_cannot_be_resolved() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    let part = p.part();
    p.add(
        widget,
        Symbol::property("Property", "int")
            .public()
            .with_accessor(Accessor::auto(AccessorKind::Get))
            .with_part(part),
    );
    let directive = p.directive("Property_set");
    p.copying_with(
        widget,
        Symbol::method("Setter").with_param(Param::new("int", "value")),
        vec![directive],
        Vec::new(),
    );
    let output = run(&p.finish());

    assert!(output.units.is_empty());
    assert_eq!(codes(&output), vec![ErrorCode::MemberCannotBeResolved]);
}

#[test]
fn implicit_setter_body_is_synthesized() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    let part = p.part();
    p.add(
        widget,
        Symbol::property("Count", "int")
            .public()
            .with_accessor(Accessor::auto(AccessorKind::Get))
            .with_accessor(Accessor::auto(AccessorKind::Set))
            .with_part(part),
    );
    let directive = p.directive("Count_set");
    p.copying_with(
        widget,
        Symbol::method("SetCount").with_param(Param::new("int", "count")),
        vec![directive],
        Vec::new(),
    );
    let output = run(&p.finish());

    let unit = only_unit(&output);
    assert_eq!(body(unit), "{ Count = count; }");
    assert_eq!(unit.provenance, "Count_set");
}

#[test]
fn errors_stay_with_their_directive() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "Target", "{ x = 1; }");
    p.copying(widget, "Broken", &["Missing"]);
    let good = p.copying(widget, "Good", &["Target"]);
    let output = run(&p.finish());

    assert_eq!(codes(&output), vec![ErrorCode::MemberCannotBeResolved]);
    assert_eq!(only_unit(&output).destination, good);
}

#[test]
fn null_target_is_malformed() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    let location = p.loc();
    p.copying_with(
        widget,
        Symbol::method("Method"),
        vec![CopyDirective::without_target(location)],
        Vec::new(),
    );
    let output = run(&p.finish());

    assert!(output.units.is_empty());
    assert_eq!(codes(&output), vec![ErrorCode::MalformedReference]);
    assert_eq!(output.diagnostics[0].primary_location(), Some(location));
}

#[test]
fn non_partial_destination_is_rejected() {
    let mut p = Program::new();
    let global = p.global();
    let part = p.part();
    let plain = p.add(global, Symbol::class("Plain").public().with_part(part));
    p.method_with_body(plain, "Target", "{ }");
    p.copying(plain, "Method", &["Target"]);
    let output = run(&p.finish());

    assert!(output.units.is_empty());
    assert_eq!(codes(&output), vec![ErrorCode::ContainingTypeMustBePartial]);
}

#[test]
fn chained_copies_build_on_generated_bodies() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    // Declared first so the dependency order, not source order, decides.
    p.copying(widget, "Last", &["Middle"]);
    p.copying(widget, "Middle", &["Target"]);
    p.method_with_body(widget, "Target", "{ x = 1; }");
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let provenances: Vec<&str> = output.units.iter().map(|u| u.provenance.as_str()).collect();
    assert_eq!(provenances, vec!["Target()", "Middle()"]);
    assert!(output.units.iter().all(|u| body(u) == "{ x = 1; }"));
}

#[test]
fn type_chains_carry_generated_members() {
    let mut p = Program::new();
    let global = p.global();
    // Declared first so the dependency order, not source order, decides.
    let last = p.directive("Middle");
    let outer = p.copying_with(global, Symbol::class("Outer"), vec![last], Vec::new());
    let first = p.directive("Inner");
    let middle = p.copying_with(global, Symbol::class("Middle"), vec![first], Vec::new());

    let part = p.part();
    let inner = p.add(global, Symbol::class("Inner").public().with_part(part));
    let ctor = p
        .part()
        .with_text("public Inner(int x) { }")
        .with_body(Body::Block("{ }".to_string()));
    p.add(
        inner,
        Symbol::constructor("Inner")
            .public()
            .with_param(Param::new("int", "x"))
            .with_part(ctor),
    );
    let method = p
        .part()
        .with_text("public void M() { }")
        .with_body(Body::Block("{ }".to_string()));
    p.add(inner, Symbol::method("M").public().with_part(method));
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let shapes: Vec<(_, &ContentShape)> = output
        .units
        .iter()
        .map(|u| (u.destination, &u.content.shape))
        .collect();
    assert_eq!(
        shapes,
        vec![
            (
                middle,
                &ContentShape::Members(vec![
                    "public Middle(int x) { }".to_string(),
                    "public void M() { }".to_string(),
                ])
            ),
            (
                outer,
                &ContentShape::Members(vec![
                    "public Outer(int x) { }".to_string(),
                    "public void M() { }".to_string(),
                ])
            ),
        ]
    );
}

#[test]
fn property_chains_carry_generated_accessors() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    let auto_getter =
        |name: &str| Symbol::property(name, "int").with_accessor(Accessor::auto(AccessorKind::Get));
    let to_second = p.directive("Second");
    let first = p.copying_with(widget, auto_getter("First"), vec![to_second], Vec::new());
    let to_third = p.directive("Third");
    p.copying_with(widget, auto_getter("Second"), vec![to_third], Vec::new());

    let part = p.part();
    p.add(
        widget,
        Symbol::property("Third", "int")
            .public()
            .with_accessor(Accessor::with_body(
                AccessorKind::Get,
                Body::Block("{ return 42; }".to_string()),
            ))
            .with_part(part),
    );
    let to_getter = p.directive("Second_get");
    let read = p.copying_with(
        widget,
        Symbol::method("Read").returns("int"),
        vec![to_getter],
        Vec::new(),
    );
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let first_unit = output.units_for(first).next().unwrap();
    assert_eq!(
        first_unit.content.shape,
        ContentShape::Accessors(vec![(AccessorKind::Get, "{ return 42; }".to_string())])
    );
    assert!(first_unit.text.contains("get { return 42; }"), "{}", first_unit.text);
    let read_unit = output.units_for(read).next().unwrap();
    assert_eq!(body(read_unit), "{ return 42; }");
}

#[test]
fn event_chains_carry_generated_accessors() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    let field_like = |name: &str| {
        Symbol::event(name, "Action")
            .with_accessor(Accessor::auto(AccessorKind::Add))
            .with_accessor(Accessor::auto(AccessorKind::Remove))
    };
    let to_relay = p.directive("Relay");
    let outer = p.copying_with(widget, field_like("Changed"), vec![to_relay], Vec::new());
    let to_source = p.directive("Source");
    p.copying_with(widget, field_like("Relay"), vec![to_source], Vec::new());

    let part = p.part();
    p.add(
        widget,
        Symbol::event("Source", "Action")
            .public()
            .with_accessor(Accessor::with_body(
                AccessorKind::Add,
                Body::Block("{ handlers += value; }".to_string()),
            ))
            .with_accessor(Accessor::with_body(
                AccessorKind::Remove,
                Body::Block("{ handlers -= value; }".to_string()),
            ))
            .with_part(part),
    );
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let unit = output.units_for(outer).next().unwrap();
    assert_eq!(
        unit.content.shape,
        ContentShape::Accessors(vec![
            (AccessorKind::Add, "{ handlers += value; }".to_string()),
            (AccessorKind::Remove, "{ handlers -= value; }".to_string()),
        ])
    );
}

#[test]
fn same_target_twice_is_flagged_but_generated() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "Target", "{ x = 1; }");
    let method = p.copying(widget, "Method", &["Target", "Target()"]);
    let output = run(&p.finish());

    assert_eq!(codes(&output), vec![ErrorCode::EquivalentTarget]);
    let hints: Vec<&str> = output.units_for(method).map(|u| u.hint.as_str()).collect();
    assert_eq!(hints, vec!["Widget.Method.g.cs", "Widget.Method_1.g.cs"]);
}

#[test]
fn repeated_directive_reports_attributes_not_target() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "Target", "{ }");
    let directive = p.directive("Target");
    let mut repeat = directive.clone();
    repeat.location = p.loc();
    p.copying_with(widget, Symbol::method("Method"), vec![directive, repeat], Vec::new());
    let output = run(&p.finish());

    assert_eq!(codes(&output), vec![ErrorCode::EquivalentAttributes]);
    assert_eq!(output.units.len(), 2);
}

#[test]
fn partial_parts_are_distinct_targets() {
    let mut p = Program::new();
    let global = p.global();
    let core = p.part().named("Core");
    let extra = p.part().named("Extra");
    let source = p.add(
        global,
        Symbol::class("Source").public().partial().with_part(core).with_part(extra),
    );
    let core_field = p.part().with_text("public int Core;");
    p.add(source, Symbol::field("Core", "int").public().with_part(core_field));
    let extra_field = p.part().with_text("public int Extra;").in_part(1);
    p.add(source, Symbol::field("Extra", "int").public().with_part(extra_field));

    let first = p.directive("Source").with_partial_part("Core");
    let second = p.directive("Source").with_partial_part("Extra");
    let dest = p.copying_with(global, Symbol::class("Dest"), vec![first, second], Vec::new());
    let output = run(&p.finish());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let members: Vec<&ContentShape> = output.units_for(dest).map(|u| &u.content.shape).collect();
    assert_eq!(
        members,
        vec![
            &ContentShape::Members(vec!["public int Core;".to_string()]),
            &ContentShape::Members(vec!["public int Extra;".to_string()]),
        ]
    );
}

#[test]
fn diagnostics_carry_directive_locations() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    let directive = p.directive("Nowhere");
    let location: Location = directive.location;
    p.copying_with(widget, Symbol::method("Method"), vec![directive], Vec::new());
    let output = run(&p.finish());

    assert_eq!(output.diagnostics[0].primary_location(), Some(location));
    assert!(output.has_errors());
    assert_eq!(output.errors().count(), 1);
    assert_eq!(output.warnings().count(), 0);
}
