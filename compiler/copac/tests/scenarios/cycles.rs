use copa_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;

use crate::common::{codes, only_unit, run, Program};

#[test]
fn mutual_copies_are_reported_once() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.copying(widget, "A", &["B"]);
    p.copying(widget, "B", &["A"]);
    let output = run(&p.finish());

    assert!(output.units.is_empty(), "{:#?}", output.units);
    assert_eq!(codes(&output), vec![ErrorCode::CircularDependency]);
}

#[test]
fn self_copy_is_a_cycle() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.copying(widget, "Loop", &["Loop"]);
    let output = run(&p.finish());

    assert!(output.units.is_empty());
    assert_eq!(output.errors().count(), 1);
}

#[test]
fn unrelated_directives_still_generate() {
    let mut p = Program::new();
    let widget = p.class(p.global(), "Widget");
    p.method_with_body(widget, "Target", "{ x = 1; }");
    p.copying(widget, "A", &["B"]);
    p.copying(widget, "B", &["C"]);
    p.copying(widget, "C", &["A"]);
    let fine = p.copying(widget, "Fine", &["Target"]);
    let output = run(&p.finish());

    assert_eq!(codes(&output), vec![ErrorCode::CircularDependency]);
    assert_eq!(only_unit(&output).destination, fine);

    let cycle = &output.diagnostics[0];
    assert!(cycle.message.contains("Widget.A()"), "{}", cycle.message);
}
