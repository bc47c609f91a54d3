use copa_ir::{ProgramSnapshot, Symbol};
use copac::{CancellationToken, Generator, GeneratorConfig, PassError, PassOutput};
use pretty_assertions::assert_eq;

use crate::common::{run, run_with, Program};

/// A program with enough independent and chained directives to spread
/// over several dependency levels.
fn busy_program() -> ProgramSnapshot {
    let mut p = Program::new();
    let ns = p.namespace("App");
    for w in 0..4 {
        let widget = p.class(ns, &format!("Widget{w}"));
        p.method_with_body(widget, "Target", &format!("{{ value = {w}; }}"));
        for m in 0..6 {
            let target = if m == 0 {
                "Target".to_string()
            } else {
                format!("Copy{}", m - 1)
            };
            p.copying(widget, &format!("Copy{m}"), &[target.as_str()]);
        }
        p.copying(widget, "Missing", &["Nowhere"]);
        let directive = p.directive("Target");
        let pattern = p.pattern("value", "total", 0);
        p.copying_with(widget, Symbol::method("Renamed"), vec![directive], vec![pattern]);
    }
    p.finish()
}

fn summary(output: &PassOutput) -> (Vec<(String, String)>, Vec<String>) {
    let units = output
        .units
        .iter()
        .map(|u| (u.hint.clone(), u.text.clone()))
        .collect();
    let diagnostics = output.diagnostics.iter().map(|d| format!("{d:?}")).collect();
    (units, diagnostics)
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let snapshot = busy_program();
    let sequential = run(&snapshot);
    let parallel = run_with(&snapshot, GeneratorConfig::default());

    assert_eq!(sequential.units.len(), 4 * 7);
    assert_eq!(sequential.errors().count(), 4);
    assert_eq!(summary(&sequential), summary(&parallel));
}

#[test]
fn repeated_runs_are_identical() {
    let snapshot = busy_program();
    let first = summary(&run_with(&snapshot, GeneratorConfig::default()));
    for _ in 0..5 {
        assert_eq!(summary(&run_with(&snapshot, GeneratorConfig::default())), first);
    }
}

#[test]
fn chained_copies_settle_on_the_root_body() {
    let snapshot = busy_program();
    let output = run(&snapshot);
    let last = output
        .units
        .iter()
        .find(|u| u.hint == "App.Widget2.Copy5.g.cs")
        .unwrap();
    assert!(last.text.contains("{ value = 2; }"), "{}", last.text);
}

#[test]
fn cancelled_pass_returns_no_output() {
    let snapshot = busy_program();
    let token = CancellationToken::new();
    token.cancel();
    let generator = Generator::with_config(GeneratorConfig::default()).with_cancellation(token);

    assert_eq!(generator.run(&snapshot).map(|o| o.units.len()), Err(PassError::Cancelled));
}

#[test]
fn error_limit_caps_reported_errors() {
    let snapshot = busy_program();
    let config = GeneratorConfig {
        error_limit: 2,
        ..GeneratorConfig::sequential()
    };
    let output = run_with(&snapshot, config);

    assert_eq!(output.errors().count(), 2);
    assert_eq!(output.units.len(), 4 * 7);
}
