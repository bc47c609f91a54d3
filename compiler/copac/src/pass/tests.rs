use copa_ir::SnapshotBuilder;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn map_items_preserves_input_order() {
    let items: Vec<u32> = (0..64).collect();
    let parallel = Generator::new().map_items(&items, |n| n * 2);
    let sequential =
        Generator::with_config(GeneratorConfig::sequential()).map_items(&items, |n| n * 2);
    let expected: Vec<u32> = (0..64).map(|n| n * 2).collect();
    assert_eq!(parallel, expected);
    assert_eq!(sequential, expected);
}

#[test]
fn phases_are_ordered() {
    assert!(Phase::Collected < Phase::GraphBuilt);
    assert!(Phase::GraphBuilt < Phase::Ordered);
    assert!(Phase::Ordered < Phase::PerDirective);
    assert!(Phase::PerDirective < Phase::Done);
}

#[test]
fn empty_snapshot_produces_nothing() {
    let snapshot = SnapshotBuilder::new().finish();
    match Generator::new().run(&snapshot) {
        Ok(output) => {
            assert!(output.units.is_empty());
            assert!(output.diagnostics.is_empty());
        }
        Err(error) => panic!("unexpected error: {error}"),
    }
}

#[test]
fn cancelled_token_stops_the_pass() {
    let snapshot = SnapshotBuilder::new().finish();
    let token = CancellationToken::new();
    let generator = Generator::new().with_cancellation(token.clone());
    token.cancel();
    assert!(generator.cancellation_token().is_cancelled());
    assert_eq!(generator.run(&snapshot).err(), Some(PassError::Cancelled));
}
