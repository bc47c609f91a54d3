use copa_ir::{Param, TypeParam};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn blocks_are_kept_verbatim() {
    let body = Body::Block("{ x = 1; }".to_string());
    assert_eq!(to_block(&body, true), "{ x = 1; }");
    assert_eq!(to_block(&body, false), "{ x = 1; }");
}

#[test]
fn expression_bodies_follow_the_destination_shape() {
    let body = Body::Expression(" a + b ".to_string());
    assert_eq!(to_block(&body, true), "{ return a + b; }");
    assert_eq!(to_block(&body, false), "{ a + b; }");
}

#[test]
fn implicit_accessors() {
    let property = Symbol::property("Count", "int");
    assert_eq!(implicit_accessor_body(&property, AccessorKind::Get), "{ return Count; }");
    assert_eq!(implicit_accessor_body(&property, AccessorKind::Set), "{ Count = value; }");

    let event = Symbol::event("Changed", "EventHandler");
    assert_eq!(implicit_accessor_body(&event, AccessorKind::Add), "{ Changed += value; }");
    assert_eq!(implicit_accessor_body(&event, AccessorKind::Remove), "{ Changed -= value; }");

    let indexer = Symbol::indexer("int")
        .with_param(Param::new("int", "row"))
        .with_param(Param::new("int", "col"));
    assert_eq!(implicit_accessor_body(&indexer, AccessorKind::Get), "{ return this[row, col]; }");
}

#[test]
fn value_shapes() {
    assert!(returns_value(&Symbol::method("M").returns("int")));
    assert!(!returns_value(&Symbol::method("M")));
    assert!(!returns_value(&Symbol::constructor("Widget")));
}

#[test]
fn parameters_are_renamed_by_position() {
    let source = Symbol::method("Target")
        .with_param(Param::new("int", "a"))
        .with_param(Param::new("int", "b"));
    let destination = Symbol::method("Method")
        .with_param(Param::new("int", "x"))
        .with_param(Param::new("int", "b"));
    let map = signature_substitutions(&source, None, &destination, &[]);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("a").map(String::as_str), Some("x"));
}

#[test]
fn mismatched_arity_renames_nothing() {
    let source = Symbol::method("Target").with_param(Param::new("int", "a"));
    let destination = Symbol::method("Method");
    assert!(signature_substitutions(&source, None, &destination, &[]).is_empty());
}

#[test]
fn setter_value_maps_to_the_single_parameter() {
    let source = Symbol::property("Count", "int");
    let destination = Symbol::method("SetCount").with_param(Param::new("int", "count"));
    let map = signature_substitutions(&source, Some(AccessorKind::Set), &destination, &[]);
    assert_eq!(map.get("value").map(String::as_str), Some("count"));
    let getter = signature_substitutions(&source, Some(AccessorKind::Get), &destination, &[]);
    assert!(getter.is_empty());
}

#[test]
fn supplied_type_arguments_win_over_positional_names() {
    let source = Symbol::method("Generic")
        .with_type_param(TypeParam::new("T"))
        .with_param(Param::new("T", "item"));
    let destination = Symbol::method("Method")
        .with_type_param(TypeParam::new("U"))
        .with_param(Param::new("int", "item"));
    let bound = [("T".to_string(), "int".to_string())];
    let map = signature_substitutions(&source, None, &destination, &bound);
    assert_eq!(map.get("T").map(String::as_str), Some("int"));

    let unbound = signature_substitutions(&source, None, &destination, &[]);
    assert_eq!(unbound.get("T").map(String::as_str), Some("U"));
}
