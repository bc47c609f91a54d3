use super::*;
use copa_ir::{Param, TypeParam};
use copa_reference::ParamSpec;

fn list(types: &[(&str, RefKind)]) -> ParamList {
    ParamList {
        params: types
            .iter()
            .map(|(ty, ref_kind)| ParamSpec {
                ref_kind: *ref_kind,
                ty: (*ty).to_string(),
            })
            .collect(),
        arglist: false,
    }
}

#[test]
fn matches_after_keyword_normalization() {
    let method = Symbol::method("M")
        .with_param(Param::new("System.Int32", "a"))
        .with_param(Param::new("string", "b"));
    let supplied = list(&[("int", RefKind::None), ("String", RefKind::None)]);
    assert!(parameters_match(&method, &supplied, &FxHashMap::default()));
}

#[test]
fn count_and_mode_must_agree() {
    let method = Symbol::method("M").with_param(Param::new("int", "a").with_ref_kind(RefKind::Ref));
    let empty = FxHashMap::default();
    assert!(!parameters_match(&method, &list(&[("int", RefKind::None)]), &empty));
    assert!(parameters_match(&method, &list(&[("int", RefKind::Ref)]), &empty));
    assert!(!parameters_match(&method, &list(&[]), &empty));
}

#[test]
fn params_array_matches_plain_array() {
    let method =
        Symbol::method("M").with_param(Param::new("object[]", "args").with_ref_kind(RefKind::Params));
    let empty = FxHashMap::default();
    assert!(parameters_match(&method, &list(&[("object[]", RefKind::None)]), &empty));
    assert!(parameters_match(&method, &list(&[("object[]", RefKind::Params)]), &empty));
}

#[test]
fn generic_parameters_are_substituted() {
    let method = Symbol::method("Put")
        .with_type_param(TypeParam::new("T"))
        .with_param(Param::new("List<T>", "items"));
    let mut substitutions = FxHashMap::default();
    substitutions.insert("T".to_string(), "int".to_string());
    assert!(parameters_match(
        &method,
        &list(&[("List<int>", RefKind::None)]),
        &substitutions
    ));
    assert!(!parameters_match(
        &method,
        &list(&[("List<T>", RefKind::None)]),
        &substitutions
    ));
    assert!(parameters_match(
        &method,
        &list(&[("List<T>", RefKind::None)]),
        &FxHashMap::default()
    ));
}

#[test]
fn arglist_must_agree() {
    let method = Symbol::method("Print")
        .with_param(Param::new("string", "format"))
        .with_varargs();
    let mut supplied = list(&[("string", RefKind::None)]);
    assert!(!parameters_match(&method, &supplied, &FxHashMap::default()));
    supplied.arglist = true;
    assert!(parameters_match(&method, &supplied, &FxHashMap::default()));
}

#[test]
fn parameter_lists_select_parameterized_kinds() {
    assert!(takes_parameter_list(SymbolKind::Method));
    assert!(takes_parameter_list(SymbolKind::Indexer));
    assert!(takes_parameter_list(SymbolKind::Constructor));
    assert!(!takes_parameter_list(SymbolKind::Property));
    assert!(!takes_parameter_list(SymbolKind::Field));
}
