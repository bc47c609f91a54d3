use copa_ir::{
    DeclarationPart, Location, Param, ProgramSnapshot, SnapshotBuilder, Symbol, SymbolId,
};

use pretty_assertions::assert_eq;

use super::*;

struct Types {
    snapshot: ProgramSnapshot,
    plain: SymbolId,
    guarded: SymbolId,
    shape: SymbolId,
    abstract_base: SymbolId,
    point: SymbolId,
}

fn types() -> Types {
    let mut b = SnapshotBuilder::new();
    let file = b.file("Types.cs");
    let part = || DeclarationPart::new(Location::at(file, 0));
    let global = b.global();
    let plain = b.add(global, Symbol::class("Plain").public().with_part(part()));
    let guarded = b.add(global, Symbol::class("Guarded").public().with_part(part()));
    b.add(
        guarded,
        Symbol::constructor("Guarded")
            .public()
            .with_param(Param::new("int", "seed"))
            .with_part(part()),
    );
    let shape = b.add(
        global,
        Symbol::type_decl(TypeKind::Interface, "IShape").public().with_part(part()),
    );
    let abstract_base = b.add(
        global,
        Symbol::class("Base")
            .public()
            .with_modifiers(Modifiers::ABSTRACT)
            .with_part(part()),
    );
    let point = b.add(
        global,
        Symbol::type_decl(TypeKind::Struct, "Point").public().with_part(part()),
    );
    Types {
        snapshot: b.finish(),
        plain,
        guarded,
        shape,
        abstract_base,
        point,
    }
}

fn check(t: &Types, constraint: &str, text: &str, symbol: Option<SymbolId>) -> Option<String> {
    let param = TypeParam::new("T").with_constraint(constraint);
    violated_constraint(&t.snapshot, &param, TypeArgument { text, symbol }).map(str::to_string)
}

#[test]
fn class_constraint_rejects_value_types() {
    let t = types();
    assert_eq!(check(&t, "class", "int", None), Some("class".to_string()));
    assert_eq!(check(&t, "class", "Point", Some(t.point)), Some("class".to_string()));
    assert_eq!(check(&t, "class", "string", None), None);
    assert_eq!(check(&t, "class", "Plain", Some(t.plain)), None);
}

#[test]
fn struct_constraint_rejects_nullable_and_reference_types() {
    let t = types();
    assert_eq!(check(&t, "struct", "int", None), None);
    assert_eq!(check(&t, "struct", "int?", None), Some("struct".to_string()));
    assert_eq!(check(&t, "struct", "Plain", Some(t.plain)), Some("struct".to_string()));
    assert_eq!(check(&t, "unmanaged", "Point", Some(t.point)), None);
}

#[test]
fn notnull_rejects_nullable_annotations() {
    let t = types();
    assert_eq!(check(&t, "notnull", "string?", None), Some("notnull".to_string()));
    assert_eq!(check(&t, "notnull", "string", None), None);
}

#[test]
fn new_constraint_requires_public_parameterless_constructor() {
    let t = types();
    assert_eq!(check(&t, "new()", "Plain", Some(t.plain)), None);
    assert_eq!(check(&t, "new()", "Point", Some(t.point)), None);
    assert_eq!(check(&t, "new()", "int", None), None);
    assert_eq!(check(&t, "new()", "string", None), Some("new()".to_string()));
    assert_eq!(check(&t, "new()", "Guarded", Some(t.guarded)), Some("new()".to_string()));
    assert_eq!(check(&t, "new()", "IShape", Some(t.shape)), Some("new()".to_string()));
    assert_eq!(check(&t, "new()", "Base", Some(t.abstract_base)), Some("new()".to_string()));
}

#[test]
fn unknown_types_and_other_constraints_are_accepted() {
    let t = types();
    assert_eq!(check(&t, "class", "Mystery", None), None);
    assert_eq!(check(&t, "new()", "Mystery", None), None);
    assert_eq!(check(&t, "IComparable<T>", "int", None), None);
}

#[test]
fn first_violated_constraint_is_reported() {
    let t = types();
    let param = TypeParam::new("T").with_constraint("class").with_constraint("new()");
    let argument = TypeArgument {
        text: "Guarded",
        symbol: Some(t.guarded),
    };
    assert_eq!(violated_constraint(&t.snapshot, &param, argument), Some("new()"));
}
