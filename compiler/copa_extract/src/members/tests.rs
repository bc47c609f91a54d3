use copa_ir::{
    Body, DeclarationPart, FileId, Location, OperatorKind, Param, SnapshotBuilder, Symbol,
};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn rename_only_touches_the_header() {
    assert_eq!(
        rename_in_header("public Source(int x) { var s = new Source(); }", "Source", "Dest"),
        "public Dest(int x) { var s = new Source(); }"
    );
    assert_eq!(
        rename_in_header("~Source() => Cleanup(Source.Count);", "Source", "Dest"),
        "~Dest() => Cleanup(Source.Count);"
    );
    assert_eq!(
        rename_in_header(
            "public static Source operator +(Source a, Source b) { return a; }",
            "Source",
            "Dest"
        ),
        "public static Dest operator +(Dest a, Dest b) { return a; }"
    );
    assert_eq!(
        rename_in_header("public SourceFactory(int x) { }", "Source", "Dest"),
        "public SourceFactory(int x) { }"
    );
}

fn part_named(source: &Symbol, name: Option<&str>) -> Result<Vec<usize>, ExtractError> {
    select_parts(source, || source.name.clone(), name)
}

#[test]
fn part_selection() {
    let file = FileId::from_raw(0);
    let source = Symbol::class("Source")
        .partial()
        .with_part(DeclarationPart::new(Location::at(file, 0)).named("Core"))
        .with_part(DeclarationPart::new(Location::at(file, 50)).named("Extra"))
        .with_part(DeclarationPart::new(Location::at(file, 90)));
    assert_eq!(part_named(&source, None), Ok(vec![0, 1, 2]));
    assert_eq!(part_named(&source, Some("Extra")), Ok(vec![1]));
    assert_eq!(
        part_named(&source, Some("Missing")),
        Err(ExtractError::UnknownPartialPart {
            part: "Missing".to_string(),
            target: "Source".to_string(),
            available: vec!["Core".to_string(), "Extra".to_string()],
        })
    );
}

#[test]
fn members_of_selected_parts_only() {
    let mut b = SnapshotBuilder::new();
    let file = b.file("Source.cs");
    let at = |offset| DeclarationPart::new(Location::at(file, offset));
    let source = b.add(
        b.global(),
        Symbol::class("Source")
            .partial()
            .with_part(at(0).named("Core"))
            .with_part(at(100).named("Extra")),
    );
    b.add(
        source,
        Symbol::field("count", "int").with_part(at(10).with_text("private int count;")),
    );
    b.add(
        source,
        Symbol::constructor("Source")
            .public()
            .with_param(Param::new("int", "count"))
            .with_part(
                at(20)
                    .with_text("public Source(int count) { this.count = count; }")
                    .with_body(Body::Block("{ this.count = count; }".to_string())),
            ),
    );
    b.add(
        source,
        Symbol::operator(OperatorKind::Plus, "Source").with_part(
            at(110)
                .in_part(1)
                .with_text("public static Source operator +(Source a, Source b) => a;"),
        ),
    );
    let destination = b.add(b.global(), Symbol::class("Dest").partial().with_part(at(200)));
    let snapshot = b.finish();
    let graph: &dyn SymbolGraphProvider = &snapshot;
    let source = graph.symbol(source);
    let destination = graph.symbol(destination);
    let none = FxHashMap::default();

    assert_eq!(
        type_members(graph, source, &[0], destination, true, &none),
        vec![
            "private int count;".to_string(),
            "public Dest(int count) { this.count = count; }".to_string(),
        ]
    );
    assert_eq!(
        type_members(graph, source, &[1], destination, true, &none),
        vec!["public static Dest operator +(Dest a, Dest b) => a;".to_string()]
    );
    assert_eq!(
        type_members(graph, source, &[0, 1], destination, false, &none)[1],
        "public Source(int count) { this.count = count; }"
    );
}

#[test]
fn generic_members_are_substituted() {
    let mut b = SnapshotBuilder::new();
    let file = b.file("Box.cs");
    let at = |offset| DeclarationPart::new(Location::at(file, offset));
    let source = b.add(b.global(), Symbol::class("Box").with_part(at(0)));
    b.add(
        source,
        Symbol::field("item", "T").with_part(at(10).with_text("private T item;")),
    );
    let destination = b.add(b.global(), Symbol::class("Holder").partial().with_part(at(50)));
    let snapshot = b.finish();
    let mut map = FxHashMap::default();
    map.insert("T".to_string(), "string".to_string());

    let members = type_members(
        &snapshot,
        snapshot.symbol(source),
        &[0],
        snapshot.symbol(destination),
        true,
        &map,
    );
    assert_eq!(members, vec!["private string item;".to_string()]);
}

#[test]
fn special_headers_are_recognized_by_shape() {
    assert!(is_special_header("public Middle(int x) { }", "Middle"));
    assert!(is_special_header("~Middle() { }", "Middle"));
    assert!(is_special_header("public static int operator +(Middle a, Middle b) => 0;", "Middle"));
    assert!(!is_special_header("public Middle Make() { return new Middle(); }", "Middle"));
    assert!(!is_special_header("public MiddleMan(int x) { }", "Middle"));
    assert!(!is_special_header("public int Count;", "Middle"));
}

#[test]
fn inherited_members_follow_the_new_destination() {
    let source = Symbol::class("Middle");
    let destination = Symbol::class("Outer");
    let generated = vec![
        "public Middle(int x) { Init(x); }".to_string(),
        "public Middle Clone() { return this; }".to_string(),
    ];
    let none = FxHashMap::default();

    assert_eq!(
        inherited_members(&generated, &source, &destination, true, &none),
        vec![
            "public Outer(int x) { Init(x); }".to_string(),
            "public Middle Clone() { return this; }".to_string(),
        ]
    );
    assert_eq!(
        inherited_members(&generated, &source, &destination, false, &none),
        generated
    );
}
