use expect_test::expect;
use kt_parse::{FileKind, parse};
use kt_stubs::{
    IndexEntries, IndexKey, NULLABLE_TYPE_DESCRIPTOR, NamedDescriptor, PsiElement, Stream,
    StubBytes, StubDescriptor, StubError, StubOutput, StubPayload, StubRegistry, StubTree,
    TYPE_REFERENCE_DESCRIPTOR, UserTypeDescriptor, build_stub_tree, deserialize_tree,
    index_entries, serialize_tree,
};
use kt_yellow::SyntaxKind::*;
use kt_yellow::ast::{AstNode as _, KtFile};

const SOURCE: &str = "\
package demo

import a.b.C

class Box(val item: Item?) : Base() {
    fun get(): Item? = item
    val size: Int = 1
    class object {
        fun create(): Box = Box(null)
    }
}

fun top(x: List<Int>): Unit {
    fun local(): Int = 1
}

val answer = 42
";

fn file(text: &str) -> KtFile {
    let root = parse(text, FileKind::Source).ok().unwrap();
    KtFile::cast(root).unwrap()
}

fn stub_tree(text: &str) -> StubTree {
    build_stub_tree(StubRegistry::standard(), &file(text))
}

#[test]
fn declaration_skeleton() {
    let tree = stub_tree(SOURCE);
    expect![[r#"
        FILE
          CLASS "Box" top-level
            TYPE_REFERENCE
              NULLABLE_TYPE
                USER_TYPE
            TYPE_REFERENCE
              USER_TYPE
            FUN "get"
              TYPE_REFERENCE
                NULLABLE_TYPE
                  USER_TYPE
            PROPERTY "size"
              TYPE_REFERENCE
                USER_TYPE
            FUN "create"
              TYPE_REFERENCE
                USER_TYPE
          FUN "top" top-level
            TYPE_REFERENCE
              USER_TYPE
                TYPE_REFERENCE
                  USER_TYPE
            TYPE_REFERENCE
              USER_TYPE
          PROPERTY "answer" top-level
    "#]]
    .assert_eq(&format!("{tree:?}"));
}

#[test]
fn bodies_are_not_visited() {
    let tree = stub_tree("fun f() {\n    val inner: Int = 1\n    class Local\n}\nval g = if (a) { fun h() = 1\n h() } else 0\n");
    let names = tree.iter().filter_map(|stub| stub.payload().name()).collect::<Vec<_>>();
    assert_eq!(names, ["f", "g"]);
}

#[test]
fn bytes_round_trip() {
    let registry = StubRegistry::standard();
    let tree = stub_tree(SOURCE);

    let bytes = serialize_tree(registry, &tree).unwrap();
    let restored = deserialize_tree(registry, &bytes).unwrap();
    assert_eq!(restored, tree);
    assert_eq!(format!("{restored:?}"), format!("{tree:?}"));
}

#[test]
fn placeholders_write_nothing_and_index_nothing() {
    let tree = stub_tree("val x: A.B<C>? = null\n");
    let user_type = UserTypeDescriptor::new();
    let mut entries = IndexEntries::default();

    for stub in tree.iter().filter(|stub| stub.kind() != PROPERTY && stub.kind() != FILE) {
        let descriptor: &dyn StubDescriptor = match stub.kind() {
            TYPE_REFERENCE => &TYPE_REFERENCE_DESCRIPTOR,
            NULLABLE_TYPE => &NULLABLE_TYPE_DESCRIPTOR,
            USER_TYPE => &user_type,
            kind => panic!("unexpected stub {kind:?}"),
        };

        let mut output = StubOutput::new();
        descriptor.serialize(stub, &mut output);
        descriptor.index_stub(stub, &mut entries);
        assert!(output.is_empty());
        assert_eq!(stub.payload(), &StubPayload::Empty);
    }

    assert!(entries.is_empty());
}

#[test]
fn short_name_index() {
    let entries = index_entries(StubRegistry::standard(), &stub_tree(SOURCE));

    assert_eq!(entries.values(IndexKey::ClassShortName).collect::<Vec<_>>(), ["Box"]);
    assert_eq!(
        entries.values(IndexKey::FunctionShortName).collect::<Vec<_>>(),
        ["get", "create", "top"]
    );
    assert_eq!(entries.values(IndexKey::TopLevelFunction).collect::<Vec<_>>(), ["top"]);
    assert_eq!(entries.values(IndexKey::PropertyShortName).collect::<Vec<_>>(), ["size", "answer"]);
    assert_eq!(entries.values(IndexKey::TopLevelProperty).collect::<Vec<_>>(), ["answer"]);
}

#[test]
fn stub_and_tree_elements_agree() {
    let registry = StubRegistry::standard();
    let file = file(SOURCE);
    let tree = build_stub_tree(registry, &file);

    fn shape(element: &PsiElement<'_>, registry: &StubRegistry) -> Vec<(String, Option<String>)> {
        let mut out = vec![(format!("{:?}", element.kind()), element.name())];
        for child in element.children(registry) {
            out.extend(shape(&child, registry));
        }
        out
    }

    let root = tree.root().unwrap();
    let from_stub = registry.get(FILE).unwrap().create_from_stub(root);
    let from_tree = registry.get(FILE).unwrap().create_from_tree(file.syntax().clone());

    assert!(from_stub.is_stub_based());
    assert!(!from_tree.is_stub_based());
    assert_eq!(shape(&from_stub, registry), shape(&from_tree, registry));
}

#[test]
fn create_then_create_from_stub_keeps_kind() {
    let file = file("class A\n");
    let class = file.declarations().next().unwrap();

    let mut tree = StubTree::new();
    let root = tree.alloc(FILE, None, StubPayload::Empty);
    let id = NamedDescriptor::CLASS.create_stub(class.syntax(), &mut tree, Some(root));

    let element = NamedDescriptor::CLASS.create_from_stub(tree.get(id).unwrap());
    assert_eq!(element.kind(), CLASS);
    assert_eq!(element.name().as_deref(), Some("A"));
}

#[test]
#[should_panic(expected = "wrong kind")]
fn create_from_tree_checks_kind() {
    let file = file("fun f() = 1\n");
    let _ = NamedDescriptor::CLASS.create_from_tree(file.syntax().clone());
}

#[test]
#[should_panic(expected = "CLASS stub has no name payload")]
fn named_stub_without_payload() {
    let mut tree = StubTree::new();
    let root = tree.alloc(FILE, None, StubPayload::Empty);
    tree.alloc(CLASS, Some(root), StubPayload::Empty);
    let _ = serialize_tree(StubRegistry::standard(), &tree);
}

#[test]
fn invalid_name_record() {
    let registry = StubRegistry::standard();
    let bytes = serialize_tree(registry, &stub_tree("val x = 1\n")).unwrap();

    let mut broken = bytes.clone();
    let name_start = broken.payload.len() - 3;
    broken.payload[name_start + 1] = 0xff;
    assert_eq!(
        deserialize_tree(registry, &broken),
        Err(StubError::InvalidRecord {
            kind: PROPERTY,
            position: name_start,
            reason: "name is not UTF-8",
        })
    );

    let mut truncated = bytes;
    truncated.payload.pop();
    assert_eq!(
        deserialize_tree(registry, &truncated),
        Err(StubError::UnexpectedEnd { stream: Stream::Payload, position: 2 })
    );
}

#[test]
fn trailing_payload() {
    let registry = StubRegistry::standard();
    let StubBytes { shape, mut payload } =
        serialize_tree(registry, &stub_tree("class A\n")).unwrap();
    payload.push(0);

    assert_eq!(
        deserialize_tree(registry, &StubBytes { shape, payload }),
        Err(StubError::TrailingBytes { stream: Stream::Payload, remaining: 1 })
    );
}
