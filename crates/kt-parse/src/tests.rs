use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use expect_test::expect_file;
use proptest::{prop_assert_eq, proptest};
use kt_yellow::SyntaxKind::{self, *};
use kt_yellow::ast::{self, AstNode as _};

use crate::{FileKind, parse};

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    expected: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "kt" {
                    let expected = path.with_extension("tree");
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, expected, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

#[test]
fn parse_test_data() {
    for case in TestCase::list() {
        let parse = parse(&case.text, FileKind::Source);
        let mut actual = format!("{:#?}", parse.syntax_node());
        for diagnostic in parse.errors() {
            writeln!(actual, "{diagnostic}").unwrap();
        }

        expect_file![&case.expected].assert_eq(&actual);
    }
}

proptest! {
    #[test]
    fn any_text_renders_the_same(text in r".*") {
        for kind in [FileKind::Source, FileKind::Expression, FileKind::Type] {
            prop_assert_eq!(parse(&text, kind).syntax_node().text(), text.as_str());
        }
    }
}

fn check_lossless(text: &str, kind: FileKind) -> kt_yellow::SyntaxNode {
    let parse = parse(text, kind);
    assert!(parse.errors().is_empty(), "errors in {text:?}: {:?}", parse.errors());
    let root = parse.syntax_node();
    assert_eq!(root.text(), text);
    root
}

fn expression(text: &str) -> ast::Expr {
    let root = check_lossless(text, FileKind::Expression);
    ast::ExpressionCodeFragment::cast(root).unwrap().expression().unwrap()
}

#[test]
fn source_round_trips() {
    let sources = [
        "package a.b\n\nimport x.y.Z\nimport x.y.* // all\nimport p.Q as R\n",
        "class A<T : Any>(val x: Int, var y: String = \"s\") : B(x), C {\n  fun f() {}\n  class object { }\n}\n",
        "private open class C protected () {}",
        "@Deprecated(\"no\") public val x: List<out T?> = listOf(1, 2)",
        "fun <T> id(x: T): T = x\nfun g(vararg xs: Int) { return }",
        "val f: (Int, name: String) -> Unit = { }",
        "val y: ((A) -> B)? = null;",
        "var a = b ?: c?.d!!.e[1, 2]++",
        "val s = \"a${b + 1}c$d\\n\"",
    ];

    for text in sources {
        check_lossless(text, FileKind::Source);
    }
}

#[test]
fn trivia_stays_outside_nodes() {
    let root = check_lossless("  /* lead */ val x = 1 // tail\n", FileKind::Source);
    let property = root.child_of_kind(PROPERTY).unwrap();
    assert_eq!(property.text(), "val x = 1");

    for node in root.descendants().filter(|node| node.kind() != FILE) {
        if let Some(first) = node.first_token() {
            assert!(!first.is_trivia(), "{node:?} starts with trivia");
        }
    }
}

#[test]
fn multiplicative_binds_tighter() {
    let ast::Expr::Binary(sum) = expression("a + b * c") else { panic!("not binary") };
    assert_eq!(sum.op().unwrap().kind(), PLUS);
    assert_eq!(sum.rhs().unwrap().text(), "b * c");
}

#[test]
fn assignment_is_right_associative() {
    let ast::Expr::Binary(assign) = expression("a = b = c") else { panic!("not binary") };
    assert_eq!(assign.lhs().unwrap().text(), "a");
    assert_eq!(assign.rhs().unwrap().text(), "b = c");
}

#[test]
fn newline_ends_statement() {
    let root = check_lossless("fun f() {\n  a\n  -b\n  c &&\n  d\n}", FileKind::Source);
    let block = root.descendants().find_map(ast::Block::cast).unwrap();
    let statements = block.statements().map(|node| node.text()).collect::<Vec<_>>();
    assert_eq!(statements, ["a", "-b", "c &&\n  d"]);
}

#[test]
fn if_chain_nests_in_else() {
    let ast::Expr::If(outer) = expression("if (c1) e1\nelse if (c2) e2\nelse e3") else {
        panic!("not if")
    };
    assert_eq!(outer.condition().unwrap().text(), "c1");
    let Some(ast::Expr::If(inner)) = outer.else_branch() else { panic!("no nested if") };
    assert_eq!(inner.then_branch().unwrap().text(), "e2");
    assert_eq!(inner.else_branch().unwrap().text(), "e3");
}

#[test]
fn when_entries() {
    let ast::Expr::When(when) = expression("when (x) { 1, in 2..3 -> a\n!is T -> b\nelse -> c\n}")
    else {
        panic!("not when")
    };
    assert_eq!(when.subject().unwrap().text(), "x");

    let entries = when.entries().collect::<Vec<_>>();
    assert_eq!(entries.len(), 3);
    let kinds = entries[0].conditions().map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [WHEN_CONDITION_EXPR, WHEN_CONDITION_IN]);
    assert_eq!(entries[1].conditions().next().unwrap().kind(), WHEN_CONDITION_IS);
    assert!(entries[2].is_else());
    assert_eq!(entries[2].expression().unwrap().text(), "c");
}

#[test]
fn if_inside_when_leaves_else_entry() {
    let ast::Expr::When(when) = expression("when { a -> if (b) c\nelse -> d }") else {
        panic!("not when")
    };
    assert_eq!(when.entries().count(), 2);
}

#[test]
fn this_with_label() {
    let ast::Expr::This(this) = expression("this@Outer") else { panic!("not this") };
    assert_eq!(this.target_label().unwrap().name().as_deref(), Some("Outer"));
}

#[test]
fn call_with_type_and_named_arguments() {
    let ast::Expr::Call(call) = expression("foo<Int, *>(a, b = 2, *c)") else {
        panic!("not a call")
    };
    assert_eq!(call.type_argument_list().unwrap().arguments().count(), 2);
    let names = call
        .value_argument_list()
        .unwrap()
        .arguments()
        .map(|argument| argument.argument_name())
        .collect::<Vec<_>>();
    assert_eq!(names, [None, Some("b".to_owned()), None]);
}

#[test]
fn comparison_is_not_type_arguments() {
    let ast::Expr::Binary(cmp) = expression("a < b") else { panic!("not binary") };
    assert_eq!(cmp.op().unwrap().kind(), LT);
}

#[test]
fn string_template_entries() {
    let ast::Expr::StringTemplate(template) = expression("\"x${y}$z\\t\"") else {
        panic!("not a template")
    };
    let kinds = template.entries().map(|entry| entry.kind()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            LITERAL_STRING_TEMPLATE_ENTRY,
            LONG_STRING_TEMPLATE_ENTRY,
            SHORT_STRING_TEMPLATE_ENTRY,
            ESCAPE_STRING_TEMPLATE_ENTRY,
        ]
    );
}

#[test]
fn nullable_function_type() {
    let root = check_lossless("((A) -> B)?", FileKind::Type);
    let fragment = ast::TypeCodeFragment::cast(root).unwrap();
    let element = fragment.type_reference().unwrap().type_element().unwrap();
    let ast::TypeElement::Nullable(nullable) = element else { panic!("not nullable") };
    assert!(matches!(nullable.inner_type(), Some(ast::TypeElement::Function(_))));
}

#[test]
fn soft_keywords_become_modifiers() {
    let root = check_lossless("override fun open() = 1", FileKind::Source);
    let file = ast::KtFile::cast(root).unwrap();
    let declaration = file.declarations().next().unwrap();
    let modifiers = declaration.modifier_list().unwrap();
    assert!(modifiers.has_modifier(OVERRIDE_KW));
    assert_eq!(declaration.name().as_deref(), Some("open"));
}

#[test]
fn expression_fragment_rejects_trailing_tokens() {
    let parse = parse("a )", FileKind::Expression);
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(parse.syntax_node().text(), "a )");
}

#[test]
fn recovers_from_garbage() {
    let text = "val = ; fun (x: ) { ) }\nclass";
    let parse = parse(text, FileKind::Source);
    assert!(!parse.errors().is_empty());
    assert_eq!(parse.syntax_node().text(), text);
}

#[test]
fn trailing_nul_is_kept_and_reported() {
    for text in ["val x = a\0", "\0"] {
        let parse = parse(text, FileKind::Source);
        assert_eq!(parse.errors().len(), 1, "{text:?}");
        assert_eq!(parse.syntax_node().text(), text);
    }
}

fn kinds(text: &str) -> Vec<SyntaxKind> {
    check_lossless(text, FileKind::Source).descendants().map(|node| node.kind()).collect()
}

#[test]
fn import_directive_shape() {
    assert_eq!(
        kinds("import a.b as c"),
        [FILE, IMPORT_LIST, IMPORT_DIRECTIVE, IMPORT_ALIAS]
    );
}
