use kt_db::{Diagnostic, File, check_file};
use kt_stubs::IndexKey;
use salsa::{DatabaseImpl, Setter as _};

#[derive(Debug, PartialEq, Eq)]
struct ExpectedDiag {
    line: usize,
    message: String,
}

#[derive(Debug, PartialEq, Eq)]
struct ActualDiag {
    line: usize,
    message: String,
}

fn parse_expectations(fixture: &str) -> Vec<ExpectedDiag> {
    let mut expected = Vec::new();

    for (idx, line) in fixture.lines().enumerate() {
        let Some((_, comment)) = line.split_once("//~") else {
            continue;
        };
        let comment = comment.trim();
        let comment = comment.strip_prefix("ERROR").unwrap_or(comment).trim();
        if comment.is_empty() {
            continue;
        }
        expected.push(ExpectedDiag { line: idx + 1, message: comment.to_owned() });
    }

    expected
}

fn collect_actual(db: &DatabaseImpl, file: File, diagnostics: &[Diagnostic]) -> Vec<ActualDiag> {
    let line_index = file.line_index(db);
    let mut actual = diagnostics
        .iter()
        .map(|diag| {
            let line = line_index.line_col(diag.range().start()).line as usize + 1;
            ActualDiag { line, message: diag.message().to_owned() }
        })
        .collect::<Vec<_>>();
    actual.sort_by_key(|diag| (diag.line, diag.message.clone()));
    actual
}

#[track_caller]
fn check(fixture: &str) {
    let db = DatabaseImpl::default();
    let file = File::new(&db, "check.kt".into(), fixture.to_owned());

    let diagnostics = check_file::accumulated::<Diagnostic>(&db, file)
        .iter()
        .map(|diag| Diagnostic::clone(diag))
        .collect::<Vec<_>>();
    let mut actual = collect_actual(&db, file, &diagnostics);
    let mut expected = parse_expectations(fixture);

    expected.sort_by_key(|diag| (diag.line, diag.message.clone()));

    assert_eq!(
        expected.len(),
        actual.len(),
        "expected {} diagnostic(s), got {}\nexpected: {expected:#?}\nactual: {actual:#?}",
        expected.len(),
        actual.len(),
    );

    for expected_diag in expected {
        let Some(pos) = actual.iter().position(|diag| {
            diag.line == expected_diag.line && diag.message.contains(&expected_diag.message)
        }) else {
            panic!(
                "missing diagnostic on line {} containing `{}`\nactual: {actual:#?}",
                expected_diag.line, expected_diag.message
            );
        };
        actual.remove(pos);
    }

    assert!(actual.is_empty(), "unexpected diagnostics:\n{actual:#?}");
}

#[test]
fn clean_file() {
    check(
        r#"
package demo

class A(val x: Int) {
    fun get(): Int = x
}
"#,
    );
}

#[test]
fn missing_property_type() {
    check(
        r#"
val x: = 1 //~ ERROR expected a type
"#,
    );
}

#[test]
fn missing_operand() {
    check(
        r#"
fun f() {
    val y = (1 + ) //~ ERROR expected an expression
}
"#,
    );
}

#[test]
fn missing_parameter_type() {
    check(
        r#"
class A(x: ) //~ ERROR expected a type
"#,
    );
}

#[test]
fn queries_follow_text_changes() {
    let mut db = DatabaseImpl::default();
    let file = File::new(&db, "a.kt".into(), "fun a() = 1\n".to_owned());

    let functions = |db: &DatabaseImpl| {
        let entries = file.index_entries(db);
        entries.values(IndexKey::TopLevelFunction).map(str::to_owned).collect::<Vec<_>>()
    };
    assert_eq!(functions(&db), ["a"]);
    assert_eq!(file.stub_tree(&db).len(), 2);

    file.set_text(&mut db).to("fun a() = 1\nfun b() = 2\n".to_owned());
    assert_eq!(functions(&db), ["a", "b"]);
    assert_eq!(file.stub_tree(&db).len(), 3);
}

#[test]
fn parse_is_cached() {
    let db = DatabaseImpl::default();
    let file = File::new(&db, "a.kt".into(), "val x = 1\n".to_owned());

    assert!(std::ptr::eq(file.parse(&db), file.parse(&db)));
}
