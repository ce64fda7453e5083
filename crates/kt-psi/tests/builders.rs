use std::cell::Cell;

use kt_parse::Parse;
use kt_psi::builders::{IfChainBuilder, WhenBuilder};
use kt_psi::{FileKind, KtParser, PsiFactory, SourceParser};
use kt_yellow::ast::AstNode as _;

#[derive(Default)]
struct CountingParser {
    calls: Cell<usize>,
}

impl SourceParser for CountingParser {
    fn parse(&self, text: &str, kind: FileKind) -> Parse {
        self.calls.set(self.calls.get() + 1);
        KtParser.parse(text, kind)
    }
}

#[test]
fn if_chain_parses_once() {
    let factory = PsiFactory::with_parser(CountingParser::default());
    let frozen = IfChainBuilder::new()
        .if_branch("a > 0", "1")
        .if_branch("a < 0", "-1")
        .else_branch("0")
        .freeze();

    let first = frozen.to_expression(&factory).unwrap();
    let second = frozen.to_expression(&factory).unwrap();

    assert_eq!(factory.parser().calls.get(), 1);
    assert_eq!(first, second);
    assert_eq!(first.text(), frozen.text());
    assert_eq!(first.condition().unwrap().text(), "a > 0");

    let nested = first.else_branch().unwrap();
    assert_eq!(nested.text(), "if (a < 0) -1\nelse 0");
}

#[test]
fn open_if_chain_has_no_else() {
    let factory = PsiFactory::new();
    let frozen = IfChainBuilder::new().if_branch("ready", "go()").freeze();
    let expression = frozen.to_expression(&factory).unwrap();
    assert!(expression.else_branch().is_none());
    assert_eq!(expression.then_branch().unwrap().text(), "go()");
}

#[test]
fn when_parses_once() {
    let factory = PsiFactory::with_parser(CountingParser::default());
    let frozen = WhenBuilder::with_subject("x")
        .condition("1")
        .condition("2")
        .branch_expression("\"small\"")
        .pattern("String", false)
        .branch_expression("\"text\"")
        .range("0..10", true)
        .branch_expression("\"outside\"")
        .else_entry("\"other\"")
        .freeze();

    let first = frozen.to_expression(&factory).unwrap();
    let _ = frozen.to_expression(&factory).unwrap();
    assert_eq!(factory.parser().calls.get(), 1);

    assert_eq!(first.subject().unwrap().text(), "x");
    let entries = first.entries().collect::<Vec<_>>();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].conditions().count(), 2);
    assert!(entries[3].is_else());
}

#[test]
fn when_without_subject() {
    let frozen = WhenBuilder::new().entry("a -> b").else_entry("c").freeze();
    let expression = frozen.to_expression(&PsiFactory::new()).unwrap();
    assert!(expression.subject().is_none());
    assert_eq!(expression.entries().count(), 2);
}

#[test]
fn builder_accepts_nodes() {
    let factory = PsiFactory::new();
    let condition = factory.binary_expression("x", "==", "null").unwrap();
    let fallback = factory.expression("error()").unwrap();

    let frozen = IfChainBuilder::new().if_branch(&condition, "0").else_branch(&fallback).freeze();
    assert_eq!(frozen.text(), "if (x == null) 0\nelse error()");
    assert!(frozen.to_expression(&factory).is_ok());
}

#[test]
fn malformed_branch_is_an_error() {
    let frozen = IfChainBuilder::new().if_branch("a +", "b").freeze();
    assert!(frozen.to_expression(&PsiFactory::new()).is_err());
}
