use kt_yellow::SyntaxKind::{self, *};
use kt_yellow::SyntaxSet;

use crate::parser::Parser;

pub(crate) mod exprs;
pub(crate) mod items;
pub(crate) mod types;

/// Tokens that may start an expression.
pub(crate) const EXPR_FIRST: SyntaxSet = SyntaxSet::new([
    INT_NUMBER,
    FLOAT_NUMBER,
    CHARACTER_LITERAL,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,
    OPEN_QUOTE,
    IDENT,
    FIELD_IDENTIFIER,
    THIS_KW,
    LEFT_PAREN,
    LEFT_BRACE,
    IF_KW,
    WHEN_KW,
    RETURN_KW,
    MINUS,
    PLUS,
    EXCL,
    PLUS_PLUS,
    MINUS_MINUS,
]);

/// Where a modifier list is being parsed; decides which soft keywords count.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModifierContext {
    Declaration,
    Constructor,
    Parameter,
    TypeParameter,
    TypeProjection,
}

pub(crate) fn name(p: &mut Parser, recovery: &SyntaxSet) {
    match p.peek_kind() {
        IDENT => p.advance(),
        _ => p.error_recover("expected a name", recovery),
    }
}

pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: SyntaxKind,
    unexpected_delim_message: &'static str,
    first_set: &SyntaxSet,
    mut parser: impl FnMut(&mut Parser<'_>) -> bool,
) {
    debug_assert_eq!(p.peek_kind(), bra);
    p.advance();

    while !p.at(ket) && !p.at(EOF) {
        if p.at(delim) {
            let m = p.start();
            p.error(unexpected_delim_message);
            p.advance();
            m.complete(p, ERROR);
            continue;
        }

        if !parser(p) {
            break;
        }

        if !p.eat(delim) {
            if first_set.contains(p.peek_kind()) {
                p.expect(delim);
            } else {
                break;
            }
        }
    }

    p.expect(ket);
}

fn at_modifier(p: &Parser, context: ModifierContext) -> bool {
    match p.peek_kind() {
        AT => matches!(
            context,
            ModifierContext::Declaration | ModifierContext::Constructor | ModifierContext::Parameter
        ),
        IN_KW => {
            matches!(context, ModifierContext::TypeParameter | ModifierContext::TypeProjection)
        }
        IDENT if SyntaxKind::from_modifier(p.current_text()).is_some() => {
            match p.nth(1) {
                IDENT | AT | VAL_KW | VAR_KW | FUN_KW | CLASS_KW | OBJECT_KW => true,
                LEFT_PAREN => context == ModifierContext::Constructor,
                _ => false,
            }
        }
        _ => false,
    }
}

/// Parses keyword modifiers and annotations, if any.
pub(crate) fn modifier_list(p: &mut Parser, context: ModifierContext) -> bool {
    if !at_modifier(p, context) {
        return false;
    }

    let m = p.start();
    while at_modifier(p, context) {
        match p.peek_kind() {
            AT => annotation(p),
            IN_KW => p.advance(),
            _ => match SyntaxKind::from_modifier(p.current_text()) {
                Some(kind) => p.advance_as(kind),
                None => p.advance(),
            },
        }
    }
    m.complete(p, MODIFIER_LIST);
    true
}

fn annotation(p: &mut Parser) {
    debug_assert_eq!(p.peek_kind(), AT);

    let m = p.start();
    p.advance();

    if p.at(IDENT) && !p.has_trivia_before() {
        let type_ref = p.start();
        types::user_type(p);
        type_ref.complete(p, TYPE_REFERENCE);
    } else {
        p.error("expected an annotation name");
    }

    if p.at(LEFT_PAREN) && !p.has_trivia_before() {
        exprs::value_argument_list(p);
    }

    m.complete(p, ANNOTATION_ENTRY);
}
