use kt_yellow::SyntaxKind::*;
use kt_yellow::SyntaxSet;

use super::{ModifierContext, delimited, modifier_list};
use crate::parser::{CompletedMarker, Parser};

pub(crate) fn type_reference(p: &mut Parser) {
    let m = p.start();
    type_element(p);
    m.complete(p, TYPE_REFERENCE);
}

fn type_element(p: &mut Parser) {
    let mut element = match p.peek_kind() {
        IDENT => user_type(p),
        LEFT_PAREN if at_function_type(p) => function_type(p),
        LEFT_PAREN => {
            parenthesized_type(p);
            return;
        }
        _ => {
            p.error("expected a type");
            return;
        }
    };

    while p.at(QUEST) && !p.has_trivia_before() {
        let m = element.precede(p);
        p.advance();
        element = m.complete(p, NULLABLE_TYPE);
    }
}

fn at_function_type(p: &Parser) -> bool {
    p.matching_close(LEFT_PAREN, RIGHT_PAREN).is_some_and(|close| p.nth(close + 1) == ARROW)
}

/// `(T)` keeps its parentheses in the enclosing node; `(T)?` becomes the
/// nullable node that owns them.
fn parenthesized_type(p: &mut Parser) {
    let m = p.start();
    p.advance();
    type_element(p);
    p.expect(RIGHT_PAREN);

    if p.at(QUEST) && !p.has_trivia_before() {
        p.advance();
        m.complete(p, NULLABLE_TYPE);
    } else {
        m.abandon(p);
    }
}

fn function_type(p: &mut Parser) -> CompletedMarker {
    let m = p.start();

    let params = p.start();
    delimited(
        p,
        LEFT_PAREN,
        RIGHT_PAREN,
        COMMA,
        "expected a parameter type",
        &SyntaxSet::new([IDENT, LEFT_PAREN]),
        function_type_parameter,
    );
    params.complete(p, VALUE_PARAMETER_LIST);

    p.expect(ARROW);
    type_reference(p);
    m.complete(p, FUNCTION_TYPE)
}

fn function_type_parameter(p: &mut Parser) -> bool {
    if !matches!(p.peek_kind(), IDENT | LEFT_PAREN) {
        return false;
    }

    let m = p.start();
    if p.at(IDENT) && p.nth(1) == COLON {
        p.advance();
        p.advance();
    }
    type_reference(p);
    m.complete(p, VALUE_PARAMETER);
    true
}

pub(crate) fn user_type(p: &mut Parser) -> CompletedMarker {
    let m = p.start();
    reference(p);
    if p.at(LT) {
        type_argument_list(p);
    }
    let mut done = m.complete(p, USER_TYPE);

    while p.at(DOT) && p.nth(1) == IDENT {
        let m = done.precede(p);
        p.advance();
        reference(p);
        if p.at(LT) {
            type_argument_list(p);
        }
        done = m.complete(p, USER_TYPE);
    }

    done
}

fn reference(p: &mut Parser) {
    let m = p.start();
    p.advance();
    m.complete(p, REFERENCE_EXPR);
}

pub(crate) fn type_argument_list(p: &mut Parser) {
    let m = p.start();
    delimited(
        p,
        LT,
        GT,
        COMMA,
        "expected a type argument",
        &SyntaxSet::new([IDENT, STAR, IN_KW, LEFT_PAREN]),
        type_projection,
    );
    m.complete(p, TYPE_ARGUMENT_LIST);
}

fn type_projection(p: &mut Parser) -> bool {
    if !matches!(p.peek_kind(), IDENT | STAR | IN_KW | LEFT_PAREN) {
        return false;
    }

    let m = p.start();
    if !p.eat(STAR) {
        modifier_list(p, ModifierContext::TypeProjection);
        type_reference(p);
    }
    m.complete(p, TYPE_PROJECTION);
    true
}

/// Whether the `<` at the current position opens type arguments of a call.
pub(crate) fn at_call_type_arguments(p: &Parser) -> bool {
    debug_assert_eq!(p.peek_kind(), LT);

    let mut depth = 0u32;
    for n in 0.. {
        match p.nth(n) {
            LT => depth += 1,
            GT => {
                depth -= 1;
                if depth == 0 {
                    return p.nth(n + 1) == LEFT_PAREN;
                }
            }
            IDENT | DOT | COMMA | QUEST | STAR | IN_KW | LEFT_PAREN | RIGHT_PAREN | ARROW
            | COLON => {}
            _ => return false,
        }
    }
    false
}
