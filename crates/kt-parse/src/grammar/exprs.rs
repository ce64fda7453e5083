use kt_yellow::SyntaxKind::{self, *};
use kt_yellow::SyntaxSet;

use super::{EXPR_FIRST, delimited, items, types};
use crate::parser::{CompletedMarker, Parser};

/// Operators that may continue an expression on the next line.
const LINE_CONTINUATIONS: SyntaxSet = SyntaxSet::new([AND_AND, OR_OR, ELVIS]);

const PREFIX_OPERATORS: SyntaxSet =
    SyntaxSet::new([MINUS, PLUS, EXCL, PLUS_PLUS, MINUS_MINUS]);

const POSTFIX_OPERATORS: SyntaxSet = SyntaxSet::new([PLUS_PLUS, MINUS_MINUS, EXCL_EXCL]);

/// Tokens an expression never starts with; primary recovery stops at them.
const EXPR_RECOVERY: SyntaxSet =
    SyntaxSet::new([SEMICOLON, COMMA, ARROW, ELSE_KW, CLOSING_QUOTE])
        .union(&items::DECLARATION_KEYWORDS);

pub(crate) fn expr(p: &mut Parser) -> Option<CompletedMarker> {
    expr_bp(p, 1)
}

/// Binding power of the binary operator at the current position.
fn infix_binding_power(p: &Parser) -> Option<u8> {
    let kind = p.peek_kind();
    if p.has_newline_before() && !LINE_CONTINUATIONS.contains(kind) {
        return None;
    }

    let bp = match kind {
        EQ | PLUS_EQ | MINUS_EQ | STAR_EQ | SLASH_EQ | PERCENT_EQ => 1,
        OR_OR => 2,
        AND_AND => 3,
        EQ_EQ | EXCL_EQ | EQ_EQ_EQ | EXCL_EQ_EQ => 4,
        LT | GT | LT_EQ | GT_EQ => 5,
        IN_KW | NOT_IN | IS_KW | NOT_IS => 6,
        ELVIS => 7,
        IDENT => 8,
        RANGE => 9,
        PLUS | MINUS => 10,
        STAR | SLASH | PERCENT => 11,
        _ => return None,
    };
    Some(bp)
}

fn expr_bp(p: &mut Parser, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = as_expr(p)?;

    while let Some(bp) = infix_binding_power(p) {
        if bp < min_bp {
            break;
        }

        let m = lhs.precede(p);
        let op = p.peek_kind();
        p.advance();

        if matches!(op, IS_KW | NOT_IS) {
            types::type_reference(p);
            lhs = m.complete(p, IS_EXPR);
            continue;
        }

        // Assignments are right associative.
        let rhs_bp = if bp == 1 { bp } else { bp + 1 };
        expr_bp(p, rhs_bp);
        lhs = m.complete(p, BINARY_EXPR);
    }

    Some(lhs)
}

fn as_expr(p: &mut Parser) -> Option<CompletedMarker> {
    let mut lhs = prefix_expr(p)?;

    while matches!(p.peek_kind(), AS_KW | AS_SAFE) && !p.has_newline_before() {
        let m = lhs.precede(p);
        p.advance();
        types::type_reference(p);
        lhs = m.complete(p, BINARY_WITH_TYPE);
    }

    Some(lhs)
}

fn prefix_expr(p: &mut Parser) -> Option<CompletedMarker> {
    if !p.at_set(&PREFIX_OPERATORS) {
        return postfix_expr(p);
    }

    let m = p.start();
    p.advance();
    prefix_expr(p);
    Some(m.complete(p, PREFIX_EXPR))
}

fn postfix_expr(p: &mut Parser) -> Option<CompletedMarker> {
    let mut lhs = primary_expr(p)?;

    loop {
        lhs = match p.peek_kind() {
            LEFT_PAREN | LT | LEFT_BRACKET if p.has_newline_before() => break,
            LEFT_PAREN => {
                let m = lhs.precede(p);
                value_argument_list(p);
                m.complete(p, CALL_EXPR)
            }
            LT if types::at_call_type_arguments(p) => {
                let m = lhs.precede(p);
                types::type_argument_list(p);
                value_argument_list(p);
                m.complete(p, CALL_EXPR)
            }
            LEFT_BRACKET => {
                let m = lhs.precede(p);
                indices(p);
                m.complete(p, ARRAY_ACCESS_EXPR)
            }
            DOT | SAFE_ACCESS => {
                let kind =
                    if p.at(DOT) { DOT_QUALIFIED_EXPR } else { SAFE_ACCESS_EXPR };
                let m = lhs.precede(p);
                p.advance();
                selector(p);
                m.complete(p, kind)
            }
            kind if POSTFIX_OPERATORS.contains(kind) && !p.has_newline_before() => {
                let m = lhs.precede(p);
                p.advance();
                m.complete(p, POSTFIX_EXPR)
            }
            _ => break,
        };
    }

    Some(lhs)
}

/// The member after `.` or `?.`: a name, possibly called.
fn selector(p: &mut Parser) {
    if !p.at(IDENT) {
        p.error("expected a name after '.'");
        return;
    }

    let callee = reference(p);
    if p.has_newline_before() {
        return;
    }

    match p.peek_kind() {
        LEFT_PAREN => {
            let m = callee.precede(p);
            value_argument_list(p);
            m.complete(p, CALL_EXPR);
        }
        LT if types::at_call_type_arguments(p) => {
            let m = callee.precede(p);
            types::type_argument_list(p);
            value_argument_list(p);
            m.complete(p, CALL_EXPR);
        }
        _ => {}
    }
}

fn indices(p: &mut Parser) {
    let m = p.start();
    delimited(
        p,
        LEFT_BRACKET,
        RIGHT_BRACKET,
        COMMA,
        "expected an index",
        &EXPR_FIRST,
        |p| expr(p).is_some(),
    );
    m.complete(p, INDICES);
}

fn primary_expr(p: &mut Parser) -> Option<CompletedMarker> {
    let done = match p.peek_kind() {
        INT_NUMBER | FLOAT_NUMBER | CHARACTER_LITERAL | TRUE_KW | FALSE_KW | NULL_KW => {
            let m = p.start();
            p.advance();
            m.complete(p, LITERAL)
        }
        IDENT | FIELD_IDENTIFIER => reference(p),
        OPEN_QUOTE => string_template(p),
        THIS_KW => this_expr(p),
        LEFT_PAREN => {
            let m = p.start();
            p.advance();
            expr(p);
            p.expect(RIGHT_PAREN);
            m.complete(p, PAREN_EXPR)
        }
        LEFT_BRACE => block(p),
        IF_KW => if_expr(p),
        WHEN_KW => when_expr(p),
        RETURN_KW => return_expr(p),
        _ => {
            p.error_recover("expected an expression", &EXPR_RECOVERY);
            return None;
        }
    };

    Some(done)
}

fn reference(p: &mut Parser) -> CompletedMarker {
    let m = p.start();
    p.advance();
    m.complete(p, REFERENCE_EXPR)
}

fn this_expr(p: &mut Parser) -> CompletedMarker {
    let m = p.start();
    p.advance();

    if p.at(AT) && !p.has_trivia_before() {
        let label = p.start();
        p.advance();
        if p.at(IDENT) && !p.has_trivia_before() {
            p.advance();
        } else {
            p.error("expected a label name");
        }
        label.complete(p, LABEL_QUALIFIER);
    }

    m.complete(p, THIS_EXPR)
}

fn string_template(p: &mut Parser) -> CompletedMarker {
    let m = p.start();
    p.advance();

    loop {
        match p.peek_kind() {
            CLOSING_QUOTE => {
                p.advance();
                break;
            }
            REGULAR_STRING_PART => template_entry(p, LITERAL_STRING_TEMPLATE_ENTRY),
            ESCAPE_SEQUENCE => template_entry(p, ESCAPE_STRING_TEMPLATE_ENTRY),
            SHORT_TEMPLATE_ENTRY_START => {
                let entry = p.start();
                p.advance();
                match p.peek_kind() {
                    THIS_KW => {
                        let this = p.start();
                        p.advance();
                        this.complete(p, THIS_EXPR);
                    }
                    _ => {
                        reference(p);
                    }
                }
                entry.complete(p, SHORT_STRING_TEMPLATE_ENTRY);
            }
            LONG_TEMPLATE_ENTRY_START => {
                let entry = p.start();
                p.advance();
                expr(p);
                p.expect(LONG_TEMPLATE_ENTRY_END);
                entry.complete(p, LONG_STRING_TEMPLATE_ENTRY);
            }
            _ => {
                p.error("unterminated string literal");
                break;
            }
        }
    }

    m.complete(p, STRING_TEMPLATE)
}

fn template_entry(p: &mut Parser, kind: SyntaxKind) {
    let m = p.start();
    p.advance();
    m.complete(p, kind);
}

fn if_expr(p: &mut Parser) -> CompletedMarker {
    let m = p.start();
    p.advance();

    p.expect(LEFT_PAREN);
    let condition = p.start();
    expr(p);
    condition.complete(p, CONDITION);
    p.expect(RIGHT_PAREN);

    if !p.at(ELSE_KW) && !p.at(SEMICOLON) {
        let then = p.start();
        expr(p);
        then.complete(p, THEN_BRANCH);
    }

    if p.at(SEMICOLON) && p.nth(1) == ELSE_KW {
        p.advance();
    }

    // `else ->` belongs to an enclosing `when`.
    if p.at(ELSE_KW) && p.nth(1) != ARROW {
        p.advance();
        let otherwise = p.start();
        expr(p);
        otherwise.complete(p, ELSE_BRANCH);
    }

    m.complete(p, IF_EXPR)
}

fn when_expr(p: &mut Parser) -> CompletedMarker {
    let m = p.start();
    p.advance();

    if p.eat(LEFT_PAREN) {
        expr(p);
        p.expect(RIGHT_PAREN);
    }

    if p.expect(LEFT_BRACE) {
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            if p.eat(SEMICOLON) {
                continue;
            }
            let before = p.position();
            when_entry(p);
            if p.position() == before {
                p.error_and_bump("expected a when entry");
            }
        }
        p.expect(RIGHT_BRACE);
    }

    m.complete(p, WHEN_EXPR)
}

fn when_entry(p: &mut Parser) {
    let m = p.start();

    if !p.eat(ELSE_KW) {
        loop {
            when_condition(p);
            if !p.eat(COMMA) {
                break;
            }
        }
    }

    p.expect(ARROW);
    expr(p);

    m.complete(p, WHEN_ENTRY);
}

fn when_condition(p: &mut Parser) {
    let m = p.start();
    match p.peek_kind() {
        IS_KW | NOT_IS => {
            p.advance();
            types::type_reference(p);
            m.complete(p, WHEN_CONDITION_IS);
        }
        IN_KW | NOT_IN => {
            p.advance();
            expr(p);
            m.complete(p, WHEN_CONDITION_IN);
        }
        _ => {
            expr(p);
            m.complete(p, WHEN_CONDITION_EXPR);
        }
    }
}

fn return_expr(p: &mut Parser) -> CompletedMarker {
    let m = p.start();
    p.advance();
    if p.at_set(&EXPR_FIRST) && !p.has_newline_before() {
        expr(p);
    }
    m.complete(p, RETURN_EXPR)
}

pub(crate) fn block(p: &mut Parser) -> CompletedMarker {
    let m = p.start();
    p.expect(LEFT_BRACE);

    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if p.eat(SEMICOLON) {
            continue;
        }

        let before = p.position();
        if !items::declaration(p) {
            expr(p);
        }
        if p.position() == before {
            p.error_and_bump("expected a statement");
        }
    }

    p.expect(RIGHT_BRACE);
    m.complete(p, BLOCK)
}

pub(crate) fn value_argument_list(p: &mut Parser) {
    if !p.at(LEFT_PAREN) {
        p.error("expected arguments");
        return;
    }

    let m = p.start();
    delimited(
        p,
        LEFT_PAREN,
        RIGHT_PAREN,
        COMMA,
        "expected an argument",
        &EXPR_FIRST,
        value_argument,
    );
    m.complete(p, VALUE_ARGUMENT_LIST);
}

fn value_argument(p: &mut Parser) -> bool {
    if !p.at_set(&EXPR_FIRST) && !p.at(STAR) {
        return false;
    }

    let m = p.start();
    if p.at(IDENT) && p.nth(1) == EQ {
        let name = p.start();
        reference(p);
        name.complete(p, VALUE_ARGUMENT_NAME);
        p.advance();
    }
    p.eat(STAR);

    expr(p);
    m.complete(p, VALUE_ARGUMENT);
    true
}
