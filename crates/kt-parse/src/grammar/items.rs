use kt_yellow::SyntaxKind::*;
use kt_yellow::SyntaxSet;

use super::{EXPR_FIRST, ModifierContext, delimited, exprs, modifier_list, name, types};
use crate::parser::Parser;

pub(super) const DECLARATION_KEYWORDS: SyntaxSet =
    SyntaxSet::new([CLASS_KW, FUN_KW, VAL_KW, VAR_KW]);

const DECLARATION_FIRST: SyntaxSet =
    DECLARATION_KEYWORDS.union(&SyntaxSet::new([AT, IMPORT_KW, PACKAGE_KW]));

pub(crate) fn file(p: &mut Parser) {
    let m = p.start();

    if p.at(PACKAGE_KW) {
        package_directive(p);
    }
    import_list(p);

    while !p.at(EOF) {
        if p.eat(SEMICOLON) {
            continue;
        }
        if !declaration(p) {
            p.error_and_bump("expected a declaration");
        }
    }

    m.complete(p, FILE);
}

pub(crate) fn expression_code_fragment(p: &mut Parser) {
    let m = p.start();
    exprs::expr(p);
    trailing_tokens(p);
    m.complete(p, EXPRESSION_CODE_FRAGMENT);
}

pub(crate) fn type_code_fragment(p: &mut Parser) {
    let m = p.start();
    types::type_reference(p);
    trailing_tokens(p);
    m.complete(p, TYPE_CODE_FRAGMENT);
}

fn trailing_tokens(p: &mut Parser) {
    while !p.at(EOF) {
        p.error_and_bump("unexpected token after the fragment");
    }
}

fn package_directive(p: &mut Parser) {
    let m = p.start();
    p.advance();
    qualified_name(p);
    p.eat(SEMICOLON);
    m.complete(p, PACKAGE_DIRECTIVE);
}

fn qualified_name(p: &mut Parser) {
    name(p, &DECLARATION_FIRST);
    while p.at(DOT) && p.nth(1) == IDENT {
        p.advance();
        p.advance();
    }
}

fn import_list(p: &mut Parser) {
    let m = p.start();
    while p.at(IMPORT_KW) {
        import_directive(p);
    }
    m.complete(p, IMPORT_LIST);
}

fn import_directive(p: &mut Parser) {
    let m = p.start();
    p.advance();

    if p.at(IDENT) {
        p.advance();
        while p.at(DOT) {
            match p.nth(1) {
                IDENT => {
                    p.advance();
                    p.advance();
                }
                STAR => {
                    p.advance();
                    p.advance();
                    break;
                }
                _ => {
                    p.advance();
                    p.error("expected a name or '*'");
                    break;
                }
            }
        }
    } else {
        p.error("expected a qualified name");
    }

    if p.at(AS_KW) {
        let alias = p.start();
        p.advance();
        name(p, &DECLARATION_FIRST);
        alias.complete(p, IMPORT_ALIAS);
    }

    p.eat(SEMICOLON);
    m.complete(p, IMPORT_DIRECTIVE);
}

/// Parses a class, function or property with its modifiers. Returns `false`
/// without consuming anything when no declaration starts here.
pub(crate) fn declaration(p: &mut Parser) -> bool {
    let m = p.start();
    let has_modifiers = modifier_list(p, ModifierContext::Declaration);

    match p.peek_kind() {
        CLASS_KW => {
            class(p);
            m.complete(p, CLASS);
        }
        FUN_KW => {
            fun(p);
            m.complete(p, FUN);
        }
        VAL_KW | VAR_KW => {
            property(p);
            m.complete(p, PROPERTY);
        }
        _ if has_modifiers => {
            p.error("expected a declaration after modifiers");
            m.complete(p, ERROR);
        }
        _ => {
            m.abandon(p);
            return false;
        }
    }

    true
}

fn class(p: &mut Parser) {
    p.advance();
    name(p, &SyntaxSet::new([LEFT_PAREN, LEFT_BRACE, COLON, LT]));

    if p.at(LT) {
        type_parameter_list(p);
    }

    if p.at(LEFT_PAREN) || super::at_modifier(p, ModifierContext::Constructor) {
        let m = p.start();
        modifier_list(p, ModifierContext::Constructor);
        if p.at(LEFT_PAREN) {
            value_parameter_list(p);
        } else {
            p.error("expected constructor parameters");
        }
        m.complete(p, PRIMARY_CONSTRUCTOR);
    }

    if p.at(COLON) {
        p.advance();
        super_type_list(p);
    }

    if p.at(LEFT_BRACE) {
        class_body(p);
    }
}

fn super_type_list(p: &mut Parser) {
    let m = p.start();
    loop {
        let entry = p.start();
        types::type_reference(p);
        if p.at(LEFT_PAREN) && !p.has_newline_before() {
            exprs::value_argument_list(p);
        }
        entry.complete(p, SUPER_TYPE_ENTRY);

        if !p.eat(COMMA) {
            break;
        }
    }
    m.complete(p, SUPER_TYPE_LIST);
}

fn class_body(p: &mut Parser) {
    let m = p.start();
    p.advance();

    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if p.eat(SEMICOLON) {
            continue;
        }
        if p.at(CLASS_KW) && p.nth(1) == OBJECT_KW {
            class_object(p);
        } else if !declaration(p) {
            p.error_and_bump("expected a member declaration");
        }
    }

    p.expect(RIGHT_BRACE);
    m.complete(p, CLASS_BODY);
}

fn class_object(p: &mut Parser) {
    let m = p.start();
    p.advance();
    p.advance();
    if p.at(LEFT_BRACE) {
        class_body(p);
    }
    m.complete(p, CLASS_OBJECT);
}

fn fun(p: &mut Parser) {
    p.advance();

    if p.at(LT) {
        type_parameter_list(p);
    }

    name(p, &SyntaxSet::new([LEFT_PAREN, LT]));

    if p.at(LT) {
        type_parameter_list(p);
    }

    if p.at(LEFT_PAREN) {
        value_parameter_list(p);
    } else {
        p.error("expected function parameters");
    }

    if p.eat(COLON) {
        types::type_reference(p);
    }

    if p.eat(EQ) {
        exprs::expr(p);
    } else if p.at(LEFT_BRACE) {
        exprs::block(p);
    }
}

fn property(p: &mut Parser) {
    p.advance();
    name(p, &SyntaxSet::new([COLON, EQ]));

    if p.eat(COLON) {
        types::type_reference(p);
    }

    if p.eat(EQ) {
        exprs::expr(p);
    }

    p.eat(SEMICOLON);
}

fn type_parameter_list(p: &mut Parser) {
    let m = p.start();
    delimited(
        p,
        LT,
        GT,
        COMMA,
        "expected a type parameter",
        &SyntaxSet::new([IDENT, IN_KW]),
        type_parameter,
    );
    m.complete(p, TYPE_PARAMETER_LIST);
}

fn type_parameter(p: &mut Parser) -> bool {
    if !matches!(p.peek_kind(), IDENT | IN_KW) {
        return false;
    }

    let m = p.start();
    modifier_list(p, ModifierContext::TypeParameter);
    name(p, &SyntaxSet::new([COMMA, GT]));
    if p.eat(COLON) {
        types::type_reference(p);
    }
    m.complete(p, TYPE_PARAMETER);
    true
}

pub(crate) fn value_parameter_list(p: &mut Parser) {
    let m = p.start();
    delimited(
        p,
        LEFT_PAREN,
        RIGHT_PAREN,
        COMMA,
        "expected a parameter",
        &SyntaxSet::new([IDENT, VAL_KW, VAR_KW, AT]),
        value_parameter,
    );
    m.complete(p, VALUE_PARAMETER_LIST);
}

fn value_parameter(p: &mut Parser) -> bool {
    if !matches!(p.peek_kind(), IDENT | VAL_KW | VAR_KW | AT) {
        return false;
    }

    let m = p.start();
    modifier_list(p, ModifierContext::Parameter);
    if matches!(p.peek_kind(), VAL_KW | VAR_KW) {
        p.advance();
    }
    name(p, &SyntaxSet::new([COLON, COMMA, RIGHT_PAREN]));

    if p.eat(COLON) {
        types::type_reference(p);
    } else {
        p.error("expected a parameter type");
    }

    if p.eat(EQ) {
        if p.at_set(&EXPR_FIRST) {
            exprs::expr(p);
        } else {
            p.error("expected a default value");
        }
    }

    m.complete(p, VALUE_PARAMETER);
    true
}
