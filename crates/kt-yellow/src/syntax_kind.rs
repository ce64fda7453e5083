#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    SEMICOLON,
    COLON,
    COLON_COLON,
    DOT,
    SAFE_ACCESS,
    QUEST,
    ELVIS,
    ARROW,
    RANGE,
    AT,

    EQ,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    PERCENT_EQ,
    EQ_EQ,
    EXCL_EQ,
    EQ_EQ_EQ,
    EXCL_EQ_EQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    AND_AND,
    OR_OR,
    EXCL,
    EXCL_EXCL,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    PLUS_PLUS,
    MINUS_MINUS,
    NOT_IS,
    NOT_IN,

    AS_KW,
    AS_SAFE,
    CLASS_KW,
    ELSE_KW,
    FALSE_KW,
    FUN_KW,
    IF_KW,
    IMPORT_KW,
    IN_KW,
    IS_KW,
    NULL_KW,
    OBJECT_KW,
    PACKAGE_KW,
    RETURN_KW,
    THIS_KW,
    TRUE_KW,
    VAL_KW,
    VAR_KW,
    WHEN_KW,

    // Soft keywords: lexed as `IDENT`, remapped by the parser.
    ABSTRACT_KW,
    DATA_KW,
    ENUM_KW,
    FINAL_KW,
    INLINE_KW,
    INNER_KW,
    INTERNAL_KW,
    OPEN_KW,
    OUT_KW,
    OVERRIDE_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    VARARG_KW,

    IDENT,
    FIELD_IDENTIFIER,
    INT_NUMBER,
    FLOAT_NUMBER,
    CHARACTER_LITERAL,
    OPEN_QUOTE,
    CLOSING_QUOTE,
    REGULAR_STRING_PART,
    ESCAPE_SEQUENCE,
    SHORT_TEMPLATE_ENTRY_START,
    LONG_TEMPLATE_ENTRY_START,
    LONG_TEMPLATE_ENTRY_END,

    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,

    UNKNOWN,
    EOF,

    FILE,
    TYPE_CODE_FRAGMENT,
    EXPRESSION_CODE_FRAGMENT,
    PACKAGE_DIRECTIVE,
    IMPORT_LIST,
    IMPORT_DIRECTIVE,
    IMPORT_ALIAS,
    CLASS,
    CLASS_BODY,
    CLASS_OBJECT,
    PRIMARY_CONSTRUCTOR,
    SUPER_TYPE_LIST,
    SUPER_TYPE_ENTRY,
    FUN,
    PROPERTY,
    TYPE_PARAMETER_LIST,
    TYPE_PARAMETER,
    VALUE_PARAMETER_LIST,
    VALUE_PARAMETER,
    MODIFIER_LIST,
    ANNOTATION_ENTRY,

    TYPE_REFERENCE,
    USER_TYPE,
    NULLABLE_TYPE,
    FUNCTION_TYPE,
    TYPE_ARGUMENT_LIST,
    TYPE_PROJECTION,

    BLOCK,
    LITERAL,
    STRING_TEMPLATE,
    LITERAL_STRING_TEMPLATE_ENTRY,
    ESCAPE_STRING_TEMPLATE_ENTRY,
    SHORT_STRING_TEMPLATE_ENTRY,
    LONG_STRING_TEMPLATE_ENTRY,
    REFERENCE_EXPR,
    THIS_EXPR,
    LABEL_QUALIFIER,
    PAREN_EXPR,
    CALL_EXPR,
    VALUE_ARGUMENT_LIST,
    VALUE_ARGUMENT,
    VALUE_ARGUMENT_NAME,
    DOT_QUALIFIED_EXPR,
    SAFE_ACCESS_EXPR,
    ARRAY_ACCESS_EXPR,
    INDICES,
    POSTFIX_EXPR,
    PREFIX_EXPR,
    BINARY_EXPR,
    BINARY_WITH_TYPE,
    IS_EXPR,
    IF_EXPR,
    CONDITION,
    THEN_BRANCH,
    ELSE_BRANCH,
    WHEN_EXPR,
    WHEN_ENTRY,
    WHEN_CONDITION_EXPR,
    WHEN_CONDITION_IS,
    WHEN_CONDITION_IN,
    RETURN_EXPR,

    ERROR,
    TOMBSTONE,
}

use SyntaxKind::*;

impl SyntaxKind {
    pub(crate) const LAST: SyntaxKind = TOMBSTONE;

    /// Whitespace and comments.
    pub const fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | LINE_COMMENT | BLOCK_COMMENT)
    }

    pub const fn is_keyword(self) -> bool {
        self as u16 >= AS_KW as u16 && self as u16 <= VARARG_KW as u16
    }

    /// Kinds produced by the tokenizer or by remapping a token.
    pub const fn is_token(self) -> bool {
        (self as u16) < FILE as u16
    }

    /// Node kinds that form expressions; stub trees never look inside them.
    pub const fn is_expression(self) -> bool {
        matches!(
            self,
            LITERAL
                | STRING_TEMPLATE
                | REFERENCE_EXPR
                | THIS_EXPR
                | PAREN_EXPR
                | CALL_EXPR
                | DOT_QUALIFIED_EXPR
                | SAFE_ACCESS_EXPR
                | ARRAY_ACCESS_EXPR
                | POSTFIX_EXPR
                | PREFIX_EXPR
                | BINARY_EXPR
                | BINARY_WITH_TYPE
                | IS_EXPR
                | IF_EXPR
                | WHEN_EXPR
                | RETURN_EXPR
                | BLOCK
        )
    }

    pub const fn is_declaration(self) -> bool {
        matches!(self, CLASS | FUN | PROPERTY)
    }

    /// The raw tag used in serialized stub shapes.
    pub const fn into_raw(self) -> u16 {
        self as u16
    }

    pub const fn from_raw(raw: u16) -> Option<Self> {
        if raw <= Self::LAST as u16 {
            // SAFETY: `SyntaxKind` is `repr(u16)` with contiguous discriminants
            // starting at zero, and `raw` is within range.
            Some(unsafe { std::mem::transmute::<u16, SyntaxKind>(raw) })
        } else {
            None
        }
    }

    /// Maps an identifier text to a soft keyword usable as a modifier.
    pub fn from_modifier(text: &str) -> Option<Self> {
        Some(match text {
            "abstract" => ABSTRACT_KW,
            "data" => DATA_KW,
            "enum" => ENUM_KW,
            "final" => FINAL_KW,
            "inline" => INLINE_KW,
            "inner" => INNER_KW,
            "internal" => INTERNAL_KW,
            "open" => OPEN_KW,
            "out" => OUT_KW,
            "override" => OVERRIDE_KW,
            "private" => PRIVATE_KW,
            "protected" => PROTECTED_KW,
            "public" => PUBLIC_KW,
            "vararg" => VARARG_KW,
            _ => return None,
        })
    }

    /// Source text of a modifier keyword, `in` included.
    pub const fn modifier_text(self) -> Option<&'static str> {
        Some(match self {
            ABSTRACT_KW => "abstract",
            DATA_KW => "data",
            ENUM_KW => "enum",
            FINAL_KW => "final",
            INLINE_KW => "inline",
            INNER_KW => "inner",
            INTERNAL_KW => "internal",
            OPEN_KW => "open",
            OUT_KW => "out",
            OVERRIDE_KW => "override",
            PRIVATE_KW => "private",
            PROTECTED_KW => "protected",
            PUBLIC_KW => "public",
            VARARG_KW => "vararg",
            IN_KW => "in",
            _ => return None,
        })
    }

    pub const fn is_modifier(self) -> bool {
        self.modifier_text().is_some()
    }
}
