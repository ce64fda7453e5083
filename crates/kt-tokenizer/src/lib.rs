mod cursor;

use cursor::Cursor;
pub use kt_yellow::SyntaxKind;
use kt_yellow::SyntaxKind::*;
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    /// Inside a string literal; `raw` for `"""` strings.
    String { raw: bool },
    /// Inside `${ ... }`, tracking nested braces.
    Template { depth: u32 },
    /// Right after a `$` inside a string.
    ShortTemplate,
}

/// Splits source text into tokens, trivia included.
///
/// String literals are split into quote, literal-part, escape and template
/// tokens; the tokens of a `${...}` entry are ordinary code tokens.
pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    modes: Vec<Mode>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, cursor: Cursor::new(text), modes: vec![Mode::Code] }
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        let len = self.cursor.pos_within_token();
        TextRange::at(end - len, len)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Code)
    }

    /// Returns the next token; `EOF` once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        let kind = match self.mode() {
            Mode::String { raw } => self.string_part(raw),
            Mode::ShortTemplate => self.short_template(),
            Mode::Code | Mode::Template { .. } => self.code(),
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();
        Token { kind, range }
    }

    fn code(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }

        match self.cursor.advance() {
            c if c.is_whitespace() => {
                self.cursor.advance_while(char::is_whitespace);
                WHITESPACE
            }
            '/' if self.cursor.matches('/') => {
                self.cursor.advance_while(|c| c != '\n');
                LINE_COMMENT
            }
            '/' if self.cursor.matches('*') => self.block_comment(),
            '/' if self.cursor.eat('=') => SLASH_EQ,
            '/' => SLASH,
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => {
                if let Some(Mode::Template { depth }) = self.modes.last_mut() {
                    *depth += 1;
                }
                LEFT_BRACE
            }
            '}' => match self.modes.last_mut() {
                Some(Mode::Template { depth: 0 }) => {
                    self.modes.pop();
                    LONG_TEMPLATE_ENTRY_END
                }
                Some(Mode::Template { depth }) => {
                    *depth -= 1;
                    RIGHT_BRACE
                }
                _ => RIGHT_BRACE,
            },
            ',' => COMMA,
            ';' => SEMICOLON,
            '@' => AT,
            ':' if self.cursor.eat(':') => COLON_COLON,
            ':' => COLON,
            '.' if self.cursor.eat('.') => RANGE,
            '.' => DOT,
            '?' if self.cursor.eat('.') => SAFE_ACCESS,
            '?' if self.cursor.eat(':') => ELVIS,
            '?' => QUEST,
            '-' if self.cursor.eat('>') => ARROW,
            '-' if self.cursor.eat('-') => MINUS_MINUS,
            '-' if self.cursor.eat('=') => MINUS_EQ,
            '-' => MINUS,
            '+' if self.cursor.eat('+') => PLUS_PLUS,
            '+' if self.cursor.eat('=') => PLUS_EQ,
            '+' => PLUS,
            '*' if self.cursor.eat('=') => STAR_EQ,
            '*' => STAR,
            '%' if self.cursor.eat('=') => PERCENT_EQ,
            '%' => PERCENT,
            '=' if self.cursor.eat('=') => {
                if self.cursor.eat('=') { EQ_EQ_EQ } else { EQ_EQ }
            }
            '=' => EQ,
            '!' => self.exclamation(),
            '<' if self.cursor.eat('=') => LT_EQ,
            '<' => LT,
            '>' if self.cursor.eat('=') => GT_EQ,
            '>' => GT,
            '&' if self.cursor.eat('&') => AND_AND,
            '|' if self.cursor.eat('|') => OR_OR,
            '"' => {
                let raw = self.cursor.matches('"') && self.cursor.second() == '"';
                if raw {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                self.modes.push(Mode::String { raw });
                OPEN_QUOTE
            }
            '\'' => self.character(),
            '$' if is_ident_start(self.cursor.peek()) => {
                self.cursor.advance_while(is_ident_continue);
                FIELD_IDENTIFIER
            }
            '`' => {
                self.cursor.advance_while(|c| c != '`' && c != '\n');
                if self.cursor.eat('`') { IDENT } else { UNKNOWN }
            }
            first_char @ '0'..='9' => self.number(first_char),
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                self.keyword_or_ident()
            }
            _ => UNKNOWN,
        }
    }

    fn keyword_or_ident(&mut self) -> SyntaxKind {
        match self.text() {
            "as" if self.cursor.eat('?') => AS_SAFE,
            "as" => AS_KW,
            "class" => CLASS_KW,
            "else" => ELSE_KW,
            "false" => FALSE_KW,
            "fun" => FUN_KW,
            "if" => IF_KW,
            "import" => IMPORT_KW,
            "in" => IN_KW,
            "is" => IS_KW,
            "null" => NULL_KW,
            "object" => OBJECT_KW,
            "package" => PACKAGE_KW,
            "return" => RETURN_KW,
            "this" => THIS_KW,
            "true" => TRUE_KW,
            "val" => VAL_KW,
            "var" => VAR_KW,
            "when" => WHEN_KW,
            _ => IDENT,
        }
    }

    fn exclamation(&mut self) -> SyntaxKind {
        if self.cursor.eat('=') {
            return if self.cursor.eat('=') { EXCL_EQ_EQ } else { EXCL_EQ };
        }
        if self.cursor.eat('!') {
            return EXCL_EXCL;
        }

        let rest = self.cursor.rest();
        for (word, kind) in [("is", NOT_IS), ("in", NOT_IN)] {
            if let Some(after) = rest.strip_prefix(word)
                && !after.starts_with(is_ident_continue)
            {
                self.cursor.advance();
                self.cursor.advance();
                return kind;
            }
        }

        EXCL
    }

    fn block_comment(&mut self) -> SyntaxKind {
        debug_assert!(self.cursor.matches('*'));
        self.cursor.advance();

        let mut depth = 1u32;
        while depth > 0 && !self.cursor.is_eof() {
            match self.cursor.advance() {
                '/' if self.cursor.eat('*') => depth += 1,
                '*' if self.cursor.eat('/') => depth -= 1,
                _ => {}
            }
        }

        BLOCK_COMMENT
    }

    fn character(&mut self) -> SyntaxKind {
        loop {
            match self.cursor.peek() {
                '\'' => {
                    self.cursor.advance();
                    return CHARACTER_LITERAL;
                }
                '\\' => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                '\n' => return UNKNOWN,
                _ if self.cursor.is_eof() => return UNKNOWN,
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn string_part(&mut self, raw: bool) -> SyntaxKind {
        if self.cursor.is_eof() {
            self.modes.pop();
            return EOF;
        }

        match self.cursor.peek() {
            '"' if !raw => {
                self.cursor.advance();
                self.modes.pop();
                CLOSING_QUOTE
            }
            '"' if self.cursor.second() == '"' && self.cursor.third() == '"' => {
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.advance();
                self.modes.pop();
                CLOSING_QUOTE
            }
            '\n' if !raw => {
                // Unterminated literal: the rest of the line is code again.
                self.modes.pop();
                self.code()
            }
            '\\' if !raw => {
                self.cursor.advance();
                if self.cursor.advance() == 'u' {
                    for _ in 0..4 {
                        if self.cursor.peek().is_ascii_hexdigit() {
                            self.cursor.advance();
                        }
                    }
                }
                ESCAPE_SEQUENCE
            }
            '$' if self.cursor.second() == '{' => {
                self.cursor.advance();
                self.cursor.advance();
                self.modes.push(Mode::Template { depth: 0 });
                LONG_TEMPLATE_ENTRY_START
            }
            '$' if is_ident_start(self.cursor.second()) => {
                self.cursor.advance();
                self.modes.push(Mode::ShortTemplate);
                SHORT_TEMPLATE_ENTRY_START
            }
            _ => {
                self.cursor.advance();
                loop {
                    match self.cursor.peek() {
                        '"' | '$' if !self.at_string_boundary(raw) => {
                            self.cursor.advance();
                        }
                        '"' | '$' => break,
                        '\\' | '\n' if !raw => break,
                        _ if self.cursor.is_eof() => break,
                        _ => {
                            self.cursor.advance();
                        }
                    }
                }
                REGULAR_STRING_PART
            }
        }
    }

    /// Whether the `"` or `$` under the cursor ends the current literal part.
    fn at_string_boundary(&self, raw: bool) -> bool {
        match self.cursor.peek() {
            '"' => !raw || (self.cursor.second() == '"' && self.cursor.third() == '"'),
            '$' => self.cursor.second() == '{' || is_ident_start(self.cursor.second()),
            _ => false,
        }
    }

    fn short_template(&mut self) -> SyntaxKind {
        self.modes.pop();
        self.cursor.advance();
        self.cursor.advance_while(is_ident_continue);
        if self.text() == "this" { THIS_KW } else { IDENT }
    }

    fn number(&mut self, c: char) -> SyntaxKind {
        if c == '0' {
            match self.cursor.peek() {
                'b' | 'B' => {
                    self.cursor.advance();
                    self.digits(false);
                    return self.integer_suffix();
                }
                'x' | 'X' => {
                    self.cursor.advance();
                    self.digits(true);
                    return self.integer_suffix();
                }
                '0'..='9' | '_' | '.' | 'e' | 'E' => {
                    self.digits(false);
                }
                _ => return self.integer_suffix(),
            }
        } else {
            self.digits(false);
        }

        if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
            self.cursor.advance();
            self.digits(false);
            self.float_exponent();
            self.float_suffix();
            return FLOAT_NUMBER;
        }

        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.float_exponent();
            self.float_suffix();
            return FLOAT_NUMBER;
        }

        if self.float_suffix() {
            return FLOAT_NUMBER;
        }

        self.integer_suffix()
    }

    fn integer_suffix(&mut self) -> SyntaxKind {
        self.cursor.eat('L');
        INT_NUMBER
    }

    fn float_suffix(&mut self) -> bool {
        self.cursor.eat('f') || self.cursor.eat('F')
    }

    fn digits(&mut self, allow_hex: bool) {
        loop {
            match self.cursor.peek() {
                '_' | '0'..='9' => {
                    self.cursor.advance();
                }
                'a'..='f' | 'A'..='F' if allow_hex => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }

    fn float_exponent(&mut self) {
        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.cursor.advance();
            if self.cursor.matches('-') || self.cursor.matches('+') {
                self.cursor.advance();
            }
            self.digits(false);
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != EOF).then_some(token)
    }
}

/// Tokenizes the whole text; the last token is always `EOF`.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::with_capacity(text.len() / 4 + 1);

    loop {
        let token = tokenizer.next_token();
        tokens.push(token);
        if token.kind == EOF {
            return tokens;
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(SyntaxKind, &str)> {
        tokenize(text)
            .into_iter()
            .filter(|token| token.kind != EOF)
            .map(|token| (token.kind, &text[token.range]))
            .collect()
    }

    #[test]
    fn test_integer_literals() {
        let inputs = vec![
            ("123", INT_NUMBER),
            ("0", INT_NUMBER),
            ("0b1010", INT_NUMBER),
            ("0x1f", INT_NUMBER),
            ("123_456", INT_NUMBER),
            ("10L", INT_NUMBER),
        ];

        for (input, expected_kind) in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let kind = tokenizer.next_token().kind;
            assert_eq!(kind, expected_kind, "Input: '{}'", input);
            assert!(
                tokenizer.cursor.is_eof(),
                "Tokenizer did not consume all input for '{}'",
                input
            );
        }
    }

    #[test]
    fn test_float_literals() {
        let inputs = vec![
            ("123.456", FLOAT_NUMBER),
            ("0.0", FLOAT_NUMBER),
            ("1e10", FLOAT_NUMBER),
            ("1.0e-5", FLOAT_NUMBER),
            ("2.5f", FLOAT_NUMBER),
            ("3F", FLOAT_NUMBER),
        ];

        for (input, expected_kind) in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let kind = tokenizer.next_token().kind;
            assert_eq!(kind, expected_kind, "Input: '{}'", input);
            assert!(
                tokenizer.cursor.is_eof(),
                "Tokenizer did not consume all input for '{}'",
                input
            );
        }
    }

    #[test]
    fn test_range_is_not_a_float() {
        assert_eq!(kinds("1..2"), [(INT_NUMBER, "1"), (RANGE, ".."), (INT_NUMBER, "2")]);
    }

    #[test]
    fn test_trivia_tokens() {
        assert_eq!(
            kinds("val\n  x // tail\n/* a /* b */ c */"),
            [
                (VAL_KW, "val"),
                (WHITESPACE, "\n  "),
                (IDENT, "x"),
                (WHITESPACE, " "),
                (LINE_COMMENT, "// tail"),
                (WHITESPACE, "\n"),
                (BLOCK_COMMENT, "/* a /* b */ c */"),
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a?.b ?: c!! -> d::e"),
            [
                (IDENT, "a"),
                (SAFE_ACCESS, "?."),
                (IDENT, "b"),
                (WHITESPACE, " "),
                (ELVIS, "?:"),
                (WHITESPACE, " "),
                (IDENT, "c"),
                (EXCL_EXCL, "!!"),
                (WHITESPACE, " "),
                (ARROW, "->"),
                (WHITESPACE, " "),
                (IDENT, "d"),
                (COLON_COLON, "::"),
                (IDENT, "e"),
            ]
        );
    }

    #[test]
    fn test_negated_keywords() {
        assert_eq!(kinds("!is"), [(NOT_IS, "!is")]);
        assert_eq!(kinds("!in"), [(NOT_IN, "!in")]);
        assert_eq!(kinds("!isEmpty"), [(EXCL, "!"), (IDENT, "isEmpty")]);
        assert_eq!(kinds("x as? T"), [
            (IDENT, "x"),
            (WHITESPACE, " "),
            (AS_SAFE, "as?"),
            (WHITESPACE, " "),
            (IDENT, "T"),
        ]);
    }

    #[test]
    fn test_equality_operators() {
        assert_eq!(kinds("==="), [(EQ_EQ_EQ, "===")]);
        assert_eq!(kinds("!=="), [(EXCL_EQ_EQ, "!==")]);
        assert_eq!(kinds("=="), [(EQ_EQ, "==")]);
        assert_eq!(kinds("!="), [(EXCL_EQ, "!=")]);
        assert_eq!(kinds("<="), [(LT_EQ, "<=")]);
    }

    #[test]
    fn test_string_template() {
        assert_eq!(
            kinds(r#""a\n$b ${c + "d"} e""#),
            [
                (OPEN_QUOTE, "\""),
                (REGULAR_STRING_PART, "a"),
                (ESCAPE_SEQUENCE, "\\n"),
                (SHORT_TEMPLATE_ENTRY_START, "$"),
                (IDENT, "b"),
                (REGULAR_STRING_PART, " "),
                (LONG_TEMPLATE_ENTRY_START, "${"),
                (IDENT, "c"),
                (WHITESPACE, " "),
                (PLUS, "+"),
                (WHITESPACE, " "),
                (OPEN_QUOTE, "\""),
                (REGULAR_STRING_PART, "d"),
                (CLOSING_QUOTE, "\""),
                (LONG_TEMPLATE_ENTRY_END, "}"),
                (REGULAR_STRING_PART, " e"),
                (CLOSING_QUOTE, "\""),
            ]
        );
    }

    #[test]
    fn test_template_tracks_nested_braces() {
        let tokens = kinds(r#""${ f { x } }""#);
        let kinds = tokens.iter().map(|(kind, _)| *kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [
                OPEN_QUOTE,
                LONG_TEMPLATE_ENTRY_START,
                WHITESPACE,
                IDENT,
                WHITESPACE,
                LEFT_BRACE,
                WHITESPACE,
                IDENT,
                WHITESPACE,
                RIGHT_BRACE,
                WHITESPACE,
                LONG_TEMPLATE_ENTRY_END,
                CLOSING_QUOTE,
            ]
        );
    }

    #[test]
    fn test_dollar_without_identifier_is_text() {
        assert_eq!(
            kinds(r#""$5 $""#),
            [(OPEN_QUOTE, "\""), (REGULAR_STRING_PART, "$5 $"), (CLOSING_QUOTE, "\"")]
        );
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        assert_eq!(
            kinds("\"abc\nx"),
            [
                (OPEN_QUOTE, "\""),
                (REGULAR_STRING_PART, "abc"),
                (WHITESPACE, "\n"),
                (IDENT, "x"),
            ]
        );
    }

    #[test]
    fn test_field_identifier_and_label() {
        assert_eq!(kinds("$field"), [(FIELD_IDENTIFIER, "$field")]);
        assert_eq!(kinds("this@Outer"), [(THIS_KW, "this"), (AT, "@"), (IDENT, "Outer")]);
    }

    #[test]
    fn test_character_literals() {
        assert_eq!(kinds(r"'a'"), [(CHARACTER_LITERAL, "'a'")]);
        assert_eq!(kinds(r"'\''"), [(CHARACTER_LITERAL, r"'\''")]);
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut tokenizer = Tokenizer::new("x");
        assert_eq!(tokenizer.next_token().kind, IDENT);
        assert_eq!(tokenizer.next_token().kind, EOF);
        assert_eq!(tokenizer.next_token().kind, EOF);
    }

    #[test]
    fn test_nul_is_unknown() {
        assert_eq!(kinds("a\0"), [(IDENT, "a"), (UNKNOWN, "\0")]);
        assert_eq!(kinds("\0"), [(UNKNOWN, "\0")]);
    }
}
