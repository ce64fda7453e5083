use drop_bomb::DropBomb;
use kt_errors::Diagnostic;
use kt_tokenizer::Token;
use kt_yellow::SyntaxKind::{self, *};
use kt_yellow::{Builder, GreenNode, SyntaxSet};

pub(crate) struct Parser<'t> {
    text: &'t str,
    tokens: Vec<Token>,
    /// Indices of non-trivia tokens into `tokens`; the last one is `EOF`.
    significant: Vec<u32>,
    pos: usize,
    events: Vec<Event>,
    errors: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(text: &'t str) -> Self {
        let tokens = kt_tokenizer::tokenize(text);
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| !token.kind.is_trivia())
            .map(|(index, _)| index as u32)
            .collect();

        Self { text, tokens, significant, pos: 0, events: Vec::new(), errors: Vec::new() }
    }

    fn token(&self, n: usize) -> Token {
        let index = self.significant.get(self.pos + n).or(self.significant.last());
        index.map_or(Token { kind: EOF, range: Default::default() }, |&index| {
            self.tokens[index as usize]
        })
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.token(n).kind
    }

    pub(crate) fn current_text(&self) -> &'t str {
        &self.text[self.token(0).range]
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    fn trivia_before(&self) -> &[Token] {
        let Some(&current) = self.significant.get(self.pos) else {
            return &[];
        };
        let start = match self.pos.checked_sub(1) {
            Some(previous) => self.significant[previous] as usize + 1,
            None => 0,
        };
        &self.tokens[start..current as usize]
    }

    /// Whether a line break separates the current token from the previous one.
    pub(crate) fn has_newline_before(&self) -> bool {
        self.trivia_before().iter().any(|token| {
            token.kind == WHITESPACE && self.text[token.range].contains('\n')
        })
    }

    pub(crate) fn has_trivia_before(&self) -> bool {
        !self.trivia_before().is_empty()
    }

    pub(crate) fn advance(&mut self) {
        let kind = self.peek_kind();
        self.advance_as(kind);
    }

    /// Consumes the current token, recording it under `kind`.
    pub(crate) fn advance_as(&mut self, kind: SyntaxKind) {
        if self.peek_kind() == EOF {
            return;
        }

        self.pos += 1;
        self.events.push(Event::Token { kind });
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.advance();
        true
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(&format!("expected {}", describe(kind)));
        false
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn error(&mut self, message: &str) {
        let range = self.token(0).range;
        self.errors.push(Diagnostic::error(message, range));
    }

    pub(crate) fn error_and_bump(&mut self, message: &str) {
        let m = self.start();
        self.error(message);
        self.advance();
        m.complete(self, ERROR);
    }

    /// Reports an error and skips the current token unless it belongs to
    /// `recovery` or closes an enclosing construct.
    pub(crate) fn error_recover(&mut self, message: &str, recovery: &SyntaxSet) {
        if self.at_set(recovery) || self.at_set(&CLOSERS) {
            self.error(message);
        } else {
            self.error_and_bump(message);
        }
    }

    /// Finds the `n` of the token closing the bracket at `n = 0`.
    pub(crate) fn matching_close(&self, open: SyntaxKind, close: SyntaxKind) -> Option<usize> {
        let mut depth = 0u32;
        for n in 0.. {
            match self.nth(n) {
                EOF => return None,
                kind if kind == open => depth += 1,
                kind if kind == close => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(n);
                    }
                }
                _ => {}
            }
        }
        None
    }

    pub(crate) fn finish(self) -> (GreenNode, Vec<Diagnostic>) {
        let Parser { text, tokens, significant: _, pos: _, mut events, errors } = self;
        let mut sink = TreeSink { text, tokens: &tokens, cursor: 0, builder: Builder::new() };
        let mut forward_parents = Vec::new();
        let mut depth = 0usize;

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    if depth > 0 {
                        sink.flush_trivia();
                    }
                    for kind in forward_parents.drain(..).rev() {
                        sink.builder.start_node(kind);
                        depth += 1;
                    }
                }
                Event::Finish => {
                    depth -= 1;
                    if depth == 0 {
                        sink.flush_rest();
                    }
                    sink.builder.finish_node();
                }
                Event::Token { kind } => {
                    sink.flush_trivia();
                    sink.token(kind);
                }
            }
        }

        (sink.builder.finish(), errors)
    }
}

/// Replays raw tokens into the builder; trivia go to whichever node is open
/// when the next significant token or node starts.
struct TreeSink<'a> {
    text: &'a str,
    tokens: &'a [Token],
    cursor: usize,
    builder: Builder,
}

impl TreeSink<'_> {
    fn flush_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor)
            && token.kind.is_trivia()
        {
            self.builder.token(token.kind, &self.text[token.range]);
            self.cursor += 1;
        }
    }

    fn token(&mut self, kind: SyntaxKind) {
        let token = self.tokens[self.cursor];
        self.builder.token(kind, &self.text[token.range]);
        self.cursor += 1;
    }

    fn flush_rest(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if token.kind != EOF {
                self.builder.token(token.kind, &self.text[token.range]);
            }
            self.cursor += 1;
        }
    }
}

const CLOSERS: SyntaxSet =
    SyntaxSet::new([RIGHT_BRACE, RIGHT_PAREN, RIGHT_BRACKET, LONG_TEMPLATE_ENTRY_END, EOF]);

fn describe(kind: SyntaxKind) -> String {
    let text = match kind {
        LEFT_PAREN => "'('",
        RIGHT_PAREN => "')'",
        LEFT_BRACE => "'{'",
        RIGHT_BRACE | LONG_TEMPLATE_ENTRY_END => "'}'",
        RIGHT_BRACKET => "']'",
        GT => "'>'",
        COLON => "':'",
        COMMA => "','",
        ARROW => "'->'",
        EQ => "'='",
        IDENT => "an identifier",
        _ => return format!("{kind:?}"),
    };
    text.to_owned()
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token { kind: SyntaxKind },
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Marker {
        Marker {
            position: pos,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }

    /// Drops the node; its children stay in the enclosing node.
    pub(crate) fn abandon(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();

        if self.position as usize == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Start { kind: TOMBSTONE, forward_parent: None }) => {}
                _ => unreachable!(),
            }
        }
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        CompletedMarker { pos }
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
