use kt_errors::Diagnostic;
use kt_yellow::{GreenNode, SyntaxNode};

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// Which root rule a text is parsed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Package header, imports and declarations.
    Source,
    /// A single expression.
    Expression,
    /// A single type reference.
    Type,
}

/// Result of parsing: a complete tree plus whatever went wrong along the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<Diagnostic>,
}

impl Parse {
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// The root node when the text parsed without errors.
    pub fn ok(self) -> Result<SyntaxNode, Vec<Diagnostic>> {
        if self.errors.is_empty() { Ok(self.syntax_node()) } else { Err(self.errors) }
    }
}

pub fn parse(text: &str, kind: FileKind) -> Parse {
    let mut parser = parser::Parser::new(text);
    match kind {
        FileKind::Source => grammar::items::file(&mut parser),
        FileKind::Expression => grammar::items::expression_code_fragment(&mut parser),
        FileKind::Type => grammar::items::type_code_fragment(&mut parser),
    }
    let (green, errors) = parser.finish();
    Parse { green, errors }
}

pub fn parse_file(text: &str) -> Parse {
    parse(text, FileKind::Source)
}

/// Turns source text into a syntax tree.
pub trait SourceParser {
    fn parse(&self, text: &str, kind: FileKind) -> Parse;
}

/// The recursive-descent parser of this crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct KtParser;

impl SourceParser for KtParser {
    fn parse(&self, text: &str, kind: FileKind) -> Parse {
        parse(text, kind)
    }
}

impl<P: SourceParser + ?Sized> SourceParser for &P {
    fn parse(&self, text: &str, kind: FileKind) -> Parse {
        (**self).parse(text, kind)
    }
}
