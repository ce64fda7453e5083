use kt_yellow::ast::{self, AstNode};
use kt_yellow::{SyntaxNode, SyntaxToken};

/// Source text that can be spliced into a scaffold.
///
/// Existing nodes render as their own text and an absent value renders as
/// nothing, so helpers accept plain text and tree pieces alike.
pub trait ToFragment {
    fn write_fragment(&self, out: &mut String);

    fn to_fragment(&self) -> String {
        let mut out = String::new();
        self.write_fragment(&mut out);
        out
    }
}

impl ToFragment for str {
    fn write_fragment(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl ToFragment for String {
    fn write_fragment(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl ToFragment for SyntaxNode {
    fn write_fragment(&self, out: &mut String) {
        out.push_str(&self.text());
    }
}

impl ToFragment for SyntaxToken {
    fn write_fragment(&self, out: &mut String) {
        out.push_str(self.text());
    }
}

impl<T: ToFragment + ?Sized> ToFragment for &T {
    fn write_fragment(&self, out: &mut String) {
        (**self).write_fragment(out);
    }
}

impl<T: ToFragment> ToFragment for Option<T> {
    fn write_fragment(&self, out: &mut String) {
        if let Some(fragment) = self {
            fragment.write_fragment(out);
        }
    }
}

macro_rules! ast_fragments {
    ($($ty:ident),* $(,)?) => {$(
        impl ToFragment for ast::$ty {
            fn write_fragment(&self, out: &mut String) {
                out.push_str(&self.syntax().text());
            }
        }
    )*};
}

ast_fragments! {
    Expr,
    Declaration,
    TypeElement,
    TypeReference,
    UserType,
    Block,
    Literal,
    StringTemplate,
    ReferenceExpr,
    ThisExpr,
    ParenExpr,
    CallExpr,
    DotQualifiedExpr,
    SafeAccessExpr,
    BinaryExpr,
    BinaryWithType,
    IsExpr,
    IfExpr,
    WhenExpr,
    WhenEntry,
    ReturnExpr,
    ValueArgument,
    ValueArgumentList,
    TypeArgumentList,
    ModifierList,
    AnnotationEntry,
    Class,
    Fun,
    Property,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_renders_empty() {
        let absent: Option<&str> = None;
        assert_eq!(absent.to_fragment(), "");
        assert_eq!(Some("x + 1").to_fragment(), "x + 1");
    }
}
