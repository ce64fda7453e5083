use std::any::type_name;

use kt_parse::{FileKind, KtParser, SourceParser};
use kt_yellow::SyntaxKind::{self, *};
use kt_yellow::ast::{
    AnnotationEntry, AstNode, BinaryExpr, Block, CallExpr, Class, ClassBody, ClassObject, Expr,
    ExpressionCodeFragment, Fun, IfExpr, ImportDirective, ImportList, KtFile, LabelQualifier,
    LongStringTemplateEntry, ModifierList, PrimaryConstructor, Property, ReferenceExpr,
    ReturnExpr, StringTemplate, ThisExpr, TypeArgumentList, TypeCodeFragment, TypeReference,
    ValueArgument, ValueArgumentList, ValueParameter, ValueParameterList, WhenEntry,
};
use kt_yellow::{SyntaxNode, SyntaxToken};

use crate::block::{BlockLike, BlockWrapper};
use crate::{ImportPath, SynthesisError, ToFragment};

/// A fixed text whose token at `offset` is the only way to obtain a
/// standalone token of `kind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenScaffold {
    pub text: &'static str,
    pub offset: u32,
    pub kind: SyntaxKind,
}

impl TokenScaffold {
    pub const STAR: Self = Self { text: "val x : List<*>", offset: 13, kind: STAR };
    pub const COMMA: Self = Self { text: "val x : T<X, Y>", offset: 11, kind: COMMA };
    pub const COLON: Self = Self { text: "val x: Int", offset: 5, kind: COLON };
    pub const EQUALS: Self = Self { text: "fun foo() = foo", offset: 10, kind: EQ };
    pub const SEMICOLON: Self = Self { text: "val x: Int;", offset: 10, kind: SEMICOLON };
    pub const WHITESPACE_BEFORE_ARROW: Self =
        Self { text: "val x : () -> Int", offset: 10, kind: WHITESPACE };
    pub const ARROW: Self = Self { text: "val x : () -> Int", offset: 11, kind: ARROW };
    pub const WHITESPACE: Self = Self { text: "val x", offset: 3, kind: WHITESPACE };
    pub const NEWLINE: Self = Self { text: "val\nx", offset: 3, kind: WHITESPACE };
    pub const CONSTRUCTOR_PAREN: Self = Self { text: "class A()", offset: 7, kind: LEFT_PAREN };
}

/// Builds well-formed syntax fragments by parsing minimal source text.
///
/// Every helper wraps its input in a scaffold, parses it once with the
/// factory's parser and extracts the requested node. Input the grammar
/// rejects is a [`SynthesisError`]; a scaffold that does not have the shape it
/// was written for is a bug and panics.
#[derive(Clone, Debug, Default)]
pub struct PsiFactory<P = KtParser> {
    parser: P,
}

impl PsiFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: SourceParser> PsiFactory<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    fn parse(&self, scaffold: &str, kind: FileKind) -> Result<SyntaxNode, SynthesisError> {
        let _span = tracing::debug_span!("synthesize", ?kind, scaffold).entered();

        self.parser.parse(scaffold, kind).ok().map_err(|diagnostics| {
            tracing::debug!(errors = diagnostics.len(), "scaffold rejected");
            SynthesisError::Parse { scaffold: scaffold.to_owned(), diagnostics }
        })
    }

    pub fn file(&self, text: impl ToFragment) -> Result<KtFile, SynthesisError> {
        let text = text.to_fragment();
        let root = self.parse(&text, FileKind::Source)?;
        cast(root, &text)
    }

    /// The single top-level declaration of `text`.
    ///
    /// # Panics
    ///
    /// If `text` parses to anything but exactly one declaration.
    pub fn declaration<T: AstNode>(&self, text: impl ToFragment) -> Result<T, SynthesisError> {
        let text = text.to_fragment();
        let file = self.file(&text)?;
        let mut declarations = file.declarations().collect::<Vec<_>>();
        assert!(
            declarations.len() == 1,
            "{} declarations in `{text}`",
            declarations.len()
        );

        let declaration = declarations.swap_remove(0);
        cast(declaration.syntax().clone(), &text)
    }

    pub fn property(&self, text: impl ToFragment) -> Result<Property, SynthesisError> {
        self.declaration(text)
    }

    /// `val name: Type = initializer`, with the optional parts left out when
    /// absent.
    pub fn property_with(
        &self,
        name: &str,
        ty: Option<&str>,
        is_var: bool,
        initializer: Option<&str>,
    ) -> Result<Property, SynthesisError> {
        let mut text = String::from(if is_var { "var " } else { "val " });
        text.push_str(name);
        if let Some(ty) = ty {
            text.push(':');
            text.push_str(ty);
        }
        if let Some(initializer) = initializer {
            text.push_str(" = ");
            text.push_str(initializer);
        }
        self.property(text)
    }

    pub fn function(&self, text: impl ToFragment) -> Result<Fun, SynthesisError> {
        self.declaration(text)
    }

    pub fn class(&self, text: impl ToFragment) -> Result<Class, SynthesisError> {
        self.declaration(text)
    }

    pub fn val_keyword(&self) -> Result<SyntaxToken, SynthesisError> {
        let property = self.property("val x = 1")?;
        required(property.val_or_var_token(), "`val` keyword", "val x = 1")
    }

    pub fn var_keyword(&self) -> Result<SyntaxToken, SynthesisError> {
        let property = self.property("var x = 1")?;
        required(property.val_or_var_token(), "`var` keyword", "var x = 1")
    }

    /// The `val` or `var` keyword written as `text`.
    pub fn val_or_var_keyword(&self, text: &str) -> Result<SyntaxToken, SynthesisError> {
        let scaffold = format!("({text} x: Int)");
        let parameter = first(self.parameter_list(&scaffold)?.parameters(), &scaffold)?;
        required(parameter.val_or_var_token(), "`val` or `var` keyword", &scaffold)
    }

    /// # Panics
    ///
    /// If the synthesized expression's text differs from `text`.
    pub fn expression(&self, text: impl ToFragment) -> Result<Expr, SynthesisError> {
        let text = text.to_fragment();
        let scaffold = format!("val x = {text}");
        let property = self.property(&scaffold)?;
        let expression = required(property.initializer(), "initializer", &scaffold)?;
        Ok(preserving(expression, &text))
    }

    fn expression_of<T: AstNode>(&self, text: impl ToFragment) -> Result<T, SynthesisError> {
        let text = text.to_fragment();
        let expression = self.expression(&text)?;
        cast(expression.syntax().clone(), &text)
    }

    pub fn call_arguments(&self, text: impl ToFragment) -> Result<ValueArgumentList, SynthesisError> {
        let text = text.to_fragment();
        let scaffold = format!("foo{text}");
        let call = self.expression_of::<CallExpr>(&scaffold)?;
        let arguments = required(call.value_argument_list(), "argument list", &scaffold)?;
        Ok(preserving(arguments, &text))
    }

    pub fn type_arguments(&self, text: impl ToFragment) -> Result<TypeArgumentList, SynthesisError> {
        let text = text.to_fragment();
        let scaffold = format!("foo{text}()");
        let call = self.expression_of::<CallExpr>(&scaffold)?;
        let arguments = required(call.type_argument_list(), "type argument list", &scaffold)?;
        Ok(preserving(arguments, &text))
    }

    /// `name = argument` as a single call argument.
    pub fn argument_with_name(
        &self,
        name: &str,
        argument: impl ToFragment,
    ) -> Result<ValueArgument, SynthesisError> {
        let scaffold = format!("({name} = {})", argument.to_fragment());
        first(self.call_arguments(&scaffold)?.arguments(), &scaffold)
    }

    pub fn type_reference(&self, text: impl ToFragment) -> Result<TypeReference, SynthesisError> {
        let text = text.to_fragment();
        let scaffold = format!("val x : {text}");
        let property = self.property(&scaffold)?;
        let reference = required(property.type_reference(), "type reference", &scaffold)?;
        Ok(preserving(reference, &text))
    }

    /// The token a [`TokenScaffold`] points at.
    ///
    /// # Panics
    ///
    /// If the token found at the offset is not of the scaffold's kind.
    pub fn token(&self, scaffold: &TokenScaffold) -> Result<SyntaxToken, SynthesisError> {
        let root = self.parse(scaffold.text, FileKind::Source)?;
        let token = root.token_at_offset(scaffold.offset.into()).right_biased();

        match token {
            Some(token) if token.kind() == scaffold.kind => Ok(token),
            other => panic!(
                "expected {:?} at offset {} of `{}`, found {other:?}",
                scaffold.kind, scaffold.offset, scaffold.text
            ),
        }
    }

    pub fn star(&self) -> Result<SyntaxToken, SynthesisError> {
        self.token(&TokenScaffold::STAR)
    }

    pub fn comma(&self) -> Result<SyntaxToken, SynthesisError> {
        self.token(&TokenScaffold::COMMA)
    }

    pub fn colon(&self) -> Result<SyntaxToken, SynthesisError> {
        self.token(&TokenScaffold::COLON)
    }

    pub fn equals(&self) -> Result<SyntaxToken, SynthesisError> {
        self.token(&TokenScaffold::EQUALS)
    }

    pub fn semicolon(&self) -> Result<SyntaxToken, SynthesisError> {
        self.token(&TokenScaffold::SEMICOLON)
    }

    /// The first and last element of ` ->`.
    pub fn whitespace_and_arrow(&self) -> Result<(SyntaxToken, SyntaxToken), SynthesisError> {
        Ok((self.token(&TokenScaffold::WHITESPACE_BEFORE_ARROW)?, self.token(&TokenScaffold::ARROW)?))
    }

    pub fn whitespace(&self) -> Result<SyntaxToken, SynthesisError> {
        self.token(&TokenScaffold::WHITESPACE)
    }

    pub fn newline(&self) -> Result<SyntaxToken, SynthesisError> {
        self.token(&TokenScaffold::NEWLINE)
    }

    pub fn name_identifier(&self, name: &str) -> Result<SyntaxToken, SynthesisError> {
        let property = self.property_with(name, None, false, None)?;
        required(property.name_identifier(), "name", name)
    }

    pub fn simple_name(&self, name: &str) -> Result<ReferenceExpr, SynthesisError> {
        let property = self.property_with(name, None, false, Some(name))?;
        let initializer = required(property.initializer(), "initializer", name)?;
        cast(initializer.syntax().clone(), name)
    }

    pub fn identifier(&self, name: &str) -> Result<SyntaxToken, SynthesisError> {
        required(self.simple_name(name)?.identifier(), "identifier", name)
    }

    pub fn modifier_list(&self, text: impl ToFragment) -> Result<ModifierList, SynthesisError> {
        let text = text.to_fragment();
        let scaffold = format!("{text} val x");
        let property = self.property(&scaffold)?;
        let modifiers = required(property.modifier_list(), "modifier list", &scaffold)?;
        Ok(preserving(modifiers, &text))
    }

    /// A modifier list holding the single keyword `modifier`.
    ///
    /// # Panics
    ///
    /// If `modifier` is not a modifier keyword.
    pub fn modifier_list_for(&self, modifier: SyntaxKind) -> Result<ModifierList, SynthesisError> {
        self.modifier_list(modifier_text(modifier))
    }

    pub fn constructor_modifier_list(
        &self,
        modifier: SyntaxKind,
    ) -> Result<ModifierList, SynthesisError> {
        let scaffold = format!("class C {} (){{}}", modifier_text(modifier));
        let class = self.class(&scaffold)?;
        required(class.primary_constructor_modifier_list(), "constructor modifiers", &scaffold)
    }

    pub fn annotation(&self, text: impl ToFragment) -> Result<AnnotationEntry, SynthesisError> {
        let text = text.to_fragment();
        let modifiers = self.modifier_list(&text)?;
        first(modifiers.annotations(), &text)
    }

    pub fn empty_body(&self) -> Result<Block, SynthesisError> {
        let function = self.function("fun foo() {}")?;
        let body = required(function.body_expression(), "body", "fun foo() {}")?;
        cast(body.syntax().clone(), "fun foo() {}")
    }

    pub fn empty_class_body(&self) -> Result<ClassBody, SynthesisError> {
        let class = self.class("class A(){}")?;
        required(class.body(), "class body", "class A(){}")
    }

    pub fn empty_class_object(&self) -> Result<ClassObject, SynthesisError> {
        const SCAFFOLD: &str = "class foo { class object { } }";
        let class = self.class(SCAFFOLD)?;
        required(class.class_object(), "class object", SCAFFOLD)
    }

    pub fn primary_constructor(&self) -> Result<PrimaryConstructor, SynthesisError> {
        let scaffold = TokenScaffold::CONSTRUCTOR_PAREN;
        let paren = self.token(&scaffold)?;
        let constructor = paren.parent_ancestors().find_map(PrimaryConstructor::cast);
        required(constructor, "primary constructor", scaffold.text)
    }

    pub fn parameter(&self, name: &str, ty: &str) -> Result<ValueParameter, SynthesisError> {
        let scaffold = format!("fun foo({name} : {ty}) {{}}");
        let function = self.function(&scaffold)?;
        first(function.value_parameters(), &scaffold)
    }

    pub fn parameter_list(&self, text: impl ToFragment) -> Result<ValueParameterList, SynthesisError> {
        let scaffold = format!("fun foo{}{{}}", text.to_fragment());
        let function = self.function(&scaffold)?;
        required(function.value_parameter_list(), "parameter list", &scaffold)
    }

    /// `fun foo() {\n<body>\n}`'s block.
    pub fn function_body(&self, body: impl ToFragment) -> Result<Expr, SynthesisError> {
        let scaffold = format!("fun foo() {{\n{}\n}}", body.to_fragment());
        let function = self.function(&scaffold)?;
        required(function.body_expression(), "body", &scaffold)
    }

    /// # Panics
    ///
    /// If the synthesized entry's text differs from `text`.
    pub fn when_entry(&self, text: impl ToFragment) -> Result<WhenEntry, SynthesisError> {
        let text = text.to_fragment();
        let scaffold = format!("fun foo() {{ when(12) {{ {text} }} }}");
        let function = self.function(&scaffold)?;
        let entry = function.syntax().descendants().find_map(WhenEntry::cast);
        let entry = required(entry, "when entry", &scaffold)?;

        Ok(preserving(entry, &text))
    }

    /// `"${expression}"`'s only entry.
    pub fn block_string_template_entry(
        &self,
        expression: impl ToFragment,
    ) -> Result<LongStringTemplateEntry, SynthesisError> {
        let scaffold = format!("\"${{{}}}\"", expression.to_fragment());
        let template = self.expression_of::<StringTemplate>(&scaffold)?;
        let entry = template.entries().next();
        let entry = required(entry, "template entry", &scaffold)?;
        cast(entry, &scaffold)
    }

    pub fn import_directive(&self, path: &ImportPath) -> Result<ImportDirective, SynthesisError> {
        if path.is_root() {
            return Err(SynthesisError::EmptyImportPath);
        }

        let mut scaffold = format!("import {}", path.path_str());
        if let Some(alias) = path.alias() {
            scaffold.push_str(" as ");
            scaffold.push_str(alias);
        }

        let file = self.file(&scaffold)?;
        first(file.import_directives(), &scaffold)
    }

    /// The list around a freshly synthesized import directive.
    pub fn import_directive_with_list(
        &self,
        path: &ImportPath,
    ) -> Result<ImportList, SynthesisError> {
        let directive = self.import_directive(path)?;
        let list = directive.syntax().parent().and_then(ImportList::cast);
        required(list, "import list", &path.to_string())
    }

    pub fn class_label(&self, name: &str) -> Result<LabelQualifier, SynthesisError> {
        let scaffold = format!("this@{name}");
        let this = self.expression_of::<ThisExpr>(&scaffold)?;
        required(this.target_label(), "label", &scaffold)
    }

    /// `$name` as a backing-field reference.
    pub fn field_identifier(&self, name: &str) -> Result<Expr, SynthesisError> {
        self.expression(format!("${name}"))
    }

    pub fn binary_expression(
        &self,
        lhs: impl ToFragment,
        op: &str,
        rhs: impl ToFragment,
    ) -> Result<BinaryExpr, SynthesisError> {
        let text = format!("{} {op} {}", lhs.to_fragment(), rhs.to_fragment());
        self.expression_of(text)
    }

    pub fn return_expression(&self, text: impl ToFragment) -> Result<ReturnExpr, SynthesisError> {
        self.expression_of(format!("return {}", text.to_fragment()))
    }

    pub fn if_expression(
        &self,
        condition: impl ToFragment,
        then: impl ToFragment,
        otherwise: Option<impl ToFragment>,
    ) -> Result<IfExpr, SynthesisError> {
        let mut text = format!("if ({}) {}", condition.to_fragment(), then.to_fragment());
        if let Some(otherwise) = otherwise {
            text.push_str(" else ");
            otherwise.write_fragment(&mut text);
        }
        self.expression_of(text)
    }

    pub fn type_code_fragment(
        &self,
        text: impl ToFragment,
    ) -> Result<TypeCodeFragment, SynthesisError> {
        let text = text.to_fragment();
        let root = self.parse(&text, FileKind::Type)?;
        cast(root, &text)
    }

    pub fn expression_code_fragment(
        &self,
        text: impl ToFragment,
    ) -> Result<ExpressionCodeFragment, SynthesisError> {
        let text = text.to_fragment();
        let root = self.parse(&text, FileKind::Expression)?;
        cast(root, &text)
    }

    /// `expression` as a block: itself if it is one, otherwise a wrapper
    /// around `{ expression }`.
    pub fn wrap_in_block(&self, expression: Expr) -> Result<BlockLike, SynthesisError> {
        if let Expr::Block(block) = expression {
            return Ok(BlockLike::Block(block));
        }

        let scaffold = format!("fun f() {{ {}}}", expression.syntax().text());
        let function = self.function(&scaffold)?;
        let body = required(function.body_expression(), "body", &scaffold)?;
        let block = cast(body.syntax().clone(), &scaffold)?;
        Ok(BlockLike::Wrapper(BlockWrapper::new(block, expression)))
    }
}

fn modifier_text(modifier: SyntaxKind) -> &'static str {
    match modifier.modifier_text() {
        Some(text) => text,
        None => panic!("{modifier:?} is not a modifier keyword"),
    }
}

/// Checks that a synthesized node kept exactly the text it was made from.
fn preserving<N: AstNode>(node: N, text: &str) -> N {
    assert_eq!(
        node.syntax().text(),
        text,
        "synthesized {} differs from the given text",
        short_type_name::<N>()
    );
    node
}

fn cast<N: AstNode>(node: SyntaxNode, scaffold: &str) -> Result<N, SynthesisError> {
    let found = node.kind();
    N::cast(node).ok_or_else(|| SynthesisError::UnexpectedKind {
        expected: short_type_name::<N>(),
        found,
        scaffold: scaffold.to_owned(),
    })
}

fn short_type_name<N>() -> &'static str {
    let name = type_name::<N>();
    name.rsplit("::").next().unwrap_or(name)
}

fn required<T>(value: Option<T>, what: &'static str, scaffold: &str) -> Result<T, SynthesisError> {
    value.ok_or_else(|| SynthesisError::Missing { what, scaffold: scaffold.to_owned() })
}

fn first<T>(mut items: impl Iterator<Item = T>, scaffold: &str) -> Result<T, SynthesisError> {
    required(items.next(), "element", scaffold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_text(scaffold: TokenScaffold) -> String {
        PsiFactory::new().token(&scaffold).unwrap().text().to_owned()
    }

    #[test]
    fn star_scaffold() {
        assert_eq!(token_text(TokenScaffold::STAR), "*");
    }

    #[test]
    fn comma_scaffold() {
        assert_eq!(token_text(TokenScaffold::COMMA), ",");
    }

    #[test]
    fn colon_scaffold() {
        assert_eq!(token_text(TokenScaffold::COLON), ":");
    }

    #[test]
    fn equals_scaffold() {
        assert_eq!(token_text(TokenScaffold::EQUALS), "=");
    }

    #[test]
    fn semicolon_scaffold() {
        assert_eq!(token_text(TokenScaffold::SEMICOLON), ";");
    }

    #[test]
    fn whitespace_before_arrow_scaffold() {
        assert_eq!(token_text(TokenScaffold::WHITESPACE_BEFORE_ARROW), " ");
    }

    #[test]
    fn arrow_scaffold() {
        assert_eq!(token_text(TokenScaffold::ARROW), "->");
    }

    #[test]
    fn whitespace_scaffold() {
        assert_eq!(token_text(TokenScaffold::WHITESPACE), " ");
    }

    #[test]
    fn newline_scaffold() {
        assert_eq!(token_text(TokenScaffold::NEWLINE), "\n");
    }

    #[test]
    fn constructor_paren_scaffold() {
        assert_eq!(token_text(TokenScaffold::CONSTRUCTOR_PAREN), "(");
    }

    #[test]
    fn short_type_names() {
        assert_eq!(short_type_name::<Property>(), "Property");
    }
}
