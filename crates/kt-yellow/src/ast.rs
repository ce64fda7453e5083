use crate::SyntaxKind::{self, *};
use crate::{SyntaxElement, SyntaxNode, SyntaxToken};

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(syntax: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;

    fn text(&self) -> String {
        self.syntax().text()
    }
}

fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<N: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = N> + use<N> {
    parent.children().filter_map(N::cast)
}

fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent.token_of_kind(kind)
}

macro_rules! ast_node {
    ($($name:ident => $kind:ident),* $(,)?) => {$(
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == $kind
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self(syntax))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    )*};
}

macro_rules! ast_enum {
    ($name:ident { $($variant:ident($node:ident)),* $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($node),)*
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                $($node::can_cast(kind))||*
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                $(if $node::can_cast(syntax.kind()) {
                    return Some(Self::$variant($node(syntax)));
                })*
                None
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$variant(it) => it.syntax(),)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(self.syntax(), f)
            }
        }

        $(impl From<$node> for $name {
            fn from(node: $node) -> Self {
                Self::$variant(node)
            }
        })*
    };
}

ast_node! {
    KtFile => FILE,
    TypeCodeFragment => TYPE_CODE_FRAGMENT,
    ExpressionCodeFragment => EXPRESSION_CODE_FRAGMENT,
    PackageDirective => PACKAGE_DIRECTIVE,
    ImportList => IMPORT_LIST,
    ImportDirective => IMPORT_DIRECTIVE,
    ImportAlias => IMPORT_ALIAS,
    Class => CLASS,
    ClassBody => CLASS_BODY,
    ClassObject => CLASS_OBJECT,
    PrimaryConstructor => PRIMARY_CONSTRUCTOR,
    SuperTypeList => SUPER_TYPE_LIST,
    Fun => FUN,
    Property => PROPERTY,
    TypeParameterList => TYPE_PARAMETER_LIST,
    TypeParameter => TYPE_PARAMETER,
    ValueParameterList => VALUE_PARAMETER_LIST,
    ValueParameter => VALUE_PARAMETER,
    ModifierList => MODIFIER_LIST,
    AnnotationEntry => ANNOTATION_ENTRY,
    TypeReference => TYPE_REFERENCE,
    UserType => USER_TYPE,
    NullableType => NULLABLE_TYPE,
    FunctionType => FUNCTION_TYPE,
    TypeArgumentList => TYPE_ARGUMENT_LIST,
    TypeProjection => TYPE_PROJECTION,
    Block => BLOCK,
    Literal => LITERAL,
    StringTemplate => STRING_TEMPLATE,
    LongStringTemplateEntry => LONG_STRING_TEMPLATE_ENTRY,
    ReferenceExpr => REFERENCE_EXPR,
    ThisExpr => THIS_EXPR,
    LabelQualifier => LABEL_QUALIFIER,
    ParenExpr => PAREN_EXPR,
    CallExpr => CALL_EXPR,
    ValueArgumentList => VALUE_ARGUMENT_LIST,
    ValueArgument => VALUE_ARGUMENT,
    DotQualifiedExpr => DOT_QUALIFIED_EXPR,
    SafeAccessExpr => SAFE_ACCESS_EXPR,
    ArrayAccessExpr => ARRAY_ACCESS_EXPR,
    PostfixExpr => POSTFIX_EXPR,
    PrefixExpr => PREFIX_EXPR,
    BinaryExpr => BINARY_EXPR,
    BinaryWithType => BINARY_WITH_TYPE,
    IsExpr => IS_EXPR,
    IfExpr => IF_EXPR,
    WhenExpr => WHEN_EXPR,
    WhenEntry => WHEN_ENTRY,
    ReturnExpr => RETURN_EXPR,
}

ast_enum!(Declaration {
    Class(Class),
    Fun(Fun),
    Property(Property),
});

ast_enum!(TypeElement {
    User(UserType),
    Nullable(NullableType),
    Function(FunctionType),
});

ast_enum!(Expr {
    Literal(Literal),
    StringTemplate(StringTemplate),
    Reference(ReferenceExpr),
    This(ThisExpr),
    Paren(ParenExpr),
    Call(CallExpr),
    DotQualified(DotQualifiedExpr),
    SafeAccess(SafeAccessExpr),
    ArrayAccess(ArrayAccessExpr),
    Postfix(PostfixExpr),
    Prefix(PrefixExpr),
    Binary(BinaryExpr),
    BinaryWithType(BinaryWithType),
    Is(IsExpr),
    If(IfExpr),
    When(WhenExpr),
    Return(ReturnExpr),
    Block(Block),
});

impl KtFile {
    pub fn package_directive(&self) -> Option<PackageDirective> {
        child(&self.0)
    }

    pub fn import_list(&self) -> Option<ImportList> {
        child(&self.0)
    }

    pub fn import_directives(&self) -> impl Iterator<Item = ImportDirective> + use<> {
        self.import_list().into_iter().flat_map(|list| list.directives())
    }

    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + use<> {
        children(&self.0)
    }
}

impl TypeCodeFragment {
    pub fn type_reference(&self) -> Option<TypeReference> {
        child(&self.0)
    }
}

impl ExpressionCodeFragment {
    pub fn expression(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl PackageDirective {
    /// Dotted package name as written, without trivia.
    pub fn fq_name(&self) -> String {
        dotted_name(&self.0)
    }
}

impl ImportList {
    pub fn directives(&self) -> impl Iterator<Item = ImportDirective> + use<> {
        children(&self.0)
    }
}

impl ImportDirective {
    /// The imported name, excluding a trailing `.*`.
    pub fn imported_fq_name(&self) -> String {
        dotted_name(&self.0)
    }

    pub fn is_all_under(&self) -> bool {
        token(&self.0, STAR).is_some()
    }

    pub fn alias(&self) -> Option<ImportAlias> {
        child(&self.0)
    }

    pub fn alias_name(&self) -> Option<String> {
        self.alias()?.name_identifier().map(|ident| ident.text().to_owned())
    }
}

impl ImportAlias {
    pub fn name_identifier(&self) -> Option<SyntaxToken> {
        token(&self.0, IDENT)
    }
}

fn dotted_name(node: &SyntaxNode) -> String {
    let mut name = String::new();
    for token in node.children_with_tokens().filter_map(SyntaxElement::into_token) {
        match token.kind() {
            IDENT => name.push_str(token.text()),
            DOT => name.push('.'),
            _ => {}
        }
    }
    name.trim_end_matches('.').to_owned()
}

impl Declaration {
    pub fn name_identifier(&self) -> Option<SyntaxToken> {
        token(self.syntax(), IDENT)
    }

    pub fn name(&self) -> Option<String> {
        self.name_identifier().map(|ident| ident.text().to_owned())
    }

    pub fn modifier_list(&self) -> Option<ModifierList> {
        child(self.syntax())
    }
}

impl Class {
    pub fn name_identifier(&self) -> Option<SyntaxToken> {
        token(&self.0, IDENT)
    }

    pub fn modifier_list(&self) -> Option<ModifierList> {
        child(&self.0)
    }

    pub fn type_parameter_list(&self) -> Option<TypeParameterList> {
        child(&self.0)
    }

    pub fn primary_constructor(&self) -> Option<PrimaryConstructor> {
        child(&self.0)
    }

    pub fn primary_constructor_modifier_list(&self) -> Option<ModifierList> {
        self.primary_constructor()?.modifier_list()
    }

    pub fn super_type_list(&self) -> Option<SuperTypeList> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<ClassBody> {
        child(&self.0)
    }

    pub fn class_object(&self) -> Option<ClassObject> {
        self.body()?.class_object()
    }
}

impl ClassBody {
    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + use<> {
        children(&self.0)
    }

    pub fn class_object(&self) -> Option<ClassObject> {
        child(&self.0)
    }
}

impl ClassObject {
    pub fn body(&self) -> Option<ClassBody> {
        child(&self.0)
    }
}

impl PrimaryConstructor {
    pub fn modifier_list(&self) -> Option<ModifierList> {
        child(&self.0)
    }

    pub fn value_parameter_list(&self) -> Option<ValueParameterList> {
        child(&self.0)
    }
}

impl SuperTypeList {
    pub fn type_references(&self) -> impl Iterator<Item = TypeReference> + use<> {
        self.0.descendants().filter_map(TypeReference::cast)
    }
}

impl Fun {
    pub fn name_identifier(&self) -> Option<SyntaxToken> {
        token(&self.0, IDENT)
    }

    pub fn modifier_list(&self) -> Option<ModifierList> {
        child(&self.0)
    }

    pub fn type_parameter_list(&self) -> Option<TypeParameterList> {
        child(&self.0)
    }

    pub fn value_parameter_list(&self) -> Option<ValueParameterList> {
        child(&self.0)
    }

    pub fn value_parameters(&self) -> impl Iterator<Item = ValueParameter> + use<> {
        self.value_parameter_list().into_iter().flat_map(|list| list.parameters())
    }

    pub fn return_type(&self) -> Option<TypeReference> {
        child(&self.0)
    }

    pub fn equals_token(&self) -> Option<SyntaxToken> {
        token(&self.0, EQ)
    }

    /// Either the block body or the expression after `=`.
    pub fn body_expression(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl Property {
    pub fn val_or_var_token(&self) -> Option<SyntaxToken> {
        token(&self.0, VAL_KW).or_else(|| token(&self.0, VAR_KW))
    }

    pub fn is_var(&self) -> bool {
        token(&self.0, VAR_KW).is_some()
    }

    pub fn name_identifier(&self) -> Option<SyntaxToken> {
        token(&self.0, IDENT)
    }

    pub fn modifier_list(&self) -> Option<ModifierList> {
        child(&self.0)
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        child(&self.0)
    }

    pub fn initializer(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl TypeParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = TypeParameter> + use<> {
        children(&self.0)
    }
}

impl ValueParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = ValueParameter> + use<> {
        children(&self.0)
    }
}

impl ValueParameter {
    pub fn val_or_var_token(&self) -> Option<SyntaxToken> {
        token(&self.0, VAL_KW).or_else(|| token(&self.0, VAR_KW))
    }

    pub fn name_identifier(&self) -> Option<SyntaxToken> {
        token(&self.0, IDENT)
    }

    pub fn modifier_list(&self) -> Option<ModifierList> {
        child(&self.0)
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        child(&self.0)
    }
}

impl ModifierList {
    pub fn annotations(&self) -> impl Iterator<Item = AnnotationEntry> + use<> {
        children(&self.0)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.0
            .children_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .filter(|token| token.kind().is_modifier())
    }

    pub fn has_modifier(&self, kind: SyntaxKind) -> bool {
        self.modifiers().any(|token| token.kind() == kind)
    }
}

impl AnnotationEntry {
    pub fn type_reference(&self) -> Option<TypeReference> {
        child(&self.0)
    }

    pub fn value_argument_list(&self) -> Option<ValueArgumentList> {
        child(&self.0)
    }
}

impl TypeReference {
    pub fn type_element(&self) -> Option<TypeElement> {
        child(&self.0)
    }
}

impl UserType {
    pub fn qualifier(&self) -> Option<UserType> {
        child(&self.0)
    }

    pub fn reference_expression(&self) -> Option<ReferenceExpr> {
        child(&self.0)
    }

    pub fn referenced_name(&self) -> Option<String> {
        self.reference_expression()?.identifier().map(|ident| ident.text().to_owned())
    }

    pub fn type_argument_list(&self) -> Option<TypeArgumentList> {
        child(&self.0)
    }
}

impl NullableType {
    pub fn inner_type(&self) -> Option<TypeElement> {
        child(&self.0)
    }
}

impl FunctionType {
    pub fn parameter_list(&self) -> Option<ValueParameterList> {
        child(&self.0)
    }

    pub fn return_type(&self) -> Option<TypeReference> {
        child(&self.0)
    }
}

impl TypeArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = TypeProjection> + use<> {
        children(&self.0)
    }
}

impl TypeProjection {
    pub fn is_star(&self) -> bool {
        token(&self.0, STAR).is_some()
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        child(&self.0)
    }
}

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.0.children()
    }

    pub fn left_brace(&self) -> Option<SyntaxToken> {
        token(&self.0, LEFT_BRACE)
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.first_significant_token()
    }
}

impl StringTemplate {
    pub fn entries(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.0.children()
    }
}

impl LongStringTemplateEntry {
    pub fn expression(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl ReferenceExpr {
    /// An identifier or a `$field` identifier.
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token(&self.0, IDENT).or_else(|| token(&self.0, FIELD_IDENTIFIER))
    }
}

impl ThisExpr {
    pub fn target_label(&self) -> Option<LabelQualifier> {
        child(&self.0)
    }
}

impl LabelQualifier {
    pub fn name(&self) -> Option<String> {
        token(&self.0, IDENT).map(|ident| ident.text().to_owned())
    }
}

impl ParenExpr {
    pub fn expression(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn type_argument_list(&self) -> Option<TypeArgumentList> {
        child(&self.0)
    }

    pub fn value_argument_list(&self) -> Option<ValueArgumentList> {
        child(&self.0)
    }
}

impl ValueArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = ValueArgument> + use<> {
        children(&self.0)
    }
}

impl ValueArgument {
    pub fn argument_name(&self) -> Option<String> {
        let name = self.0.child_of_kind(VALUE_ARGUMENT_NAME)?;
        let reference = child::<ReferenceExpr>(&name)?;
        reference.identifier().map(|ident| ident.text().to_owned())
    }

    pub fn expression(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl DotQualifiedExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn selector(&self) -> Option<Expr> {
        children(&self.0).nth(1)
    }
}

impl SafeAccessExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn selector(&self) -> Option<Expr> {
        children(&self.0).nth(1)
    }
}

impl PrefixExpr {
    pub fn op(&self) -> Option<SyntaxToken> {
        self.0.first_significant_token()
    }

    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl PostfixExpr {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .find(|token| !token.is_trivia())
    }
}

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        child(&self.0)
    }

    /// The operator token, an identifier for infix calls.
    pub fn op(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .find(|token| !token.is_trivia())
    }

    pub fn rhs(&self) -> Option<Expr> {
        children(&self.0).nth(1)
    }
}

impl BinaryWithType {
    pub fn lhs(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        child(&self.0)
    }
}

impl IsExpr {
    pub fn lhs(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn is_negated(&self) -> bool {
        token(&self.0, NOT_IS).is_some()
    }

    pub fn type_reference(&self) -> Option<TypeReference> {
        child(&self.0)
    }
}

impl IfExpr {
    pub fn condition(&self) -> Option<Expr> {
        self.0.child_of_kind(CONDITION).and_then(|node| child(&node))
    }

    pub fn then_branch(&self) -> Option<Expr> {
        self.0.child_of_kind(THEN_BRANCH).and_then(|node| child(&node))
    }

    pub fn else_branch(&self) -> Option<Expr> {
        self.0.child_of_kind(ELSE_BRANCH).and_then(|node| child(&node))
    }
}

impl WhenExpr {
    pub fn subject(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn entries(&self) -> impl Iterator<Item = WhenEntry> + use<> {
        children(&self.0)
    }
}

impl WhenEntry {
    pub fn is_else(&self) -> bool {
        token(&self.0, ELSE_KW).is_some()
    }

    pub fn conditions(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.0.children().filter(|node| {
            matches!(node.kind(), WHEN_CONDITION_EXPR | WHEN_CONDITION_IS | WHEN_CONDITION_IN)
        })
    }

    pub fn expression(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl ReturnExpr {
    pub fn returned_expression(&self) -> Option<Expr> {
        child(&self.0)
    }
}
