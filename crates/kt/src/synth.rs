use clap::ValueEnum;
use kt_psi::{ImportPath, PsiFactory, SynthesisError};
use kt_yellow::SyntaxNode;
use kt_yellow::ast::{AstNode as _, Declaration};

/// What `kt synth` builds from its text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Template {
    File,
    Declaration,
    Expression,
    Type,
    CallArguments,
    TypeArguments,
    ModifierList,
    ParameterList,
    WhenEntry,
    Import,
    TemplateEntry,
    TypeFragment,
    ExpressionFragment,
}

pub(crate) fn synthesize(
    factory: &PsiFactory,
    template: Template,
    text: &str,
) -> Result<SyntaxNode, SynthesisError> {
    let node = match template {
        Template::File => factory.file(text)?.syntax().clone(),
        Template::Declaration => factory.declaration::<Declaration>(text)?.syntax().clone(),
        Template::Expression => factory.expression(text)?.syntax().clone(),
        Template::Type => factory.type_reference(text)?.syntax().clone(),
        Template::CallArguments => factory.call_arguments(text)?.syntax().clone(),
        Template::TypeArguments => factory.type_arguments(text)?.syntax().clone(),
        Template::ModifierList => factory.modifier_list(text)?.syntax().clone(),
        Template::ParameterList => factory.parameter_list(text)?.syntax().clone(),
        Template::WhenEntry => factory.when_entry(text)?.syntax().clone(),
        Template::Import => factory.import_directive(&ImportPath::parse(text))?.syntax().clone(),
        Template::TemplateEntry => factory.block_string_template_entry(text)?.syntax().clone(),
        Template::TypeFragment => factory.type_code_fragment(text)?.syntax().clone(),
        Template::ExpressionFragment => factory.expression_code_fragment(text)?.syntax().clone(),
    };
    Ok(node)
}
