use kt_errors::Diagnostic;
use kt_yellow::SyntaxKind;

/// Input errors of fragment synthesis.
///
/// Broken invariants of the scaffolds themselves are not reported here; they
/// panic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("`{scaffold}` does not parse: {}", first_message(.diagnostics))]
    Parse { scaffold: String, diagnostics: Vec<Diagnostic> },

    #[error("import path must not be empty")]
    EmptyImportPath,

    #[error("expected {expected} in `{scaffold}`, found {found:?}")]
    UnexpectedKind { expected: &'static str, found: SyntaxKind, scaffold: String },

    #[error("`{scaffold}` has no {what}")]
    Missing { what: &'static str, scaffold: String },
}

fn first_message(diagnostics: &[Diagnostic]) -> &str {
    diagnostics.first().map_or("no diagnostics", Diagnostic::message)
}
