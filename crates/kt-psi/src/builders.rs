//! Text builders for `if`/`else if` chains and `when` expressions.
//!
//! Each builder is a phase-tagged value: a call that is illegal in the current
//! phase does not exist on that phase's type. Finishing a builder yields a
//! frozen value that parses its text at most once.

use std::cell::OnceCell;
use std::marker::PhantomData;

use kt_parse::SourceParser;
use kt_yellow::ast::{AstNode, IfExpr, WhenExpr};

use crate::{PsiFactory, SynthesisError, ToFragment};

/// No branch yet.
#[derive(Debug)]
pub struct Empty;

/// At least one `if` branch, no `else` yet.
#[derive(Debug)]
pub struct Open;

/// Ends with an `else` branch.
#[derive(Debug)]
pub struct Closed;

#[derive(Debug)]
pub struct IfChainBuilder<S = Empty> {
    text: String,
    state: PhantomData<S>,
}

impl Default for IfChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> IfChainBuilder<S> {
    fn into_state<T>(self) -> IfChainBuilder<T> {
        IfChainBuilder { text: self.text, state: PhantomData }
    }

    fn push_if(&mut self, condition: impl ToFragment, expression: impl ToFragment) {
        self.text.push_str("if (");
        condition.write_fragment(&mut self.text);
        self.text.push_str(") ");
        expression.write_fragment(&mut self.text);
        self.text.push('\n');
    }
}

impl IfChainBuilder {
    pub fn new() -> Self {
        Self { text: String::new(), state: PhantomData }
    }

    pub fn if_branch(
        mut self,
        condition: impl ToFragment,
        expression: impl ToFragment,
    ) -> IfChainBuilder<Open> {
        self.push_if(condition, expression);
        self.into_state()
    }
}

impl IfChainBuilder<Open> {
    /// Appends `else if (condition) expression`.
    pub fn if_branch(mut self, condition: impl ToFragment, expression: impl ToFragment) -> Self {
        self.text.push_str("else ");
        self.push_if(condition, expression);
        self
    }

    pub fn else_branch(mut self, expression: impl ToFragment) -> IfChainBuilder<Closed> {
        self.text.push_str("else ");
        expression.write_fragment(&mut self.text);
        self.into_state()
    }

    pub fn freeze(self) -> FrozenIf {
        FrozenIf::new(self.text)
    }
}

impl IfChainBuilder<Closed> {
    pub fn freeze(self) -> FrozenIf {
        FrozenIf::new(self.text)
    }
}

/// Between `when` entries.
#[derive(Debug)]
pub struct Ready;

/// Collecting the conditions of an entry.
#[derive(Debug)]
pub struct InCondition;

#[derive(Debug)]
pub struct WhenBuilder<S = Ready> {
    text: String,
    state: PhantomData<S>,
}

impl Default for WhenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> WhenBuilder<S> {
    fn into_state<T>(self) -> WhenBuilder<T> {
        WhenBuilder { text: self.text, state: PhantomData }
    }
}

impl WhenBuilder {
    pub fn new() -> Self {
        Self { text: "when { ".to_owned(), state: PhantomData }
    }

    pub fn with_subject(subject: impl ToFragment) -> Self {
        let mut text = "when (".to_owned();
        subject.write_fragment(&mut text);
        text.push_str(") { ");
        Self { text, state: PhantomData }
    }

    /// Starts an entry with its first condition.
    pub fn condition(mut self, condition: impl ToFragment) -> WhenBuilder<InCondition> {
        condition.write_fragment(&mut self.text);
        self.into_state()
    }

    /// Starts an entry with an `is Type` or `!is Type` condition.
    pub fn pattern(self, type_reference: impl ToFragment, negated: bool) -> WhenBuilder<InCondition> {
        self.condition(prefixed(if negated { "!is" } else { "is" }, type_reference))
    }

    /// Starts an entry with an `in range` or `!in range` condition.
    pub fn range(self, range: impl ToFragment, negated: bool) -> WhenBuilder<InCondition> {
        self.condition(prefixed(if negated { "!in" } else { "in" }, range))
    }

    /// Appends a complete entry written out as text.
    pub fn entry(mut self, entry: impl ToFragment) -> Self {
        entry.write_fragment(&mut self.text);
        self.text.push('\n');
        self
    }

    pub fn else_entry(self, expression: impl ToFragment) -> Self {
        self.entry(prefixed("else ->", expression))
    }

    /// Closes the brace.
    pub fn freeze(mut self) -> FrozenWhen {
        self.text.push('}');
        FrozenWhen { text: self.text, expression: OnceCell::new() }
    }
}

impl WhenBuilder<InCondition> {
    pub fn condition(mut self, condition: impl ToFragment) -> Self {
        self.text.push_str(", ");
        condition.write_fragment(&mut self.text);
        self
    }

    pub fn pattern(self, type_reference: impl ToFragment, negated: bool) -> Self {
        self.condition(prefixed(if negated { "!is" } else { "is" }, type_reference))
    }

    pub fn range(self, range: impl ToFragment, negated: bool) -> Self {
        self.condition(prefixed(if negated { "!in" } else { "in" }, range))
    }

    /// Ends the entry with `-> expression`.
    pub fn branch_expression(mut self, expression: impl ToFragment) -> WhenBuilder<Ready> {
        self.text.push_str(" -> ");
        expression.write_fragment(&mut self.text);
        self.text.push('\n');
        self.into_state()
    }
}

fn prefixed(prefix: &str, fragment: impl ToFragment) -> String {
    let mut text = format!("{prefix} ");
    fragment.write_fragment(&mut text);
    text
}

/// A finished `if` chain.
#[derive(Debug, Clone)]
pub struct FrozenIf {
    text: String,
    expression: OnceCell<IfExpr>,
}

impl FrozenIf {
    fn new(text: String) -> Self {
        Self { text, expression: OnceCell::new() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parses the chain on first use; later calls return the same node.
    pub fn to_expression<P: SourceParser>(
        &self,
        factory: &PsiFactory<P>,
    ) -> Result<IfExpr, SynthesisError> {
        cached(&self.expression, &self.text, factory)
    }
}

/// A finished `when` expression.
#[derive(Debug, Clone)]
pub struct FrozenWhen {
    text: String,
    expression: OnceCell<WhenExpr>,
}

impl FrozenWhen {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parses the expression on first use; later calls return the same node.
    pub fn to_expression<P: SourceParser>(
        &self,
        factory: &PsiFactory<P>,
    ) -> Result<WhenExpr, SynthesisError> {
        cached(&self.expression, &self.text, factory)
    }
}

fn cached<N: AstNode + Clone, P: SourceParser>(
    cell: &OnceCell<N>,
    text: &str,
    factory: &PsiFactory<P>,
) -> Result<N, SynthesisError> {
    if let Some(node) = cell.get() {
        return Ok(node.clone());
    }

    // An open `if` chain ends with the newline that separates its branches.
    let expression = factory.expression(text.trim_end())?;
    let found = expression.syntax().kind();
    let node = N::cast(expression.syntax().clone()).ok_or_else(|| {
        SynthesisError::UnexpectedKind {
            expected: "chain expression",
            found,
            scaffold: text.to_owned(),
        }
    })?;
    Ok(cell.get_or_init(|| node).clone())
}
