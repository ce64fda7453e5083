use kt_yellow::SyntaxNode;
use kt_yellow::ast::{AstNode, Block, Expr};

/// A block statement list for any expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockLike {
    /// The expression already was a block.
    Block(Block),
    Wrapper(BlockWrapper),
}

impl BlockLike {
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Block(block) => block.syntax(),
            Self::Wrapper(wrapper) => wrapper.block.syntax(),
        }
    }

    pub fn statements(&self) -> Vec<SyntaxNode> {
        match self {
            Self::Block(block) => block.statements().collect(),
            Self::Wrapper(wrapper) => vec![wrapper.expression.syntax().clone()],
        }
    }
}

/// A synthesized `{ expr }` block that reports the original expression, not
/// its reparsed copy, as its only statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockWrapper {
    block: Block,
    expression: Expr,
}

impl BlockWrapper {
    pub(crate) fn new(block: Block, expression: Expr) -> Self {
        Self { block, expression }
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn base_expression(&self) -> &Expr {
        &self.expression
    }
}
