//! Lossless, immutable syntax tree with parent pointers.
//!
//! Green nodes are position independent and shared; red handles add absolute
//! offsets and parent links on demand. Trivia are ordinary leaf tokens.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod green;
mod syntax;
mod syntax_kind;
mod syntax_set;

/// Incremental builder for constructing a `GreenNode`.
pub use builder::Builder;
/// Position-independent tree storage.
pub use green::{GreenElement, GreenNode, GreenToken};
/// Primary syntax tree API types and adapters.
pub use syntax::{
    NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement, SyntaxNode, SyntaxToken,
    TokenAtOffset, WalkEvent, WalkEventWithTokens,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
