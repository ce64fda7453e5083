//! Incremental builder for the immutable syntax tree.

use crate::{GreenElement, GreenNode, GreenToken, NodeOrToken, SyntaxKind};

/// Builds a `GreenNode` from parser events.
#[derive(Default)]
pub struct Builder {
    parents: Vec<(SyntaxKind, usize)>,
    children: Vec<GreenElement>,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.parents.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

const DEFAULT_TREE_DEPTH: usize = 32;
const DEFAULT_CHILDREN_LEN: usize = 256;

impl Builder {
    pub fn new() -> Self {
        Self {
            parents: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            children: Vec::with_capacity(DEFAULT_CHILDREN_LEN),
        }
    }

    /// Starts a new node of the given kind. Subsequent tokens and nodes become
    /// its children until the matching `finish_node`.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push((kind, self.children.len()));
    }

    /// Adds a leaf to the innermost open node.
    pub fn token(&mut self, kind: SyntaxKind, text: &str) {
        self.children.push(NodeOrToken::Token(GreenToken::new(kind, text)));
    }

    /// Closes the innermost open node.
    #[track_caller]
    pub fn finish_node(&mut self) {
        let (kind, first_child) = self.parents.pop().expect("no opened nodes?");
        let children = self.children.split_off(first_child);
        self.children.push(NodeOrToken::Node(GreenNode::new(kind, children)));
    }

    /// Returns `true` while at least one node is open.
    pub fn is_inside_node(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Completes the build and returns the root node.
    #[track_caller]
    pub fn finish(mut self) -> GreenNode {
        assert!(self.parents.is_empty(), "unbalanced `start_node`/`finish_node` calls");
        assert_eq!(self.children.len(), 1, "a tree must have exactly one root");

        match self.children.pop() {
            Some(NodeOrToken::Node(root)) => root,
            _ => panic!("the root of a tree must be a node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_nodes() {
        let mut builder = Builder::new();
        builder.start_node(SyntaxKind::FILE);
        builder.start_node(SyntaxKind::PROPERTY);
        builder.token(SyntaxKind::VAL_KW, "val");
        builder.token(SyntaxKind::WHITESPACE, " ");
        builder.token(SyntaxKind::IDENT, "x");
        builder.finish_node();
        builder.token(SyntaxKind::WHITESPACE, "\n");
        builder.finish_node();

        let root = builder.finish();
        assert_eq!(root.kind(), SyntaxKind::FILE);
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].kind(), SyntaxKind::PROPERTY);
        assert_eq!(u32::from(root.text_len()), 6);
    }

    #[test]
    #[should_panic(expected = "unbalanced")]
    fn unfinished_node_panics() {
        let mut builder = Builder::new();
        builder.start_node(SyntaxKind::FILE);
        builder.finish();
    }
}
