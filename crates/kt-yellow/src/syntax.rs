//! Public syntax tree API built on immutable, parent-linked nodes.

use std::fmt;
use std::hash::{Hash, Hasher};

use text_size::{TextRange, TextSize};
use triomphe::Arc;

use crate::{GreenElement, GreenNode, GreenToken, SyntaxKind};

/// Node handle: a green node together with its absolute offset and parent.
///
/// Handles are created on demand while navigating; two handles compare equal
/// when they point at the same green node at the same offset.
#[derive(Clone)]
pub struct SyntaxNode(Arc<NodeData>);

struct NodeData {
    parent: Option<SyntaxNode>,
    index: u32,
    offset: TextSize,
    green: GreenNode,
}

impl SyntaxNode {
    /// Creates the root of a tree.
    pub fn new_root(green: GreenNode) -> Self {
        Self(Arc::new(NodeData { parent: None, index: 0, offset: TextSize::new(0), green }))
    }

    fn new_child(parent: &Self, index: u32, offset: TextSize, green: GreenNode) -> Self {
        Self(Arc::new(NodeData { parent: Some(parent.clone()), index, offset, green }))
    }

    /// Returns this node's kind.
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.0.green.kind()
    }

    #[inline]
    pub fn green(&self) -> &GreenNode {
        &self.0.green
    }

    /// Index of this node among its parent's children, tokens included.
    #[inline]
    pub fn index(&self) -> usize {
        self.0.index as usize
    }

    /// Returns the text range covered by this node.
    #[inline]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.0.offset, self.0.green.text_len())
    }

    /// Renders the full text of this node, trivia inside it included.
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Returns the parent node if any.
    #[inline]
    pub fn parent(&self) -> Option<Self> {
        self.0.parent.clone()
    }

    /// Returns an iterator of ancestors starting from this node.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        std::iter::successors(Some(self.clone()), SyntaxNode::parent)
    }

    /// Iterates children including tokens.
    pub fn children_with_tokens(&self) -> impl Iterator<Item = SyntaxElement> + use<> {
        let parent = self.clone();
        let mut offset = self.0.offset;

        (0..self.0.green.children().len()).map(move |index| {
            let green = &parent.0.green.children()[index];
            let child_offset = offset;
            offset += green.text_len();

            match green {
                GreenElement::Node(node) => SyntaxElement::Node(SyntaxNode::new_child(
                    &parent,
                    index as u32,
                    child_offset,
                    node.clone(),
                )),
                GreenElement::Token(token) => SyntaxElement::Token(SyntaxToken {
                    parent: parent.clone(),
                    index: index as u32,
                    offset: child_offset,
                    green: token.clone(),
                }),
            }
        })
    }

    /// Iterates child nodes, skipping tokens.
    pub fn children(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.children_with_tokens().filter_map(SyntaxElement::into_node)
    }

    /// Returns the first child node of the given kind.
    pub fn child_of_kind(&self, kind: SyntaxKind) -> Option<SyntaxNode> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Returns the first child token of the given kind.
    pub fn token_of_kind(&self, kind: SyntaxKind) -> Option<SyntaxToken> {
        self.children_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .find(|token| token.kind() == kind)
    }

    /// Returns the first non-trivia child token.
    pub fn first_significant_token(&self) -> Option<SyntaxToken> {
        self.children_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .find(|token| !token.is_trivia())
    }

    /// Preorder traversal over nodes, this node first.
    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Preorder traversal over every token below this node.
    pub fn descendant_tokens(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.descendants().flat_map(|node| {
            node.children_with_tokens().filter_map(SyntaxElement::into_token).collect::<Vec<_>>()
        })
    }

    /// Returns a preorder iterator over nodes.
    pub fn preorder(&self) -> Preorder {
        Preorder::new(self.clone())
    }

    /// Returns the first token below this node, if any.
    pub fn first_token(&self) -> Option<SyntaxToken> {
        self.children_with_tokens().find_map(|child| match child {
            SyntaxElement::Node(node) => node.first_token(),
            SyntaxElement::Token(token) => Some(token),
        })
    }

    /// Returns the token at the given absolute offset, if any.
    ///
    /// An offset that falls exactly between two tokens reports both.
    pub fn token_at_offset(&self, offset: TextSize) -> TokenAtOffset<SyntaxToken> {
        let range = self.text_range();
        if range.is_empty() || offset < range.start() || offset > range.end() {
            return TokenAtOffset::None;
        }

        let mut children = self.children_with_tokens().filter(|child| {
            let child_range = child.text_range();
            !child_range.is_empty()
                && child_range.start() <= offset
                && offset <= child_range.end()
        });

        let Some(left) = children.next() else {
            return TokenAtOffset::None;
        };

        match children.next() {
            Some(right) => {
                match (left.token_at_offset(offset), right.token_at_offset(offset)) {
                    (TokenAtOffset::Single(left), TokenAtOffset::Single(right)) => {
                        TokenAtOffset::Between(left, right)
                    }
                    (left, TokenAtOffset::None) => left,
                    (TokenAtOffset::None, right) => right,
                    (left, _) => left,
                }
            }
            None => left.token_at_offset(offset),
        }
    }

    /// Returns the leaf that starts at or contains `offset`, measured from the
    /// start of this node.
    pub fn find_token_at(&self, offset: TextSize) -> Option<SyntaxToken> {
        self.token_at_offset(self.text_range().start() + offset).right_biased()
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.0.green.ptr() == other.0.green.ptr() && self.0.offset == other.0.offset
    }
}

impl Eq for SyntaxNode {}

impl Hash for SyntaxNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.green.ptr().hash(state);
        self.0.offset.hash(state);
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_green(green: &GreenNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for child in green.children() {
                match child {
                    GreenElement::Node(node) => write_green(node, f)?,
                    GreenElement::Token(token) => f.write_str(token.text())?,
                }
            }
            Ok(())
        }

        write_green(&self.0.green, f)
    }
}

impl fmt::Debug for SyntaxNode {
    /// `{:?}` prints the kind and range; `{:#?}` prints the whole subtree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return write!(f, "{:?}@{:?}", self.kind(), self.text_range());
        }

        let mut level = 0;
        for event in self.preorder_with_tokens() {
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    writeln!(f, "{:indent$}{:?}@{:?}", "", node.kind(), node.text_range(), indent = level * 2)?;
                    level += 1;
                }
                WalkEventWithTokens::LeaveNode(_) => level -= 1,
                WalkEventWithTokens::Token(token) => {
                    writeln!(f, "{:indent$}{token:?}", "", indent = level * 2)?;
                }
            }
        }
        Ok(())
    }
}

/// Token handle tied to its parent node.
#[derive(Clone)]
pub struct SyntaxToken {
    parent: SyntaxNode,
    index: u32,
    offset: TextSize,
    green: GreenToken,
}

impl SyntaxToken {
    /// Returns this token's kind.
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    /// Returns `true` if this token is trivia.
    #[inline]
    pub fn is_trivia(&self) -> bool {
        self.kind().is_trivia()
    }

    #[inline]
    pub fn green(&self) -> &GreenToken {
        &self.green
    }

    /// Returns the raw token text.
    #[inline]
    pub fn text(&self) -> &str {
        self.green.text()
    }

    #[inline]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Returns the parent node.
    #[inline]
    pub fn parent(&self) -> SyntaxNode {
        self.parent.clone()
    }

    /// Returns an iterator of parent nodes, starting from the immediate parent.
    pub fn parent_ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.parent.ancestors()
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent && self.index == other.index
    }
}

impl Eq for SyntaxToken {}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.text_range(), self.text())
    }
}

/// Node or token element inside the tree.
pub type SyntaxElement = NodeOrToken<SyntaxNode, SyntaxToken>;

impl SyntaxElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    fn token_at_offset(&self, offset: TextSize) -> TokenAtOffset<SyntaxToken> {
        match self {
            NodeOrToken::Node(node) => node.token_at_offset(offset),
            NodeOrToken::Token(token) => TokenAtOffset::Single(token.clone()),
        }
    }
}

/// Preorder traversal over nodes.
pub struct Preorder {
    inner: PreorderWithTokens,
}

impl Preorder {
    fn new(start: SyntaxNode) -> Self {
        Self { inner: PreorderWithTokens::new(start) }
    }

    /// Skips the current subtree during traversal.
    pub fn skip_subtree(&mut self) {
        self.inner.skip_subtree();
    }
}

impl Iterator for Preorder {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Debug)]
pub enum WalkEvent {
    Enter(SyntaxNode),
    Leave(SyntaxNode),
}

type ChildIter = Box<dyn Iterator<Item = SyntaxElement>>;

/// Preorder traversal over nodes and tokens.
pub struct PreorderWithTokens {
    stack: Vec<(SyntaxNode, ChildIter)>,
    root: Option<SyntaxNode>,
}

impl PreorderWithTokens {
    fn new(start: SyntaxNode) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the current subtree during traversal.
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl Iterator for PreorderWithTokens {
    type Item = WalkEventWithTokens;

    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root.clone(), Box::new(root.children_with_tokens())));
            return Some(WalkEventWithTokens::EnterNode(root));
        };

        match active_node.next() {
            Some(SyntaxElement::Node(child)) => {
                self.stack.push((child.clone(), Box::new(child.children_with_tokens())));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(SyntaxElement::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Debug)]
pub enum WalkEventWithTokens {
    EnterNode(SyntaxNode),
    LeaveNode(SyntaxNode),
    Token(SyntaxToken),
}

impl SyntaxNode {
    /// Returns a preorder iterator over nodes and tokens.
    pub fn preorder_with_tokens(&self) -> PreorderWithTokens {
        PreorderWithTokens::new(self.clone())
    }
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    /// Returns a shared reference to the node, if any.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Returns a shared reference to the token, if any.
    pub fn as_token(&self) -> Option<&T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

/// There might be zero, one or two tokens at a given offset.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    /// No tokens at offset.
    None,
    /// Only a single token at offset.
    Single(T),
    /// Offset is exactly between two tokens.
    Between(T, T),
}

impl<T> TokenAtOffset<T> {
    /// Maps tokens to a different type.
    pub fn map<F: Fn(T) -> U, U>(self, f: F) -> TokenAtOffset<U> {
        match self {
            TokenAtOffset::None => TokenAtOffset::None,
            TokenAtOffset::Single(it) => TokenAtOffset::Single(f(it)),
            TokenAtOffset::Between(l, r) => TokenAtOffset::Between(f(l), f(r)),
        }
    }

    /// Convert to option, preferring the right token in case of a tie.
    pub fn right_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(_, right) => Some(right),
        }
    }

    /// Convert to option, preferring the left token in case of a tie.
    pub fn left_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(left, _) => Some(left),
        }
    }
}

impl<T> Iterator for TokenAtOffset<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::None) {
            Self::None => None,
            Self::Single(node) => {
                *self = Self::None;
                Some(node)
            }
            Self::Between(left, right) => {
                *self = Self::Single(right);
                Some(left)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::None => (0, Some(0)),
            Self::Single(_) => (1, Some(1)),
            Self::Between(_, _) => (2, Some(2)),
        }
    }
}

impl<T> ExactSizeIterator for TokenAtOffset<T> {}
