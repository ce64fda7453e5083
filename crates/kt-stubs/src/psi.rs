use kt_yellow::ast::{AstNode as _, Declaration};
use kt_yellow::{SyntaxKind, SyntaxNode};

use crate::{StubRef, StubRegistry, build};

/// An element backed either by a stub or by a syntax node.
///
/// Both origins answer the stub-covered queries the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PsiElement<'t> {
    Stub(StubRef<'t>),
    Tree(SyntaxNode),
}

impl<'t> PsiElement<'t> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Stub(stub) => stub.kind(),
            Self::Tree(node) => node.kind(),
        }
    }

    pub fn is_stub_based(&self) -> bool {
        matches!(self, Self::Stub(_))
    }

    pub fn syntax(&self) -> Option<&SyntaxNode> {
        match self {
            Self::Stub(_) => None,
            Self::Tree(node) => Some(node),
        }
    }

    pub fn stub(&self) -> Option<StubRef<'t>> {
        match self {
            Self::Stub(stub) => Some(*stub),
            Self::Tree(_) => None,
        }
    }

    /// The declared name of a class, function or property.
    pub fn name(&self) -> Option<String> {
        match self {
            Self::Stub(stub) => stub.payload().name().map(str::to_owned),
            Self::Tree(node) => Declaration::cast(node.clone()).and_then(|it| it.name()),
        }
    }

    /// Children that have stubs, in source order.
    pub fn children(&self, registry: &StubRegistry) -> Vec<Self> {
        match self {
            Self::Stub(stub) => stub.children().map(Self::Stub).collect(),
            Self::Tree(node) => {
                build::stub_children(registry, node).into_iter().map(Self::Tree).collect()
            }
        }
    }
}
