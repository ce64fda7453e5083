use kt_yellow::SyntaxKind::{self, *};
use kt_yellow::SyntaxNode;
use kt_yellow::ast::{AstNode as _, Declaration};

use crate::{
    IndexKey, IndexSink, NamedStub, PsiElement, StubError, StubId, StubInput, StubOutput,
    StubPayload, StubRef, StubTree,
};

/// Behavior of one stub kind.
///
/// Descriptors are stateless; a registry holds exactly one per kind.
/// `create_stub` followed by `create_from_stub` yields an element of the same
/// kind, and `deserialize` reads back exactly what `serialize` wrote.
pub trait StubDescriptor: Send + Sync {
    fn kind(&self) -> SyntaxKind;

    fn create_from_tree<'t>(&self, node: SyntaxNode) -> PsiElement<'t> {
        assert_eq!(node.kind(), self.kind(), "node of the wrong kind for this descriptor");
        PsiElement::Tree(node)
    }

    fn create_from_stub<'t>(&self, stub: StubRef<'t>) -> PsiElement<'t> {
        assert_eq!(stub.kind(), self.kind(), "stub of the wrong kind for this descriptor");
        PsiElement::Stub(stub)
    }

    /// Allocates the stub for `node` under `parent`.
    fn create_stub(
        &self,
        node: &SyntaxNode,
        tree: &mut StubTree,
        parent: Option<StubId>,
    ) -> StubId;

    /// Writes the stub's payload record.
    fn serialize(&self, stub: StubRef<'_>, output: &mut StubOutput);

    /// Reads a payload record written by `serialize` and allocates the stub.
    fn deserialize(
        &self,
        input: &mut StubInput<'_>,
        tree: &mut StubTree,
        parent: Option<StubId>,
    ) -> Result<StubId, StubError>;

    fn index_stub(&self, stub: StubRef<'_>, sink: &mut dyn IndexSink);
}

/// Structure-only stubs: no payload bytes, no index entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    kind: SyntaxKind,
}

impl Placeholder {
    pub const fn new(kind: SyntaxKind) -> Self {
        Self { kind }
    }
}

impl StubDescriptor for Placeholder {
    fn kind(&self) -> SyntaxKind {
        self.kind
    }

    fn create_stub(
        &self,
        node: &SyntaxNode,
        tree: &mut StubTree,
        parent: Option<StubId>,
    ) -> StubId {
        debug_assert_eq!(node.kind(), self.kind);
        tree.alloc(self.kind, parent, StubPayload::Empty)
    }

    fn serialize(&self, _stub: StubRef<'_>, _output: &mut StubOutput) {}

    fn deserialize(
        &self,
        _input: &mut StubInput<'_>,
        tree: &mut StubTree,
        parent: Option<StubId>,
    ) -> Result<StubId, StubError> {
        Ok(tree.alloc(self.kind, parent, StubPayload::Empty))
    }

    fn index_stub(&self, _stub: StubRef<'_>, _sink: &mut dyn IndexSink) {}
}

/// `T?`
pub const NULLABLE_TYPE_DESCRIPTOR: Placeholder = Placeholder::new(NULLABLE_TYPE);

pub const TYPE_REFERENCE_DESCRIPTOR: Placeholder = Placeholder::new(TYPE_REFERENCE);

pub const FILE_DESCRIPTOR: Placeholder = Placeholder::new(FILE);

/// User types such as `a.B<C>`.
///
/// Stubs carry no payload yet; the referenced name is still read from the
/// tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserTypeDescriptor {
    base: Placeholder,
}

impl UserTypeDescriptor {
    pub const fn new() -> Self {
        Self { base: Placeholder::new(USER_TYPE) }
    }
}

impl Default for UserTypeDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl StubDescriptor for UserTypeDescriptor {
    fn kind(&self) -> SyntaxKind {
        self.base.kind()
    }

    fn create_stub(
        &self,
        node: &SyntaxNode,
        tree: &mut StubTree,
        parent: Option<StubId>,
    ) -> StubId {
        self.base.create_stub(node, tree, parent)
    }

    fn serialize(&self, stub: StubRef<'_>, output: &mut StubOutput) {
        self.base.serialize(stub, output);
    }

    fn deserialize(
        &self,
        input: &mut StubInput<'_>,
        tree: &mut StubTree,
        parent: Option<StubId>,
    ) -> Result<StubId, StubError> {
        self.base.deserialize(input, tree, parent)
    }

    fn index_stub(&self, stub: StubRef<'_>, sink: &mut dyn IndexSink) {
        self.base.index_stub(stub, sink);
    }
}

/// Declarations indexed by their short name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedDescriptor {
    kind: SyntaxKind,
    key: IndexKey,
    top_level_key: Option<IndexKey>,
}

impl NamedDescriptor {
    pub const CLASS: Self = Self { kind: CLASS, key: IndexKey::ClassShortName, top_level_key: None };
    pub const FUN: Self = Self {
        kind: FUN,
        key: IndexKey::FunctionShortName,
        top_level_key: Some(IndexKey::TopLevelFunction),
    };
    pub const PROPERTY: Self = Self {
        kind: PROPERTY,
        key: IndexKey::PropertyShortName,
        top_level_key: Some(IndexKey::TopLevelProperty),
    };
}

impl StubDescriptor for NamedDescriptor {
    fn kind(&self) -> SyntaxKind {
        self.kind
    }

    fn create_stub(
        &self,
        node: &SyntaxNode,
        tree: &mut StubTree,
        parent: Option<StubId>,
    ) -> StubId {
        debug_assert_eq!(node.kind(), self.kind);
        let name = Declaration::cast(node.clone()).and_then(|it| it.name()).unwrap_or_default();
        let is_top_level = parent.is_some_and(|parent| tree[parent].kind == FILE);
        tree.alloc(self.kind, parent, StubPayload::Named(NamedStub { name, is_top_level }))
    }

    fn serialize(&self, stub: StubRef<'_>, output: &mut StubOutput) {
        let StubPayload::Named(named) = stub.payload() else {
            panic!("{:?} stub has no name payload", self.kind)
        };
        output.write_name(&named.name);
        output.write_bool(named.is_top_level);
    }

    fn deserialize(
        &self,
        input: &mut StubInput<'_>,
        tree: &mut StubTree,
        parent: Option<StubId>,
    ) -> Result<StubId, StubError> {
        let invalid = |position, reason| StubError::InvalidRecord { kind: self.kind, position, reason };

        let position = input.position();
        let name = input.read_name()?.ok_or_else(|| invalid(position, "name is not UTF-8"))?;
        let position = input.position();
        let is_top_level =
            input.read_bool()?.ok_or_else(|| invalid(position, "top-level flag is not 0 or 1"))?;

        Ok(tree.alloc(self.kind, parent, StubPayload::Named(NamedStub { name, is_top_level })))
    }

    fn index_stub(&self, stub: StubRef<'_>, sink: &mut dyn IndexSink) {
        let StubPayload::Named(named) = stub.payload() else { return };
        if named.name.is_empty() {
            return;
        }

        sink.occurrence(self.key, &named.name);
        if let Some(key) = self.top_level_key.filter(|_| named.is_top_level) {
            sink.occurrence(key, &named.name);
        }
    }
}
