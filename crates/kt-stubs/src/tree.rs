use std::fmt;
use std::ops::Index;

use kt_yellow::SyntaxKind;

/// Position of a stub in its [`StubTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StubId(u32);

impl StubId {
    pub const ROOT: Self = Self(0);

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Payload of a named declaration stub.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedStub {
    pub name: String,
    pub is_top_level: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum StubPayload {
    #[default]
    Empty,
    Named(NamedStub),
}

impl StubPayload {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Named(named) => Some(&named.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubNode {
    pub kind: SyntaxKind,
    pub parent: Option<StubId>,
    pub children: Vec<StubId>,
    pub payload: StubPayload,
}

/// Arena of stubs. The first stub allocated is the root.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StubTree {
    nodes: Vec<StubNode>,
}

impl StubTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stub as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// If `parent` is `None` for anything but the first stub, or is not in
    /// this tree.
    pub fn alloc(
        &mut self,
        kind: SyntaxKind,
        parent: Option<StubId>,
        payload: StubPayload,
    ) -> StubId {
        assert_eq!(parent.is_none(), self.nodes.is_empty(), "a stub tree has exactly one root");

        let id = StubId(self.nodes.len() as u32);
        if let Some(parent) = parent {
            self.nodes[parent.0 as usize].children.push(id);
        }
        self.nodes.push(StubNode { kind, parent, children: Vec::new(), payload });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<StubRef<'_>> {
        self.get(StubId::ROOT)
    }

    pub fn get(&self, id: StubId) -> Option<StubRef<'_>> {
        (self.nodes.len() > id.0 as usize).then_some(StubRef { tree: self, id })
    }

    /// All stubs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = StubRef<'_>> {
        (0..self.nodes.len() as u32).map(|index| StubRef { tree: self, id: StubId(index) })
    }
}

impl Index<StubId> for StubTree {
    type Output = StubNode;

    fn index(&self, id: StubId) -> &Self::Output {
        &self.nodes[id.0 as usize]
    }
}

impl fmt::Debug for StubTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => fmt::Debug::fmt(&root, f),
            None => f.write_str("<empty>"),
        }
    }
}

/// Navigation handle for a stub.
#[derive(Clone, Copy)]
pub struct StubRef<'t> {
    tree: &'t StubTree,
    id: StubId,
}

impl PartialEq for StubRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for StubRef<'_> {}

impl<'t> StubRef<'t> {
    pub fn id(self) -> StubId {
        self.id
    }

    pub fn tree(self) -> &'t StubTree {
        self.tree
    }

    pub fn kind(self) -> SyntaxKind {
        self.node().kind
    }

    pub fn payload(self) -> &'t StubPayload {
        &self.node().payload
    }

    pub fn parent(self) -> Option<Self> {
        self.node().parent.map(|id| Self { tree: self.tree, id })
    }

    pub fn children(self) -> impl ExactSizeIterator<Item = StubRef<'t>> + 't {
        let tree = self.tree;
        tree[self.id].children.iter().map(move |&id| StubRef { tree, id })
    }

    fn node(self) -> &'t StubNode {
        &self.tree[self.id]
    }

    fn fmt_indented(self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{:?}", "", self.kind(), indent = depth * 2)?;
        if let StubPayload::Named(named) = self.payload() {
            write!(f, " {:?}", named.name)?;
            if named.is_top_level {
                f.write_str(" top-level")?;
            }
        }
        writeln!(f)?;

        for child in self.children() {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Debug for StubRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use kt_yellow::SyntaxKind::*;

    use super::*;

    #[test]
    fn children_follow_allocation_order() {
        let mut tree = StubTree::new();
        let root = tree.alloc(FILE, None, StubPayload::Empty);
        let class = tree.alloc(CLASS, Some(root), StubPayload::Empty);
        tree.alloc(TYPE_REFERENCE, Some(class), StubPayload::Empty);
        tree.alloc(FUN, Some(root), StubPayload::Empty);

        let kinds = tree.root().unwrap().children().map(StubRef::kind).collect::<Vec<_>>();
        assert_eq!(kinds, [CLASS, FUN]);
        assert_eq!(tree.get(StubId(2)).unwrap().parent().unwrap().kind(), CLASS);
    }

    #[test]
    #[should_panic(expected = "exactly one root")]
    fn second_root() {
        let mut tree = StubTree::new();
        tree.alloc(FILE, None, StubPayload::Empty);
        tree.alloc(FILE, None, StubPayload::Empty);
    }
}
