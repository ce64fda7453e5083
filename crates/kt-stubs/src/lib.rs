//! Stub trees: the declaration skeleton of a file, kept apart from its
//! syntax tree so it can be stored, reloaded and indexed without reparsing.

mod build;
mod bytes;
mod descriptor;
mod index;
mod psi;
mod registry;
mod stream;
mod tree;

pub use build::build_stub_tree;
pub use bytes::{StubBytes, deserialize_tree, serialize_tree};
pub use descriptor::{
    FILE_DESCRIPTOR, NULLABLE_TYPE_DESCRIPTOR, NamedDescriptor, Placeholder, StubDescriptor,
    TYPE_REFERENCE_DESCRIPTOR, UserTypeDescriptor,
};
pub use index::{IndexEntries, IndexKey, IndexSink};
pub use psi::PsiElement;
pub use registry::{StubRegistry, StubRegistryBuilder};
pub use stream::{Stream, StubError, StubInput, StubOutput};
pub use tree::{NamedStub, StubId, StubNode, StubPayload, StubRef, StubTree};

/// Reports every stub of `tree` to `sink`.
pub fn index_tree(registry: &StubRegistry, tree: &StubTree, sink: &mut dyn IndexSink) {
    for stub in tree.iter() {
        if let Some(descriptor) = registry.get(stub.kind()) {
            descriptor.index_stub(stub, sink);
        }
    }
}

/// Every index entry of `tree`.
pub fn index_entries(registry: &StubRegistry, tree: &StubTree) -> IndexEntries {
    let mut entries = IndexEntries::default();
    index_tree(registry, tree, &mut entries);
    entries
}
