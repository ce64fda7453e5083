use kt_yellow::SyntaxKind::FILE;
use kt_yellow::SyntaxNode;
use kt_yellow::ast::{AstNode as _, KtFile};

use crate::{StubId, StubRegistry, StubTree};

/// Creates stubs for every node of a registered kind, outside of
/// expressions and bodies.
///
/// # Panics
///
/// If `registry` has no descriptor for files.
pub fn build_stub_tree(registry: &StubRegistry, file: &KtFile) -> StubTree {
    let _span = tracing::debug_span!("build_stub_tree").entered();

    let Some(descriptor) = registry.get(FILE) else {
        panic!("the registry has no stub descriptor for FILE");
    };

    let mut tree = StubTree::new();
    let root = descriptor.create_stub(file.syntax(), &mut tree, None);
    build_children(registry, file.syntax(), &mut tree, root);

    tracing::debug!(stubs = tree.len(), "stub tree built");
    tree
}

fn build_children(registry: &StubRegistry, node: &SyntaxNode, tree: &mut StubTree, parent: StubId) {
    for child in stub_children(registry, node) {
        let Some(descriptor) = registry.get(child.kind()) else { continue };
        let id = descriptor.create_stub(&child, tree, Some(parent));
        build_children(registry, &child, tree, id);
    }
}

/// The nearest descendants of `node` with a registered kind.
pub(crate) fn stub_children(registry: &StubRegistry, node: &SyntaxNode) -> Vec<SyntaxNode> {
    let mut found = Vec::new();
    collect(registry, node, &mut found);
    found
}

fn collect(registry: &StubRegistry, node: &SyntaxNode, found: &mut Vec<SyntaxNode>) {
    for child in node.children() {
        if child.kind().is_expression() {
            continue;
        }

        if registry.contains(child.kind()) {
            found.push(child);
        } else {
            collect(registry, &child, found);
        }
    }
}
