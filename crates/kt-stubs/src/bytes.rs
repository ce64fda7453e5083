use kt_yellow::SyntaxKind;

use crate::{Stream, StubError, StubId, StubInput, StubOutput, StubRef, StubRegistry, StubTree};

/// A stub tree as two byte streams.
///
/// The shape stream holds, in pre-order, each stub's kind tag and child
/// count. The payload stream holds the descriptors' records in the same
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubBytes {
    pub shape: Vec<u8>,
    pub payload: Vec<u8>,
}

pub fn serialize_tree(registry: &StubRegistry, tree: &StubTree) -> Result<StubBytes, StubError> {
    let _span = tracing::debug_span!("serialize_tree", stubs = tree.len()).entered();

    let mut shape = StubOutput::new();
    let mut payload = StubOutput::new();
    if let Some(root) = tree.root() {
        write_stub(registry, root, &mut shape, &mut payload)?;
    }

    Ok(StubBytes { shape: shape.into_bytes(), payload: payload.into_bytes() })
}

fn write_stub(
    registry: &StubRegistry,
    stub: StubRef<'_>,
    shape: &mut StubOutput,
    payload: &mut StubOutput,
) -> Result<(), StubError> {
    let kind = stub.kind();
    let Some(descriptor) = registry.get(kind) else {
        return Err(StubError::Unregistered { kind, position: shape.len() });
    };

    shape.write_u64(kind.into_raw().into());
    shape.write_u64(stub.children().len() as u64);
    descriptor.serialize(stub, payload);

    for child in stub.children() {
        write_stub(registry, child, shape, payload)?;
    }
    Ok(())
}

/// Rebuilds a detached stub tree.
///
/// The tree is only returned when both streams were read to the end.
pub fn deserialize_tree(registry: &StubRegistry, bytes: &StubBytes) -> Result<StubTree, StubError> {
    let _span = tracing::debug_span!("deserialize_tree").entered();

    let mut shape = StubInput::new(&bytes.shape, Stream::Shape);
    let mut payload = StubInput::new(&bytes.payload, Stream::Payload);
    if shape.is_at_end() {
        return Err(StubError::Empty);
    }

    let mut tree = StubTree::new();
    // Stubs whose children are still being read, with the count left.
    let mut open: Vec<(StubId, u32)> = Vec::new();
    loop {
        let parent = match open.last_mut() {
            Some((id, remaining)) if *remaining > 0 => {
                *remaining -= 1;
                Some(*id)
            }
            Some(_) => {
                open.pop();
                continue;
            }
            None if tree.is_empty() => None,
            None => break,
        };

        let (id, children) = read_stub(registry, &mut shape, &mut payload, &mut tree, parent)?;
        open.push((id, children));
    }

    shape.finish()?;
    payload.finish()?;
    tracing::debug!(stubs = tree.len(), "stub tree read");
    Ok(tree)
}

fn read_stub(
    registry: &StubRegistry,
    shape: &mut StubInput<'_>,
    payload: &mut StubInput<'_>,
    tree: &mut StubTree,
    parent: Option<StubId>,
) -> Result<(StubId, u32), StubError> {
    let position = shape.position();
    let raw = shape.read_u64()?;
    let kind = u16::try_from(raw)
        .ok()
        .and_then(SyntaxKind::from_raw)
        .ok_or(StubError::UnknownKind { raw, position })?;
    let descriptor = registry.get(kind).ok_or(StubError::Unregistered { kind, position })?;
    let children = shape.read_u32()?;

    let id = descriptor.deserialize(payload, tree, parent)?;
    debug_assert_eq!(tree[id].kind, kind);
    Ok((id, children))
}
