use std::fmt;
use std::sync::LazyLock;

use kt_yellow::SyntaxKind;
use rustc_hash::FxHashMap;

use crate::StubDescriptor;
use crate::descriptor::{
    FILE_DESCRIPTOR, NULLABLE_TYPE_DESCRIPTOR, NamedDescriptor, TYPE_REFERENCE_DESCRIPTOR,
    UserTypeDescriptor,
};

static STANDARD: LazyLock<StubRegistry> = LazyLock::new(|| {
    StubRegistry::builder()
        .register(FILE_DESCRIPTOR)
        .register(NamedDescriptor::CLASS)
        .register(NamedDescriptor::FUN)
        .register(NamedDescriptor::PROPERTY)
        .register(TYPE_REFERENCE_DESCRIPTOR)
        .register(NULLABLE_TYPE_DESCRIPTOR)
        .register(UserTypeDescriptor::new())
        .build()
});

/// Kind to descriptor table.
pub struct StubRegistry {
    descriptors: FxHashMap<SyntaxKind, Box<dyn StubDescriptor>>,
}

impl StubRegistry {
    pub fn builder() -> StubRegistryBuilder {
        StubRegistryBuilder::default()
    }

    /// Descriptors for files, declarations and the type kinds.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    pub fn get(&self, kind: SyntaxKind) -> Option<&dyn StubDescriptor> {
        self.descriptors.get(&kind).map(Box::as_ref)
    }

    pub fn contains(&self, kind: SyntaxKind) -> bool {
        self.descriptors.contains_key(&kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<SyntaxKind> {
        let mut kinds = self.descriptors.keys().copied().collect::<Vec<_>>();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for StubRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

#[derive(Default)]
pub struct StubRegistryBuilder {
    descriptors: FxHashMap<SyntaxKind, Box<dyn StubDescriptor>>,
}

impl StubRegistryBuilder {
    /// # Panics
    ///
    /// If a descriptor for the same kind is already registered.
    pub fn register(mut self, descriptor: impl StubDescriptor + 'static) -> Self {
        let kind = descriptor.kind();
        let previous = self.descriptors.insert(kind, Box::new(descriptor));
        assert!(previous.is_none(), "{kind:?} already has a stub descriptor");
        self
    }

    pub fn build(self) -> StubRegistry {
        StubRegistry { descriptors: self.descriptors }
    }
}

#[cfg(test)]
mod tests {
    use kt_yellow::SyntaxKind::*;

    use super::*;
    use crate::Placeholder;

    #[test]
    fn standard_kinds() {
        assert_eq!(
            StubRegistry::standard().kinds(),
            [FILE, CLASS, FUN, PROPERTY, TYPE_REFERENCE, USER_TYPE, NULLABLE_TYPE]
        );
    }

    #[test]
    #[should_panic(expected = "NULLABLE_TYPE already has a stub descriptor")]
    fn duplicate_kind() {
        let _ = StubRegistry::builder()
            .register(Placeholder::new(NULLABLE_TYPE))
            .register(Placeholder::new(NULLABLE_TYPE));
    }
}
