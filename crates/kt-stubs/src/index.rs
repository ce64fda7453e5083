/// Index a stub can contribute to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexKey {
    ClassShortName,
    FunctionShortName,
    PropertyShortName,
    TopLevelFunction,
    TopLevelProperty,
}

/// Receives index entries from [`StubDescriptor::index_stub`].
///
/// [`StubDescriptor::index_stub`]: crate::StubDescriptor::index_stub
pub trait IndexSink {
    fn occurrence(&mut self, key: IndexKey, value: &str);
}

/// Collects entries in the order they are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexEntries {
    entries: Vec<(IndexKey, String)>,
}

impl IndexEntries {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndexKey, &str)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Values recorded under `key`.
    pub fn values(&self, key: IndexKey) -> impl Iterator<Item = &str> {
        self.iter().filter(move |(k, _)| *k == key).map(|(_, value)| value)
    }
}

impl IndexSink for IndexEntries {
    fn occurrence(&mut self, key: IndexKey, value: &str) {
        self.entries.push((key, value.to_owned()));
    }
}
