use camino::Utf8PathBuf;
pub use kt_errors::Diagnostic;
use kt_parse::Parse;
use kt_stubs::{IndexEntries, StubRegistry, StubTree};
use kt_yellow::ast::{AstNode as _, KtFile};
pub use line_index::LineIndex;
use salsa::{Accumulator as _, Database};

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }

    #[salsa::tracked(returns(ref))]
    pub fn parse(self, db: &dyn Database) -> Parse {
        let _span = tracing::debug_span!("parse", path = %self.path(db)).entered();
        kt_parse::parse_file(self.text(db))
    }

    /// Stubs for the standard descriptor set.
    #[salsa::tracked(returns(ref))]
    pub fn stub_tree(self, db: &dyn Database) -> StubTree {
        let root = self.parse(db).syntax_node();
        match KtFile::cast(root) {
            Some(file) => kt_stubs::build_stub_tree(StubRegistry::standard(), &file),
            None => StubTree::new(),
        }
    }

    #[salsa::tracked(returns(ref))]
    pub fn index_entries(self, db: &dyn Database) -> IndexEntries {
        kt_stubs::index_entries(StubRegistry::standard(), self.stub_tree(db))
    }
}

/// Accumulates every [`Diagnostic`] of `file`.
#[salsa::tracked]
pub fn check_file(db: &dyn Database, file: File) {
    for diagnostic in file.parse(db).errors() {
        diagnostic.clone().accumulate(db);
    }
}
