//! Synthesis of small syntax fragments from text.
//!
//! [`PsiFactory`] turns strings into typed tree nodes by parsing them inside
//! fixed scaffolds; [`builders`] assembles `if` chains and `when` expressions
//! before handing them to the factory.

pub mod builders;
mod block;
mod error;
mod factory;
mod fragment;
mod import_path;

pub use block::{BlockLike, BlockWrapper};
pub use error::SynthesisError;
pub use factory::{PsiFactory, TokenScaffold};
pub use fragment::ToFragment;
pub use import_path::ImportPath;
pub use kt_parse::{FileKind, KtParser, SourceParser};
