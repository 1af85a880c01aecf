//! # Namespacify
//!
//! Consolidates directories of single-class model files, whose class names
//! encode a hierarchical naming convention, into one nested-namespace file
//! per top-level directory, then rewrites imports and usages of the old flat
//! class names across a source tree.
//!
//! A model file like
//!
//! ```text
//! models/bussiness-logic/pending-collection/
//!     bussiness-logic-pending-collection-result.model.ts
//! ```
//!
//! declaring `export class BussinessLogicPendingCollectionResult` becomes the
//! class `Result` inside `namespace BussinessLogic.PendingCollection` in the
//! generated `bussiness-logic.model.ts`, and every other source file that
//! imported the flat name is repointed at the generated file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use namespacify::prelude::*;
//! use std::path::Path;
//!
//! let mut stream = FileStream::default();
//! stream.save_to_file(
//!     Path::new("./app/pages/models"),
//!     Path::new("./app/pages/models"),
//!     None,
//! )?;
//! stream.update_references(Path::new("./app/pages"))?;
//! # Ok::<(), namespacify::error::NamespacifyError>(())
//! ```
//!
//! ## Previewing
//!
//! ```rust,no_run
//! use namespacify::prelude::*;
//! use std::path::Path;
//!
//! let mut stream = FileStream::default();
//! stream.consolidate(Path::new("./models"), Path::new("./out"), None)?;
//! for change in stream.plan_reference_updates(Path::new("./app"))? {
//!     if change.is_modified() {
//!         println!("{}", unified_diff(&change));
//!     }
//! }
//! # Ok::<(), namespacify::error::NamespacifyError>(())
//! ```

pub mod builder;
pub mod diff;
pub mod error;
pub mod names;
pub mod rewrite;
pub mod scan;
pub mod stream;
pub mod tree;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::{BuildContext, NamespaceBuilder};
    pub use crate::diff::{DiffSummary, colorized_diff, unified_diff};
    pub use crate::error::{NamespacifyError, Result};
    pub use crate::names::{indent, indent_block, split_words, title_case, to_file_name};
    pub use crate::rewrite::{LeafTarget, ReferenceRewriter, TextualRewriter};
    pub use crate::scan::{Declaration, DeclarationScanner};
    pub use crate::stream::{FileChange, FileStream, MappingEntry, ModelOutput};
    pub use crate::tree::{ClassLeaf, Component, NamespaceContainer, NamespaceId, NamespaceTree};
}

pub use prelude::*;
