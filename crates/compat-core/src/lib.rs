//! Compat Core: Samsung Internet data inferred from Chrome for Android
//!
//! Walks browser-compat-data documents, maps reference-browser versions to
//! derived-browser releases and merges the result into each record.
//!
//! ```text
//! document → TreeWalker → RecordMerger → normalize → (document, dirty)
//!                              ↓
//!                 VersionMapper + NoteRewriter
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod notes;
pub mod processor;
pub mod version;
pub mod walker;

pub use config::InferenceConfig;
pub use document::{parse_document, to_canonical_string};
pub use error::{CompatError, RecordSkip};
pub use merge::{MergeOutcome, RecordMerger, SupportEntry, SupportStatement};
pub use notes::NoteRewriter;
pub use processor::{DocumentProcessor, ProcessReport};
pub use version::{MappingEntry, VersionMapper, VersionToken};
pub use walker::{RecordVisitor, TreeWalker};
