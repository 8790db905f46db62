//! Citation records in the engine's `scaleCitations` object

pub mod document;
pub mod entry;
pub mod merge;

pub use document::{CitationDocument, CitationFile, CITATIONS_ASSIGNMENT};
pub use entry::{Category, CitationEntry, CulturalContext, Reference, ValidationStatus};
pub use merge::{CitationMerger, ImportOutcome};
