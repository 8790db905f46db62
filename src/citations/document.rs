//! The `scaleCitations` section as an in-memory document.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::entry::CitationEntry;
use crate::error::CurateError;
use crate::literal::{find_assignment, parse_object, write_object, JsValue, Members};
use crate::utils::{ensure_exists, write_atomic, write_backup};

pub const CITATIONS_ASSIGNMENT: &str = "scaleCitations";

/// Ordered citation entries keyed by scale name. Entries whose value is not
/// an object are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationDocument {
    entries: Members,
}

impl CitationDocument {
    /// Parse the `scaleCitations` assignment out of `text`.
    pub fn parse(text: &str) -> crate::error::Result<Self> {
        let assignment = find_assignment(text, CITATIONS_ASSIGNMENT)
            .ok_or_else(|| CurateError::assignment(CITATIONS_ASSIGNMENT))?;
        let entries = parse_object(assignment.literal(text), assignment.open, CITATIONS_ASSIGNMENT)?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Typed view of an entry; `None` when absent or not an object.
    pub fn get(&self, name: &str) -> Option<CitationEntry> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_object())
            .map(CitationEntry::from_members)
    }

    /// Replace the entry in place, or append it when new.
    pub fn set(&mut self, name: &str, entry: &CitationEntry) {
        let value = JsValue::Object(entry.to_members());
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// `text` with the section replaced by this document. Bytes outside the
    /// literal are unchanged.
    pub fn render_into(&self, text: &str) -> crate::error::Result<String> {
        let assignment = find_assignment(text, CITATIONS_ASSIGNMENT)
            .ok_or_else(|| CurateError::assignment(CITATIONS_ASSIGNMENT))?;
        Ok(assignment.splice(text, &write_object(&self.entries, &assignment.indent)))
    }
}

/// A JavaScript file opened for citation edits.
pub struct CitationFile {
    path: PathBuf,
    text: String,
    document: CitationDocument,
}

impl CitationFile {
    pub fn open(path: &Path) -> Result<Self> {
        ensure_exists(path, "JavaScript file")?;
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let document = CitationDocument::parse(&text)
            .with_context(|| format!("Cannot read citations from {}", path.display()))?;
        tracing::debug!("Loaded {} citation entries from {}", document.len(), path.display());
        Ok(Self { path: path.to_path_buf(), text, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &CitationDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut CitationDocument {
        &mut self.document
    }

    /// Back up the file on disk, then write the updated section.
    pub fn save(&mut self) -> Result<PathBuf> {
        let rendered = self.document.render_into(&self.text)?;
        let backup = write_backup(&self.path)?;
        write_atomic(&self.path, &rendered)?;
        self.text = rendered;
        Ok(backup)
    }
}
