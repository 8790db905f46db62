//! Section-level pruning of the engine file.
//!
//! Drops every scale outside the keep set from `scales`, `scaleCitations` and
//! the name arrays of `scaleCategories`. Each section is re-serialized whole,
//! so comments inside those three sections are not preserved.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::citations::CITATIONS_ASSIGNMENT;
use crate::error::CurateError;
use crate::extract::SCALES_ASSIGNMENT;
use crate::literal::{find_assignment, parse_object, write_object, JsValue, Members};
use crate::utils::{ensure_exists, write_atomic, write_backup};

pub const CATEGORIES_ASSIGNMENT: &str = "scaleCategories";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub scales_kept: usize,
    pub scales_removed: Vec<String>,
    /// `None` when the file has no `scaleCitations` section.
    pub citations_removed: Option<usize>,
    /// `None` when the file has no `scaleCategories` section.
    pub category_names_removed: Option<usize>,
}

/// Prune `text`, keeping only scales named in `keep`.
pub fn prune_text(text: &str, keep: &HashSet<String>) -> crate::error::Result<(String, PruneOutcome)> {
    let mut outcome = PruneOutcome::default();

    let (text, removed) = rewrite_section(text, SCALES_ASSIGNMENT, |members| {
        let removed = drop_members(members, keep);
        Ok(removed)
    })?
    .ok_or_else(|| CurateError::assignment(SCALES_ASSIGNMENT))?;
    outcome.scales_removed = removed;

    let text = match rewrite_section(&text, CITATIONS_ASSIGNMENT, |members| Ok(drop_members(members, keep)))? {
        Some((updated, removed)) => {
            outcome.citations_removed = Some(removed.len());
            updated
        }
        None => {
            tracing::warn!("No `{}` section; skipping", CITATIONS_ASSIGNMENT);
            text
        }
    };

    let text = match rewrite_section(&text, CATEGORIES_ASSIGNMENT, |members| {
        Ok(drop_category_names(members, keep))
    })? {
        Some((updated, removed)) => {
            outcome.category_names_removed = Some(removed);
            updated
        }
        None => {
            tracing::debug!("No `{}` section; skipping", CATEGORIES_ASSIGNMENT);
            text
        }
    };

    outcome.scales_kept = find_assignment(&text, SCALES_ASSIGNMENT)
        .map(|a| parse_object(a.literal(&text), a.open, SCALES_ASSIGNMENT).map(|m| m.len()))
        .transpose()?
        .unwrap_or(0);
    Ok((text, outcome))
}

/// Prune the file at `path` in place after writing `<file>.backup`.
pub fn prune_file(path: &Path, keep: &HashSet<String>) -> Result<PruneOutcome> {
    ensure_exists(path, "JavaScript file")?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (pruned, outcome) =
        prune_text(&text, keep).with_context(|| format!("Cannot prune {}", path.display()))?;
    write_backup(path)?;
    write_atomic(path, &pruned)?;
    Ok(outcome)
}

/// Parse one section, let `edit` mutate it and splice the result back.
/// `Ok(None)` when the section is absent.
fn rewrite_section<T>(
    text: &str,
    name: &str,
    edit: impl FnOnce(&mut Members) -> crate::error::Result<T>,
) -> crate::error::Result<Option<(String, T)>> {
    let Some(assignment) = find_assignment(text, name) else {
        return Ok(None);
    };
    let mut members = parse_object(assignment.literal(text), assignment.open, name)?;
    let result = edit(&mut members)?;
    let updated = assignment.splice(text, &write_object(&members, &assignment.indent));
    Ok(Some((updated, result)))
}

fn drop_members(members: &mut Members, keep: &HashSet<String>) -> Vec<String> {
    let mut removed = Vec::new();
    members.retain(|(name, _)| {
        if keep.contains(name) {
            true
        } else {
            removed.push(name.clone());
            false
        }
    });
    removed
}

fn drop_category_names(members: &mut Members, keep: &HashSet<String>) -> usize {
    let mut removed = 0;
    for (_, value) in members.iter_mut() {
        if let JsValue::Array(items) = value {
            let before = items.len();
            items.retain(|item| item.as_str().map_or(true, |name| keep.contains(name)));
            removed += before - items.len();
        }
    }
    removed
}
