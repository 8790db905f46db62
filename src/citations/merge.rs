//! Merging review decisions and validation runs into citations.

use chrono::Local;

use super::document::CitationDocument;
use super::entry::{Category, CitationEntry, Reference, ValidationStatus};
use crate::domain::{Recommendation, ReviewDecision, ScaleRecord, SourceRef, VERIFIED_QUALITY_THRESHOLD};
use crate::error::{CurateError, Result};

const APPROVED_PLACEHOLDER: &str = "Scale requiring manual verification";
const REJECTED_PLACEHOLDER: &str = "Scale with limited documentation available";

/// Counts from [`CitationMerger::import`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub updated: usize,
    pub created: usize,
    pub verified: usize,
    pub needs_review: usize,
    pub references: usize,
}

/// Applies decisions to a [`CitationDocument`], stamping `date`.
#[derive(Debug, Clone)]
pub struct CitationMerger {
    date: String,
    verified_threshold: f64,
}

impl Default for CitationMerger {
    fn default() -> Self {
        Self::new(VERIFIED_QUALITY_THRESHOLD)
    }
}

impl CitationMerger {
    /// Merger stamping today's local date.
    pub fn new(verified_threshold: f64) -> Self {
        Self::with_date(Local::now().format("%Y-%m-%d").to_string(), verified_threshold)
    }

    pub fn with_date(date: impl Into<String>, verified_threshold: f64) -> Self {
        Self { date: date.into(), verified_threshold }
    }

    /// Apply a review decision. Returns whether the document changed.
    pub fn apply_decision(
        &self,
        doc: &mut CitationDocument,
        scale_name: &str,
        decision: &ReviewDecision,
    ) -> Result<bool> {
        match decision {
            ReviewDecision::Skip => Ok(false),
            ReviewDecision::Approve(sources) => {
                let best = sources.first().ok_or_else(|| CurateError::InvalidDecision {
                    scale: scale_name.to_string(),
                    message: "approve requires at least one source".to_string(),
                })?;
                let mut entry = doc
                    .get(scale_name)
                    .unwrap_or_else(|| CitationEntry::placeholder(APPROVED_PLACEHOLDER));
                let reference = self.reference(
                    best,
                    "Manual Review",
                    format!("MANUALLY VERIFIED - Quality: {:.2}", best.quality),
                );
                entry.references.get_or_insert_with(Vec::new).push(reference);
                entry.sort_references();
                entry.validation_status = Some(ValidationStatus::ManuallyVerified);
                entry.validation_date = Some(self.date.clone());
                doc.set(scale_name, &entry);
                tracing::debug!("Approved {} citing {}", scale_name, best.url);
                Ok(true)
            }
            ReviewDecision::Reject => {
                let mut entry = doc
                    .get(scale_name)
                    .unwrap_or_else(|| CitationEntry::placeholder(REJECTED_PLACEHOLDER));
                entry.validation_status = Some(ValidationStatus::LimitedDocumentation);
                entry.validation_date = Some(self.date.clone());
                doc.set(scale_name, &entry);
                tracing::debug!("Marked {} as limited-documentation", scale_name);
                Ok(true)
            }
        }
    }

    /// Import KEEP and REVIEW records. References, status and date are
    /// replaced; description and cultural context are kept.
    pub fn import(&self, doc: &mut CitationDocument, records: &[ScaleRecord]) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();
        for record in records {
            let status = match record.recommendation {
                Recommendation::Keep => ValidationStatus::Verified,
                Recommendation::Review => ValidationStatus::NeedsReview,
                Recommendation::Remove => continue,
            };
            let mut references: Vec<Reference> = record
                .sources
                .iter()
                .map(|source| {
                    self.reference(
                        source,
                        "Web Validation",
                        format!("VERIFIED via Web Search - Score: {:.2}", source.quality),
                    )
                })
                .collect();
            references.sort_by(|a, b| b.score().total_cmp(&a.score()));

            let mut entry = match doc.get(&record.scale_name) {
                Some(existing) => existing,
                None => {
                    outcome.created += 1;
                    CitationEntry::default()
                }
            };
            outcome.references += references.len();
            entry.references = Some(references);
            entry.loose_references.clear();
            match status {
                ValidationStatus::Verified => outcome.verified += 1,
                _ => outcome.needs_review += 1,
            }
            entry.validation_status = Some(status);
            entry.validation_date = Some(self.date.clone());
            doc.set(&record.scale_name, &entry);
            outcome.updated += 1;
        }
        tracing::debug!("Imported {} citation updates", outcome.updated);
        outcome
    }

    fn reference(&self, source: &SourceRef, origin: &str, status: String) -> Reference {
        Reference {
            ref_type: Some("verified_source".to_string()),
            title: Some(source.title.clone()),
            url: Some(source.url.clone()),
            description: Some(source.snippet.clone()),
            source: Some(origin.to_string()),
            category: Some(Category::for_quality(source.quality, self.verified_threshold)),
            verification_status: Some(status),
            verification_date: Some(self.date.clone()),
            content_score: Some(source.quality),
            extra: Vec::new(),
        }
    }
}
