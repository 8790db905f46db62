//! Batch review sessions
//!
//! Walks the next batch of undecided REVIEW scales: fresh evidence is searched
//! and classified, the reviewer decides, the decision is merged into the
//! citations file and recorded in the progress tracker. Both files are
//! written after every decided scale, so quitting never loses a decision.

use anyhow::Result;

use crate::citations::{CitationFile, CitationMerger};
use crate::classify::ScoringStrategy;
use crate::domain::{ReviewDecision, ScaleRecord, SourceRef};
use crate::search::{EvidenceSearch, SearchProvider};
use crate::store::ReviewTracker;

/// What the reviewer picked for one scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Approve,
    Reject,
    Skip,
    /// End the session now; the current scale stays pending.
    Quit,
}

/// The interactive side of a session.
pub trait Prompter {
    /// Called before searching a scale.
    fn announce(&mut self, _position: usize, _batch_len: usize, _record: &ScaleRecord) {}

    /// Ask for a decision. `Approve` must only be offered when `sources` is non-empty.
    fn decide(&mut self, record: &ScaleRecord, sources: &[SourceRef]) -> Result<Choice>;

    /// Asked between scales; `false` ends the session.
    fn continue_batch(&mut self, done: usize, batch_len: usize) -> Result<bool>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub batch_len: usize,
    pub processed: usize,
    pub approved: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub remaining: usize,
    pub cancelled: bool,
    /// Every REVIEW scale has been decided.
    pub complete: bool,
}

pub struct ReviewSession<'a, P, S> {
    search: &'a EvidenceSearch<P>,
    scorer: &'a S,
    merger: CitationMerger,
    batch_size: usize,
}

impl<'a, P: SearchProvider, S: ScoringStrategy> ReviewSession<'a, P, S> {
    pub fn new(
        search: &'a EvidenceSearch<P>,
        scorer: &'a S,
        merger: CitationMerger,
        batch_size: usize,
    ) -> Self {
        Self { search, scorer, merger, batch_size }
    }

    /// Run one batch.
    pub fn run(
        &self,
        tracker: &mut ReviewTracker,
        citations: &mut CitationFile,
        prompter: &mut dyn Prompter,
    ) -> Result<SessionStats> {
        let batch = tracker.get_next_batch(self.batch_size);
        let mut stats = SessionStats { batch_len: batch.len(), ..SessionStats::default() };

        if batch.is_empty() {
            stats.complete = true;
            return Ok(stats);
        }

        for (idx, record) in batch.iter().enumerate() {
            let position = idx + 1;
            prompter.announce(position, batch.len(), record);

            let hits = self.search.search(&record.scale_name);
            let sources =
                self.scorer.classify(&record.scale_name, record.label(), &hits).sources;

            let decision = match prompter.decide(record, &sources)? {
                Choice::Quit => {
                    tracing::info!("Session ended by reviewer at {}", record.scale_name);
                    stats.cancelled = true;
                    break;
                }
                Choice::Approve if sources.is_empty() => {
                    tracing::warn!(
                        "Cannot approve {} without sources; leaving it pending",
                        record.scale_name
                    );
                    ReviewDecision::Skip
                }
                Choice::Approve => ReviewDecision::Approve(sources),
                Choice::Reject => ReviewDecision::Reject,
                Choice::Skip => ReviewDecision::Skip,
            };

            self.commit(tracker, citations, record, &decision)?;
            match decision {
                ReviewDecision::Approve(_) => stats.approved += 1,
                ReviewDecision::Reject => stats.rejected += 1,
                ReviewDecision::Skip => stats.skipped += 1,
            }
            if !matches!(decision, ReviewDecision::Skip) {
                stats.processed += 1;
            }

            if position < batch.len() && !prompter.continue_batch(position, batch.len())? {
                stats.cancelled = true;
                break;
            }
        }

        tracker.save()?;
        stats.remaining = tracker.remaining();
        stats.complete = !stats.cancelled && stats.remaining == 0;
        Ok(stats)
    }

    /// Citations are written before progress; a scale is only marked
    /// reviewed once its citation change is on disk.
    fn commit(
        &self,
        tracker: &mut ReviewTracker,
        citations: &mut CitationFile,
        record: &ScaleRecord,
        decision: &ReviewDecision,
    ) -> Result<()> {
        if self.merger.apply_decision(citations.document_mut(), &record.scale_name, decision)? {
            citations.save()?;
        }
        tracker.record_decision(&record.scale_name, decision)
    }
}
