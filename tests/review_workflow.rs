//! End-to-end review workflow over temporary files with an offline search provider.

use anyhow::Result;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use scale_curator::citations::{Category, CitationFile, CitationMerger, ValidationStatus};
use scale_curator::classify::KeywordHeuristic;
use scale_curator::domain::{ReviewDecision, ScaleRecord, SearchConfig, SourceRef};
use scale_curator::review::{Choice, Prompter, ReviewSession};
use scale_curator::search::{EvidenceSearch, SearchError, SearchHit, SearchProvider};
use scale_curator::store::{ReviewTracker, ValidationStore};

/// Returns the same documented hits for every query.
struct OfflineProvider {
    hits: Vec<SearchHit>,
}

impl SearchProvider for OfflineProvider {
    fn text(&self, _query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

fn documented_hits() -> Vec<SearchHit> {
    vec![
        SearchHit {
            title: "Dorian mode - Wikipedia".to_string(),
            url: "https://en.wikipedia.org/wiki/Dorian_mode".to_string(),
            snippet: "The Dorian mode is a minor scale with a raised sixth degree".to_string(),
        },
        SearchHit {
            title: "Dorian scale lesson".to_string(),
            url: "https://www.musictheory.net/lessons/dorian".to_string(),
            snippet: "Notes and intervals of the mode".to_string(),
        },
    ]
}

fn offline_search(hits: Vec<SearchHit>) -> EvidenceSearch<OfflineProvider> {
    EvidenceSearch::new(OfflineProvider { hits }, &SearchConfig::default())
        .with_delays(Duration::ZERO, Duration::ZERO)
}

struct ScriptedPrompter {
    choices: VecDeque<Choice>,
    fallback: Choice,
    keep_going: bool,
    decided: Vec<String>,
}

impl ScriptedPrompter {
    fn always(choice: Choice) -> Self {
        Self { choices: VecDeque::new(), fallback: choice, keep_going: true, decided: Vec::new() }
    }
}

impl Prompter for ScriptedPrompter {
    fn decide(&mut self, record: &ScaleRecord, _sources: &[SourceRef]) -> Result<Choice> {
        self.decided.push(record.scale_name.clone());
        Ok(self.choices.pop_front().unwrap_or(self.fallback))
    }

    fn continue_batch(&mut self, _done: usize, _batch_len: usize) -> Result<bool> {
        Ok(self.keep_going)
    }
}

fn review_store(n: usize) -> ValidationStore {
    let records = (0..n)
        .map(|i| {
            serde_json::from_value(serde_json::json!({
                "scale_name": format!("scale_{i:02}"),
                "display_name": format!("Scale {i:02}"),
                "recommendation": "REVIEW",
                "quality_score": 0.3,
            }))
            .expect("record")
        })
        .collect();
    ValidationStore::from_records(records)
}

fn engine_with(citations: &str) -> String {
    format!(
        "class MusicTheoryEngine {{\n    constructor() {{\n        this.scaleCitations = {{\n{citations}\n        }};\n    }}\n}}\n"
    )
}

#[test]
fn twelve_review_scales_take_two_batches() {
    let tmp = TempDir::new().expect("tmp");
    let store = review_store(12);
    let progress_path = tmp.path().join("review_progress.json");
    let js_path = tmp.path().join("engine.js");
    fs::write(&js_path, engine_with("")).expect("engine");

    let mut tracker = ReviewTracker::open(&progress_path, &store).expect("tracker");
    let first = tracker.get_next_batch(10);
    let unique: HashSet<_> = first.iter().map(|r| r.scale_name.clone()).collect();
    assert_eq!(first.len(), 10);
    assert_eq!(unique.len(), 10);

    for record in &first {
        tracker.record_decision(&record.scale_name, &ReviewDecision::Reject).expect("reject");
    }

    // A fresh tracker sees the persisted state.
    let tracker = ReviewTracker::open(&progress_path, &store).expect("reopen");
    let second = tracker.get_next_batch(10);
    assert_eq!(second.len(), 2);
    assert!(second.iter().all(|r| !unique.contains(&r.scale_name)));
    assert_eq!(tracker.progress().rejected_scales.len(), 10);
    assert_eq!(tracker.progress().remaining_scales, vec!["scale_10", "scale_11"]);
}

#[test]
fn session_rejects_a_batch_then_finishes_the_rest() {
    let tmp = TempDir::new().expect("tmp");
    let store = review_store(12);
    let js_path = tmp.path().join("engine.js");
    fs::write(&js_path, engine_with("")).expect("engine");

    let search = offline_search(vec![]);
    let scorer = KeywordHeuristic;
    let session =
        ReviewSession::new(&search, &scorer, CitationMerger::with_date("2025-07-14", 0.7), 10);
    let mut tracker =
        ReviewTracker::open(&tmp.path().join("progress.json"), &store).expect("tracker");
    let mut citations = CitationFile::open(&js_path).expect("citations");

    let mut prompter = ScriptedPrompter::always(Choice::Reject);
    let stats = session.run(&mut tracker, &mut citations, &mut prompter).expect("first batch");
    assert_eq!(stats.rejected, 10);
    assert_eq!(stats.remaining, 2);
    assert!(!stats.complete);

    let stats = session.run(&mut tracker, &mut citations, &mut prompter).expect("second batch");
    assert_eq!(stats.rejected, 2);
    assert_eq!(stats.remaining, 0);
    assert!(stats.complete);

    let reread = CitationFile::open(&js_path).expect("reread");
    let entry = reread.document().get("scale_11").expect("entry");
    assert_eq!(entry.validation_status, Some(ValidationStatus::LimitedDocumentation));
    assert_eq!(entry.description.as_deref(), Some("Scale with limited documentation available"));
}

#[test]
fn skip_and_quit_leave_scales_pending() {
    let tmp = TempDir::new().expect("tmp");
    let store = review_store(3);
    let js_path = tmp.path().join("engine.js");
    fs::write(&js_path, engine_with("")).expect("engine");

    let search = offline_search(vec![]);
    let scorer = KeywordHeuristic;
    let session = ReviewSession::new(&search, &scorer, CitationMerger::default(), 10);
    let mut tracker = ReviewTracker::in_memory(&store);
    let mut citations = CitationFile::open(&js_path).expect("citations");

    let mut prompter = ScriptedPrompter::always(Choice::Quit);
    prompter.choices = VecDeque::from([Choice::Skip, Choice::Reject]);
    let stats = session.run(&mut tracker, &mut citations, &mut prompter).expect("run");

    assert_eq!(prompter.decided, vec!["scale_00", "scale_01", "scale_02"]);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.rejected, 1);
    assert!(stats.cancelled);
    let pending: Vec<_> = tracker.get_next_batch(10).into_iter().map(|r| r.scale_name).collect();
    assert_eq!(pending, vec!["scale_00", "scale_02"]);
    // The reject rewrote the citations file.
    assert!(js_path.with_file_name("engine.js.backup").exists());
}

#[test]
fn approving_dorian_orders_references_by_score() {
    let tmp = TempDir::new().expect("tmp");
    let js_path = tmp.path().join("engine.js");
    let original = engine_with(
        r#"            dorian: {
                description: 'Minor mode with a raised sixth',
                culturalContext: { region: 'Western', historicalPeriod: 'Medieval' },
                references: [
                    { type: 'book', title: 'Tonal Harmony', category: 'verified', contentScore: 0.7 }
                ],
                validationStatus: 'needs-review',
                validationDate: '2025-01-01'
            }"#,
    );
    fs::write(&js_path, &original).expect("engine");

    let store: ValidationStore = serde_json::from_value(serde_json::json!({
        "results": [{"scale_name": "dorian", "display_name": "Dorian", "recommendation": "REVIEW",
                     "intervals": [0, 2, 3, 5, 7, 9, 10], "quality_score": 0.45}]
    }))
    .expect("store");

    let search = offline_search(documented_hits());
    let scorer = KeywordHeuristic;
    let session =
        ReviewSession::new(&search, &scorer, CitationMerger::with_date("2025-07-14", 0.7), 10);
    let mut tracker =
        ReviewTracker::open(&tmp.path().join("progress.json"), &store).expect("tracker");
    let mut citations = CitationFile::open(&js_path).expect("citations");

    let mut prompter = ScriptedPrompter::always(Choice::Approve);
    let stats = session.run(&mut tracker, &mut citations, &mut prompter).expect("run");
    assert_eq!(stats.approved, 1);
    assert!(stats.complete);

    let reread = CitationFile::open(&js_path).expect("reread");
    let entry = reread.document().get("dorian").expect("dorian");
    assert_eq!(entry.validation_status, Some(ValidationStatus::ManuallyVerified));
    assert_eq!(entry.validation_date.as_deref(), Some("2025-07-14"));
    assert_eq!(entry.description.as_deref(), Some("Minor mode with a raised sixth"));
    let ctx = entry.cultural_context.expect("context");
    assert_eq!(ctx.historical_period.as_deref(), Some("Medieval"));

    let refs = entry.references.expect("references");
    let scores: Vec<f64> = refs.iter().map(|r| r.score()).collect();
    assert_eq!(scores, vec![0.9, 0.7]);
    assert_eq!(refs[0].source.as_deref(), Some("Manual Review"));
    assert_eq!(refs[0].category, Some(Category::Verified));
    assert_eq!(refs[0].verification_status.as_deref(), Some("MANUALLY VERIFIED - Quality: 0.90"));
    assert_eq!(refs[1].title.as_deref(), Some("Tonal Harmony"));

    let approved = &tracker.progress().approved_sources["dorian"];
    assert_eq!(approved.len(), 1);
    assert!(approved[0].url.contains("wikipedia"));

    let backup = fs::read_to_string(tmp.path().join("engine.js.backup")).expect("backup");
    assert_eq!(backup, original);
}
