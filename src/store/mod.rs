//! Persistent JSON stores: validation results, review progress and the
//! cleanup plans that rewrite them.

pub mod cleanup;
pub mod progress;
pub mod validation;

pub use cleanup::{CleanupOutcome, CleanupPlan, Promotion};
pub use progress::{ReviewProgress, ReviewTracker};
pub use validation::ValidationStore;
