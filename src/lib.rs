//! scale-curator: curate the musical-scale database of a JavaScript theory engine
//!
//! Extracts scale definitions, gathers web evidence, classifies each scale as
//! KEEP / REVIEW / REMOVE, runs resumable manual reviews and merges the
//! resulting citations back into the engine's `scaleCitations` object.

pub mod citations;
pub mod classify;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod literal;
pub mod prune;
pub mod render;
pub mod review;
pub mod search;
pub mod store;
pub mod utils;
