//! Configuration loading
//!
//! Loads an explicit `--config` file or one discovered in the working
//! directory. Missing files mean defaults.

pub mod loader;

pub use loader::load_config;
