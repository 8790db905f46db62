//! Utility functions

pub mod fs;
pub mod text;

pub use fs::{backup_path, ensure_exists, write_atomic, write_backup};
pub use text::{display_name, truncate_chars};
