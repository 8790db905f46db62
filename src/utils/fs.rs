//! File helpers: existence checks, backups and atomic replacement.

use crate::error::CurateError;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fail with [`CurateError::MissingInput`] when `path` does not exist.
pub fn ensure_exists(path: &Path, kind: &'static str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CurateError::missing(kind, path).into())
    }
}

/// Sibling `<file>.backup` path.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".backup");
    PathBuf::from(name)
}

/// Copy `path` to its `.backup` sibling, overwriting the previous backup.
pub fn write_backup(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup).with_context(|| {
        format!("Cannot create backup {} of {}", backup.display(), path.display())
    })?;
    tracing::debug!("Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

/// Replace `path` with `contents` via a temporary file in the same directory,
/// so a crash leaves either the old or the new file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create directory {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Cannot create temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("Cannot write temporary file for {}", path.display()))?;
    tmp.persist(path).with_context(|| format!("Cannot replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("web/music-theory-engine.js")),
            PathBuf::from("web/music-theory-engine.js.backup")
        );
    }

    #[test]
    fn write_backup_overwrites_previous_copy() {
        let tmp = TempDir::new().expect("tmp");
        let file = tmp.path().join("engine.js");
        fs::write(&file, "first").expect("write");
        write_backup(&file).expect("backup");
        fs::write(&file, "second").expect("write");
        let backup = write_backup(&file).expect("backup");
        assert_eq!(fs::read_to_string(backup).expect("read"), "second");
    }

    #[test]
    fn write_atomic_replaces_contents() {
        let tmp = TempDir::new().expect("tmp");
        let file = tmp.path().join("progress.json");
        fs::write(&file, "old").expect("write");
        write_atomic(&file, "new").expect("atomic");
        assert_eq!(fs::read_to_string(&file).expect("read"), "new");
    }

    #[test]
    fn ensure_exists_reports_missing_input() {
        let err = ensure_exists(Path::new("/definitely/not/here.json"), "Validation JSON file")
            .unwrap_err();
        assert!(err.to_string().contains("Validation JSON file not found"));
    }
}
