//! Config file loading

use crate::domain::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const NESTED_SECTION: &str = "scale-curator";

pub fn load_config(search_root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(search_root),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    if config_path_provided && !config_file.exists() {
        anyhow::bail!("Config file not found: {}", config_file.display());
    }

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            // Auto-discovered: warn and fall back to defaults
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

/// Parse TOML config, supporting a nested [scale-curator] table.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested scale-curator mapping.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    // An empty YAML document parses as null
    if raw.is_null() {
        return Ok(Config::default());
    }

    let config_val = match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(search_root: &Path) -> Option<PathBuf> {
    let candidates = [
        "scale-curator.toml",
        ".scale-curator.toml",
        "scale-curator.yml",
        ".scale-curator.yml",
        "scale-curator.yaml",
        ".scale-curator.yaml",
    ];

    candidates.iter().map(|candidate| search_root.join(candidate)).find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("scale-curator.toml"),
            "batch_size = 4\n[search]\nmax_results = 8\nquery_delay_ms = 1500\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.batch_size, 4);
        assert_eq!(cfg.search.max_results, 8);
        assert_eq!(cfg.search.query_delay_ms, 1500);
        // untouched keys keep their defaults
        assert_eq!(cfg.search.error_delay_ms, 3_000);
    }

    #[test]
    fn test_nested_toml_section() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[scale-curator]\nprogress_file = 'progress/state.json'\n")
            .expect("write");

        let cfg = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(cfg.progress_file, PathBuf::from("progress/state.json"));
    }

    #[test]
    fn test_yaml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join(".scale-curator.yml"),
            "citations:\n  verified_threshold: 0.8\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert!((cfg.citations.verified_threshold - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "batch_size = \"ten\"\n").expect("write");

        let result = load_config(tmp.path(), Some(&path));
        assert!(result.is_err(), "explicit config with invalid type should return Err");
    }

    #[test]
    fn test_explicit_missing_config_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let result = load_config(tmp.path(), Some(&tmp.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_type_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("scale-curator.toml"), "batch_size = [1, 2]\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg.batch_size, Config::default().batch_size);
    }
}
