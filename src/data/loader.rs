//! Load simulation configs from JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::ConfigError;
use crate::simulator::SimulationConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config {path}: {source}")]
    Invalid { path: PathBuf, source: ConfigError },
}

pub fn parse_config(raw: &str) -> Result<SimulationConfig, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Reads and parses a config without validating it.
pub fn read_config(path: impl AsRef<Path>) -> Result<SimulationConfig, LoadError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads, parses and validates a config.
pub fn load_config(path: impl AsRef<Path>) -> Result<SimulationConfig, LoadError> {
    let path = path.as_ref();
    let config = read_config(path)?;
    config.validate().map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::process;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("dpsim-loader-{}-{name}", process::id()));
        fs::write(&path, contents).expect("write scratch file");
        path
    }

    #[test]
    fn loads_partial_config_with_defaults() {
        let path = scratch_file(
            "partial.json",
            r#"{"trials": 5, "min_time": 60, "max_time": 60, "actor": {"auras": ["flask_of_pure_death"]}}"#,
        );
        let config = load_config(&path).expect("load");
        assert_eq!(config.trials, 5);
        assert_eq!(config.actor.auras.len(), 1);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_config("/definitely/not/here.json").expect_err("missing");
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let path = scratch_file("broken.json", "{ trials: ");
        assert!(matches!(load_config(&path), Err(LoadError::Parse { .. })));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_values_are_reported_after_parsing() {
        let path = scratch_file("inverted.json", r#"{"min_time": 200, "max_time": 100}"#);
        assert!(matches!(
            load_config(&path),
            Err(LoadError::Invalid {
                source: ConfigError::InvertedFightLength { .. },
                ..
            })
        ));
        let _ = fs::remove_file(path);
    }
}
