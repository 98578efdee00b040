use crate::config::schema::RewriteConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn a policy file into a [`RewriteConfig`]. Every variant
/// names the file so the CLI can report it as-is.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read rewrite config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed rewrite config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml_edit::de::Error,
    },

    #[error("invalid rewrite config {}: policy.{field} entry {value:?} {reason}", path.display())]
    InvalidEntry {
        path: PathBuf,
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Read, parse, and validate a policy file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RewriteConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &contents)
}

fn parse(path: &Path, input: &str) -> Result<RewriteConfig, ConfigError> {
    let config: RewriteConfig =
        toml_edit::de::from_str(input).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    config
        .policy
        .validate()
        .map_err(|bad| ConfigError::InvalidEntry {
            path: path.to_path_buf(),
            field: bad.field,
            value: bad.value,
            reason: bad.reason,
        })?;

    Ok(config)
}
