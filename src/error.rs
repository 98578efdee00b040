use crate::transform::TransformError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors detected before any traversal starts.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("{} is not a valid directory", path.display())]
    InvalidRoot { path: PathBuf },

    #[error("Failed to resolve root {}: {source}", path.display())]
    Canonicalize {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Per-file failures. Caught at the file boundary, counted, never fatal.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    #[error("Failed to convert {}: {source}", path.display())]
    Transform {
        path: PathBuf,
        source: TransformError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Refusing to write outside root: {}", path.display())]
    OutsideRoot { path: PathBuf },
}

impl ConversionError {
    /// The file this error concerns.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ConversionError::Read { path, .. }
            | ConversionError::Decode { path, .. }
            | ConversionError::Transform { path, .. }
            | ConversionError::Write { path, .. }
            | ConversionError::OutsideRoot { path } => path,
        }
    }
}
