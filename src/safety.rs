use std::path::{Path, PathBuf};
use thiserror::Error;

/// Boundary check so that rewrites never land outside the traversal root.
#[derive(Debug, Clone)]
pub struct TreeGuard {
    /// Canonical path to the traversal root
    root: PathBuf,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Path is outside root: {path} (root: {root})")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl TreeGuard {
    /// Create a guard for the given root.
    ///
    /// The root is canonicalized so that symlinked roots compare correctly.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let root = root.as_ref().canonicalize()?;
        Ok(Self { root })
    }

    /// Check that a path resolves inside the root.
    ///
    /// Returns the canonical path. Call immediately before writing; the path
    /// is re-resolved every time.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        // Resolves symlinks and .. components
        let canonical = absolute.canonicalize()?;

        if !canonical.starts_with(&self.root) {
            return Err(SafetyError::OutsideRoot {
                path: canonical,
                root: self.root.clone(),
            });
        }

        Ok(canonical)
    }
}
