//! Exclusion policy: which directories are pruned and which files are eligible.
//!
//! Directory pruning and file admission are separate predicates. The walker
//! consults [`ExclusionPolicy::prunes_dir`] before descending, and
//! [`ExclusionPolicy::check_file`] once per candidate file.

use std::collections::BTreeSet;
use std::path::Path;

/// Directory names that are never descended into.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".next",
    "coverage",
    ".cache",
    "__pycache__",
    ".venv",
    "venv",
];

/// Substrings that disqualify a file by base name (lockfiles, minified assets).
pub const DEFAULT_SKIP_PATTERNS: &[&str] =
    &["package-lock.json", "yarn.lock", ".min.js", ".min.css"];

/// Extensions eligible for conversion, leading dot included.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".md", ".ts", ".tsx", ".js", ".jsx", ".json", ".sql", ".txt"];

/// Why a file was or was not admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileVerdict {
    Eligible,
    /// Base name contains this excluded substring
    ExcludedName(String),
    ExtensionNotAllowed,
}

impl FileVerdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, FileVerdict::Eligible)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPolicy {
    skip_dirs: BTreeSet<String>,
    skip_patterns: BTreeSet<String>,
    extensions: BTreeSet<String>,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            skip_patterns: DEFAULT_SKIP_PATTERNS.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExclusionPolicy {
    /// A policy with no exclusions and an empty allow-list (admits nothing).
    pub fn empty() -> Self {
        Self {
            skip_dirs: BTreeSet::new(),
            skip_patterns: BTreeSet::new(),
            extensions: BTreeSet::new(),
        }
    }

    pub fn with_skip_dir(mut self, name: impl Into<String>) -> Self {
        self.skip_dirs.insert(name.into());
        self
    }

    pub fn with_skip_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.skip_patterns.insert(pattern.into());
        self
    }

    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.extensions.insert(ext.into());
        self
    }

    /// Whether a directory with this name should be pruned before descent.
    pub fn prunes_dir(&self, name: &str) -> bool {
        self.skip_dirs.contains(name)
    }

    /// Check a file's base name against the name exclusions, then the
    /// extension allow-list. Short-circuits on the first failing check.
    pub fn check_file(&self, file_name: &str) -> FileVerdict {
        if let Some(pattern) = self
            .skip_patterns
            .iter()
            .find(|pattern| file_name.contains(pattern.as_str()))
        {
            return FileVerdict::ExcludedName(pattern.clone());
        }

        match extension_of(file_name) {
            Some(ext) if self.extensions.contains(ext) => FileVerdict::Eligible,
            _ => FileVerdict::ExtensionNotAllowed,
        }
    }

    pub fn skip_dirs(&self) -> impl Iterator<Item = &str> {
        self.skip_dirs.iter().map(String::as_str)
    }
}

/// Final extension including the leading dot, `None` for dotfiles like
/// `.gitignore` and names without a dot.
fn extension_of(file_name: &str) -> Option<&str> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    // Slice from the original to keep the dot without allocating.
    Some(&file_name[file_name.len() - ext.len() - 1..])
}
