use crate::policy::ExclusionPolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct RewriteConfig {
    #[serde(default)]
    pub policy: PolicySection,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    /// Start from the built-in sets instead of empty ones
    #[serde(default = "default_true")]
    pub inherit_defaults: bool,
    #[serde(default)]
    pub skip_dirs: Vec<String>,
    #[serde(default)]
    pub skip_patterns: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            inherit_defaults: true,
            skip_dirs: Vec::new(),
            skip_patterns: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// The first `[policy]` entry that cannot be turned into an exclusion rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadEntry {
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl BadEntry {
    fn new(field: &'static str, value: &str, reason: &'static str) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason,
        }
    }
}

impl PolicySection {
    /// Reject entries that would silently match nothing (or everything).
    pub fn validate(&self) -> Result<(), BadEntry> {
        for dir in &self.skip_dirs {
            if dir.trim().is_empty() {
                return Err(BadEntry::new("skip_dirs", dir, "must not be blank"));
            }
            if dir.contains(['/', '\\']) {
                return Err(BadEntry::new(
                    "skip_dirs",
                    dir,
                    "must be a single directory name, not a path",
                ));
            }
        }

        // An empty substring is contained in every name.
        if let Some(pattern) = self.skip_patterns.iter().find(|p| p.is_empty()) {
            return Err(BadEntry::new("skip_patterns", pattern, "must not be empty"));
        }

        for ext in &self.extensions {
            if !ext.starts_with('.') || ext.len() == 1 {
                return Err(BadEntry::new(
                    "extensions",
                    ext,
                    "must be '.' followed by the extension",
                ));
            }
        }

        Ok(())
    }

    /// Build the exclusion policy described by this section.
    pub fn to_policy(&self) -> ExclusionPolicy {
        let base = if self.inherit_defaults {
            ExclusionPolicy::default()
        } else {
            ExclusionPolicy::empty()
        };

        let base = self
            .skip_dirs
            .iter()
            .fold(base, |policy, dir| policy.with_skip_dir(dir.as_str()));
        let base = self
            .skip_patterns
            .iter()
            .fold(base, |policy, pattern| policy.with_skip_pattern(pattern.as_str()));
        self.extensions
            .iter()
            .fold(base, |policy, ext| policy.with_extension(ext.as_str()))
    }
}

impl RewriteConfig {
    pub fn to_policy(&self) -> ExclusionPolicy {
        self.policy.to_policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(skip_dirs: &[&str], skip_patterns: &[&str], extensions: &[&str]) -> PolicySection {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        PolicySection {
            inherit_defaults: true,
            skip_dirs: owned(skip_dirs),
            skip_patterns: owned(skip_patterns),
            extensions: owned(extensions),
        }
    }

    #[test]
    fn test_valid_section() {
        assert_eq!(section(&["vendor"], &[".bundle."], &[".html"]).validate(), Ok(()));
    }

    #[test]
    fn test_blank_dir_rejected() {
        let err = section(&["  "], &[], &[]).validate().unwrap_err();
        assert_eq!(err.field, "skip_dirs");
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let err = section(&[], &["ok", ""], &[]).validate().unwrap_err();
        assert_eq!(err.field, "skip_patterns");
        assert_eq!(err.value, "");
    }

    #[test]
    fn test_bare_dot_extension_rejected() {
        let err = section(&[], &[], &["."]).validate().unwrap_err();
        assert_eq!(err, BadEntry::new("extensions", ".", "must be '.' followed by the extension"));
    }
}
