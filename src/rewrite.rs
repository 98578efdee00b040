//! The tree rewriter: walk, filter, transform, and conditionally rewrite.

use crate::error::{ConfigurationError, ConversionError};
use crate::policy::{ExclusionPolicy, FileVerdict};
use crate::safety::{SafetyError, TreeGuard};
use crate::sink::{NullSink, ProgressSink};
use crate::transform::Transform;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Aggregate result of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files whose content changed (and were rewritten unless dry-run)
    pub converted: usize,
    /// Per-file failures
    pub errors: usize,
    /// Eligible files visited, whatever their outcome
    pub scanned: usize,
    /// Run stopped early on the cancellation flag
    pub cancelled: bool,
}

impl Summary {
    /// Eligible files left as they were. Traversal errors count toward
    /// `errors` but not `scanned`, hence the saturation.
    pub fn unchanged(&self) -> usize {
        self.scanned
            .saturating_sub(self.converted)
            .saturating_sub(self.errors)
    }
}

/// One eligible file's content before and after the transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub original: String,
    pub converted: String,
}

impl FileRecord {
    pub fn changed(&self) -> bool {
        self.original != self.converted
    }
}

/// Walks a directory tree and rewrites eligible files through a [`Transform`].
pub struct TreeRewriter<'t> {
    policy: ExclusionPolicy,
    transform: &'t dyn Transform,
    dry_run: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'t> TreeRewriter<'t> {
    pub fn new(policy: ExclusionPolicy, transform: &'t dyn Transform) -> Self {
        Self {
            policy,
            transform,
            dry_run: false,
            cancel: None,
        }
    }

    /// Compare only; never write.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop between files once `flag` is set.
    pub fn cancel_on(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn run(&self, root: impl AsRef<Path>) -> Result<Summary, ConfigurationError> {
        self.run_with_sink(root, &mut NullSink)
    }

    /// Rewrite every eligible file under `root`.
    ///
    /// Only an invalid root fails the run. Per-file failures are reported to
    /// `sink`, counted in the summary, and traversal moves on.
    pub fn run_with_sink(
        &self,
        root: impl AsRef<Path>,
        sink: &mut dyn ProgressSink,
    ) -> Result<Summary, ConfigurationError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ConfigurationError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }
        let guard = TreeGuard::new(root).map_err(|e| match e {
            SafetyError::Canonicalize(source) => ConfigurationError::Canonicalize {
                path: root.to_path_buf(),
                source,
            },
            SafetyError::OutsideRoot { .. } => ConfigurationError::InvalidRoot {
                path: root.to_path_buf(),
            },
        })?;

        let mut summary = Summary::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.prunes(entry));

        for entry in walker {
            if self.is_cancelled() {
                debug!("cancellation requested, stopping traversal");
                summary.cancelled = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let error = ConversionError::Read {
                        path: err.path().unwrap_or(root).to_path_buf(),
                        source: err.into(),
                    };
                    warn!(error = %error, "traversal error");
                    summary.errors += 1;
                    sink.failed(&error);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let verdict = self.policy.check_file(&file_name);
            if !verdict.is_eligible() {
                if let FileVerdict::ExcludedName(pattern) = &verdict {
                    debug!(path = %entry.path().display(), %pattern, "skipping excluded file name");
                }
                continue;
            }

            summary.scanned += 1;
            match self.rewrite_file(entry.path(), &guard) {
                Ok(record) if record.changed() => {
                    summary.converted += 1;
                    sink.converted(&record);
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(error = %error, "conversion failed");
                    summary.errors += 1;
                    sink.failed(&error);
                }
            }
        }

        sink.finished(&summary);
        Ok(summary)
    }

    /// Read, transform, and (if changed and not a dry run) overwrite one file.
    pub fn rewrite_file(&self, path: &Path, guard: &TreeGuard) -> Result<FileRecord, ConversionError> {
        let bytes = fs::read(path).map_err(|source| ConversionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let original = String::from_utf8(bytes).map_err(|source| ConversionError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let converted =
            self.transform
                .convert(&original)
                .map_err(|source| ConversionError::Transform {
                    path: path.to_path_buf(),
                    source,
                })?;

        let record = FileRecord {
            path: path.to_path_buf(),
            original,
            converted,
        };

        if record.changed() && !self.dry_run {
            let target = guard.validate_path(path).map_err(|e| match e {
                SafetyError::OutsideRoot { path, .. } => ConversionError::OutsideRoot { path },
                SafetyError::Canonicalize(source) => ConversionError::Write {
                    path: path.to_path_buf(),
                    source,
                },
            })?;
            overwrite(&target, record.converted.as_bytes()).map_err(|source| {
                ConversionError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }

        Ok(record)
    }

    /// Directory-pruning predicate. The root itself is never pruned.
    fn prunes(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let pruned = entry
            .file_name()
            .to_str()
            .is_some_and(|name| self.policy.prunes_dir(name));
        if pruned {
            debug!(path = %entry.path().display(), "pruning excluded directory");
        }
        pruned
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Truncate-then-write an existing file. Never creates the file.
fn overwrite(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(content)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use crate::transform::{FnTransform, Identity, TransformError};

    fn upper() -> FnTransform<impl Fn(&str) -> Result<String, TransformError>> {
        FnTransform::new("upper", |s: &str| Ok(s.to_uppercase()))
    }

    #[test]
    fn test_rewrite_file_changed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "hello").unwrap();

        let transform = upper();
        let rewriter = TreeRewriter::new(ExclusionPolicy::default(), &transform);
        let guard = TreeGuard::new(dir.path()).unwrap();
        let record = rewriter.rewrite_file(&file, &guard).unwrap();

        assert!(record.changed());
        assert_eq!(fs::read_to_string(&file).unwrap(), "HELLO");
    }

    #[test]
    fn test_overwrite_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "a much longer original body").unwrap();

        let transform = FnTransform::new("short", |_: &str| Ok("x".to_string()));
        let rewriter = TreeRewriter::new(ExclusionPolicy::default(), &transform);
        let guard = TreeGuard::new(dir.path()).unwrap();
        rewriter.rewrite_file(&file, &guard).unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "x");
    }

    #[test]
    fn test_overwrite_never_creates() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        assert!(overwrite(&missing, b"x").is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.md");
        fs::write(&file, "hello").unwrap();

        let transform = upper();
        let summary = TreeRewriter::new(ExclusionPolicy::default(), &transform)
            .dry_run(true)
            .run(dir.path())
            .unwrap();

        assert_eq!(summary.converted, 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), "hello");
    }

    #[test]
    fn test_invalid_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.md");
        fs::write(&file, "hello").unwrap();

        let rewriter = TreeRewriter::new(ExclusionPolicy::default(), &Identity);
        let err = rewriter.run(&file).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidRoot { .. }));

        let err = rewriter.run(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidRoot { .. }));
    }

    #[test]
    fn test_root_named_like_excluded_dir_is_walked() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("build");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.md"), "hello").unwrap();

        let transform = upper();
        let summary = TreeRewriter::new(ExclusionPolicy::default(), &transform)
            .run(&root)
            .unwrap();
        assert_eq!(summary.converted, 1);
    }

    #[test]
    fn test_sink_receives_events() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "hello").unwrap();
        fs::write(dir.path().join("b.md"), [0xff, 0xfe]).unwrap();

        let transform = upper();
        let mut sink = RecordingSink::default();
        let summary = TreeRewriter::new(ExclusionPolicy::default(), &transform)
            .run_with_sink(dir.path(), &mut sink)
            .unwrap();

        assert_eq!(sink.converted, vec![dir.path().join("a.md")]);
        assert_eq!(sink.failed, vec![dir.path().join("b.md")]);
        assert_eq!(sink.summary, Some(summary));
        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.unchanged(), 0);
    }

    #[test]
    fn test_pre_cancelled_run_processes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "hello").unwrap();

        let transform = upper();
        let flag = Arc::new(AtomicBool::new(true));
        let summary = TreeRewriter::new(ExclusionPolicy::default(), &transform)
            .cancel_on(flag)
            .run(dir.path())
            .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.scanned, 0);
        assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "hello");
    }

    #[test]
    fn test_transform_failure_is_per_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.md"), "fail me").unwrap();
        fs::write(dir.path().join("good.md"), "ok").unwrap();

        let transform = FnTransform::new("picky", |s: &str| {
            if s.starts_with("fail") {
                Err(TransformError::new("picky", "refused"))
            } else {
                Ok(s.to_uppercase())
            }
        });
        let summary = TreeRewriter::new(ExclusionPolicy::default(), &transform)
            .run(dir.path())
            .unwrap();

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(fs::read_to_string(dir.path().join("bad.md")).unwrap(), "fail me");
    }
}
