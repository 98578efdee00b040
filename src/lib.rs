//! hk-rewrite: convert Simplified Chinese text files to Traditional Chinese
//! (Hong Kong standard) in place.
//!
//! A [`TreeRewriter`] walks a directory tree, prunes excluded directories,
//! admits files through an [`ExclusionPolicy`], runs each eligible file's
//! content through a [`Transform`], and writes the result back only when it
//! differs from the original.
//!
//! # Guarantees
//!
//! - Unchanged files are never opened for writing (mtime preserved)
//! - Files are overwritten in place; nothing is created, renamed, or deleted
//! - Writes are confined to the canonical root
//! - A failure on one file never aborts the run
//!
//! # Example
//!
//! ```no_run
//! use hk_rewrite::{ExclusionPolicy, HongKongTransform, TreeRewriter};
//!
//! let transform = HongKongTransform;
//! let rewriter = TreeRewriter::new(ExclusionPolicy::default(), &transform);
//!
//! match rewriter.run("docs") {
//!     Ok(summary) => println!("{} converted, {} errors", summary.converted, summary.errors),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod config;
pub mod error;
pub mod policy;
pub mod rewrite;
pub mod safety;
pub mod sink;
pub mod transform;

// Re-exports
pub use config::{load_from_path, ConfigError, RewriteConfig};
pub use error::{ConfigurationError, ConversionError};
pub use policy::{ExclusionPolicy, FileVerdict};
pub use rewrite::{FileRecord, Summary, TreeRewriter};
pub use safety::{SafetyError, TreeGuard};
pub use sink::{NullSink, ProgressSink, RecordingSink};
pub use transform::{FnTransform, HongKongTransform, Identity, Transform, TransformError};
