//! Progress reporting hooks for a rewrite run.

use crate::error::ConversionError;
use crate::rewrite::{FileRecord, Summary};
use std::path::PathBuf;

/// Receives per-file events and the final summary of a run.
///
/// All methods default to doing nothing.
pub trait ProgressSink {
    /// A file's content changed under the transform (and was written, unless
    /// the run is a dry run).
    fn converted(&mut self, _record: &FileRecord) {}

    fn failed(&mut self, _error: &ConversionError) {}

    fn finished(&mut self, _summary: &Summary) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {}

/// Keeps events in memory for later inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub summary: Option<Summary>,
}

impl ProgressSink for RecordingSink {
    fn converted(&mut self, record: &FileRecord) {
        self.converted.push(record.path.clone());
    }

    fn failed(&mut self, error: &ConversionError) {
        self.failed.push(error.path().to_path_buf());
    }

    fn finished(&mut self, summary: &Summary) {
        self.summary = Some(*summary);
    }
}
