//! Outcome types for extraction runs

use crate::parser::RecoveryStage;
use std::path::PathBuf;

/// What happened to a single input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// An output record was written; the reply was recovered at this stage
    Written(RecoveryStage),
    /// The doctype had no labels, nothing was written
    Skipped,
}

/// Counters for one batch pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Root the output tree was written under
    pub output_root: PathBuf,

    /// Output records written
    pub written: usize,

    /// Records skipped for lack of labels
    pub skipped: usize,

    /// Replies that needed the lenient `{...}` span parse
    pub lenient: usize,

    /// Replies that could not be parsed at all
    pub fallback: usize,
}

impl BatchReport {
    /// Create an empty report for `output_root`
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            ..Self::default()
        }
    }

    /// Record the outcome of one file
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Written(stage) => {
                self.written += 1;
                match stage {
                    RecoveryStage::Strict => {}
                    RecoveryStage::Lenient => self.lenient += 1,
                    RecoveryStage::Fallback => self.fallback += 1,
                }
            }
            FileOutcome::Skipped => self.skipped += 1,
        }
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} written, {} skipped, {} recovered from surrounding text, {} unparseable",
            self.written, self.skipped, self.lenient, self.fallback
        )
    }
}
