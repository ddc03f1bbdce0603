//! Byte-level progress of one chunked download.

use super::ProgressBarOpts;
use indicatif::ProgressBar;

/// Progress bar shared by the workers of a download.
///
/// Cloning is cheap; every clone drives the same bar.
#[derive(Debug, Clone)]
pub struct ProgressDisplay {
    bar: ProgressBar,
    clear: bool,
}

impl ProgressDisplay {
    pub fn new(opts: &ProgressBarOpts, total: u64) -> Self {
        Self {
            bar: opts.to_progress_bar(total),
            clear: opts.clear,
        }
    }

    /// Record a completed chunk.
    pub fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finish the bar, clearing or keeping it based on configuration.
    pub fn finish(&self) {
        if self.clear {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish();
        }
    }

    /// Leave the bar where it stopped after a failed download.
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
