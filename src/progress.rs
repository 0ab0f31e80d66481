//! Progress reporting infrastructure

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::borrow::Cow;

/// CLI progress report of ongoing operations
///
/// To avoid corrupted terminal output, you should not write anything to stdout
/// or stderr yourself as long as a report is being displayed. Please use logs
/// for debug messages.
#[derive(Clone, Debug, Default)]
pub struct ProgressReport(MultiProgress);
//
impl ProgressReport {
    /// Prepare to report progress on the cli
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that is never displayed
    pub fn hidden() -> Self {
        Self(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()))
    }

    /// Prepare to report on a new operation
    pub fn add(&self, what: impl Into<Cow<'static, str>>, work: Work) -> ProgressTracker {
        let (bar, style) = match work {
            Work::Bytes(total) => (
                ProgressBar::new(total),
                "{prefix} {wide_bar} {decimal_bytes}/{decimal_total_bytes} ({decimal_bytes_per_sec})",
            ),
            Work::UnknownBytes => (
                ProgressBar::new_spinner(),
                "{prefix} {spinner} {decimal_bytes} ({decimal_bytes_per_sec})",
            ),
        };
        let bar = bar.with_prefix(what).with_style(
            ProgressStyle::with_template(style)
                .expect("all styles above should be valid indicatif styles"),
        );
        ProgressTracker {
            bar: self.0.add(bar),
            report: self.0.clone(),
        }
    }
}

/// Work whose progression can be tracked
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Work {
    /// Known amount of bytes to be processed
    Bytes(u64),

    /// Bytes to be processed, total unknown
    UnknownBytes,
}
//
impl From<Option<u64>> for Work {
    fn from(total: Option<u64>) -> Self {
        total.map_or(Self::UnknownBytes, Self::Bytes)
    }
}

/// Mechanism to track progress
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    /// Progress bar for this specific process
    bar: ProgressBar,

    /// Underlying process report
    report: MultiProgress,
}
//
impl ProgressTracker {
    /// Show that a certain amount of progress has been made
    pub fn make_progress(&self, progress: u64) {
        self.bar.inc(progress);
    }

    /// Hide the progress bar once the operation is over
    pub fn finish(&self) {
        self.bar.finish_and_clear();
        self.report.remove(&self.bar);
    }
}
