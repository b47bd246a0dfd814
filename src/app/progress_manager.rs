//! Progress UI (bar) for batch resolution runs.

use std::time::Duration;

use chemly_core::ProgressEvent;
use indicatif::{ProgressBar, ProgressStyle};

/// Drives an optional progress bar from [`ProgressEvent`]s.
///
/// When disabled every method is a no-op.
pub(crate) struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Creates a reporter; draws to stderr only when `enabled`.
    pub(crate) fn new(enabled: bool, total: usize) -> Self {
        if !enabled || total == 0 {
            return Self { bar: None };
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message("Resolving identifiers...");
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar: Some(bar) }
    }

    #[cfg(test)]
    fn with_bar(bar: ProgressBar) -> Self {
        Self { bar: Some(bar) }
    }

    pub(crate) fn update(&self, event: ProgressEvent) {
        if let Some(bar) = &self.bar {
            bar.set_length(event.total_count as u64);
            bar.set_position(event.completed_count as u64);
        }
    }

    /// Clears the bar; the run summary is logged afterwards.
    pub(crate) fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    #[cfg(test)]
    fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }
}
