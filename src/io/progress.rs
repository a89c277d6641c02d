//! Stage progress display for generation runs

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>14} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates progress bars for the stages of a run
///
/// A hidden manager hands out bars that draw nowhere, so library code can
/// report progress unconditionally.
#[derive(Clone)]
pub struct ProgressManager {
    multi_progress: MultiProgress,
    hidden: bool,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager drawing to stderr
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            hidden: false,
        }
    }

    /// Create a manager whose bars are never drawn
    pub fn hidden() -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            hidden: true,
        }
    }

    /// Whether bars from this manager are drawn
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Add a bar for a stage with `len` units of work
    pub fn begin_stage(&self, label: &str, len: u64) -> ProgressBar {
        let bar = if self.hidden {
            ProgressBar::hidden()
        } else {
            self.multi_progress.add(ProgressBar::new(len))
        };
        bar.set_length(len);
        bar.set_style(STAGE_STYLE.clone());
        bar.set_prefix(label.to_string());
        bar
    }

    /// Mark a stage bar as completed with a short summary
    pub fn finish_stage(bar: &ProgressBar, summary: &str) {
        bar.finish_with_message(format!("✓ {summary}"));
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        let _ = self.multi_progress.clear();
    }
}
