//! Cooperative yielding and cancellation for long-running generation

use crate::io::error::{MosaicError, Result};
use crate::io::progress::ProgressManager;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Shared flag used to abort a run at its next checkpoint
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Governs what happens at each yield point of a run
///
/// Every chunk or batch boundary calls [`RunControl::checkpoint`], which
/// hands the thread back to the host, then checks for cancellation.
#[derive(Clone)]
pub struct RunControl {
    cancel: CancelToken,
    paced: bool,
    progress: ProgressManager,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new(CancelToken::new())
    }
}

impl RunControl {
    /// Create a paced control without visible progress
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            paced: true,
            progress: ProgressManager::hidden(),
        }
    }

    /// Create a control that never sleeps at checkpoints
    ///
    /// Cancellation is still honored.
    pub fn unpaced(cancel: CancelToken) -> Self {
        Self {
            paced: false,
            ..Self::new(cancel)
        }
    }

    /// Report progress through the given manager
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = progress;
        self
    }

    /// Progress display for this run
    pub const fn progress(&self) -> &ProgressManager {
        &self.progress
    }

    /// Token observed by this control
    pub const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Whether checkpoints pause
    pub const fn is_paced(&self) -> bool {
        self.paced
    }

    /// Yield point with no pause beyond handing the thread back
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if cancellation was requested
    pub fn checkpoint(&self, stage: &'static str) -> Result<()> {
        self.pause(stage, Duration::ZERO)
    }

    /// Yield point that sleeps for `delay` when paced
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if cancellation was requested
    pub fn pause(&self, stage: &'static str, delay: Duration) -> Result<()> {
        if self.paced {
            if delay.is_zero() {
                std::thread::yield_now();
            } else {
                std::thread::sleep(delay);
            }
        }
        self.ensure_active(stage)
    }

    /// Fail if cancellation was requested, without yielding
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if cancellation was requested
    pub fn ensure_active(&self, stage: &'static str) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(MosaicError::Cancelled { stage })
        } else {
            Ok(())
        }
    }
}
