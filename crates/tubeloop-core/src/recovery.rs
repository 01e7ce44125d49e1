//! Playback error-recovery policy.
//!
//! Decides whether an engine-reported playback failure should skip to the
//! next entry immediately or tolerate the failure as a possible transient
//! glitch. The default requires two consecutive failures before forcing a
//! skip; any successful `Playing` event resets the counter. Earlier
//! revisions of this application skipped on the first failure; that
//! variant is available by lowering the threshold to 1.

use tracing::{debug, warn};

/// Default number of consecutive failures required to force a skip.
pub const DEFAULT_SKIP_THRESHOLD: u32 = 2;

/// What the controller should do after recording a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Tolerate the failure; surface a warning only.
    Tolerate,
    /// Skip forward to the next playable entry.
    Skip,
}

/// Consecutive-failure counter with a configurable skip threshold.
#[derive(Debug, Clone)]
pub struct ErrorRecoveryPolicy {
    consecutive_failures: u32,
    skip_threshold: u32,
}

impl Default for ErrorRecoveryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorRecoveryPolicy {
    /// Policy with the default two-failure threshold.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(DEFAULT_SKIP_THRESHOLD)
    }

    /// Policy with a custom threshold. A threshold of 1 skips on the
    /// first failure. A threshold of 0 is treated as 1.
    #[must_use]
    pub const fn with_threshold(skip_threshold: u32) -> Self {
        let skip_threshold = if skip_threshold == 0 { 1 } else { skip_threshold };
        Self {
            consecutive_failures: 0,
            skip_threshold,
        }
    }

    /// Record an engine failure for the current entry.
    ///
    /// Returns [`RecoveryAction::Skip`] once the threshold is reached.
    /// The streak stays armed until the controller confirms the skip was
    /// applied via [`acknowledge_skip`](Self::acknowledge_skip), so a
    /// skip that cannot run yet is retried on the next failure.
    pub fn record_failure(&mut self) -> RecoveryAction {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= self.skip_threshold {
            warn!(
                failures = self.consecutive_failures,
                "consecutive playback failures reached threshold, skipping"
            );
            RecoveryAction::Skip
        } else {
            debug!(
                failures = self.consecutive_failures,
                "playback failure tolerated as a possible transient glitch"
            );
            RecoveryAction::Tolerate
        }
    }

    /// Confirm that a forced skip was applied; starts a fresh streak.
    pub const fn acknowledge_skip(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Record a successful `Playing` event; resets the counter.
    pub const fn record_playing(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Current consecutive-failure count.
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
