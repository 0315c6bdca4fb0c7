//! Adaptive request pacing
//!
//! One delay value lives for the whole process and is shared by every
//! intent and target, so pacing learned on one target carries over to the
//! next. It shrinks after pages that return links and grows after pages
//! that come back empty.

use std::time::Duration;

/// Starting delay in seconds
pub const INITIAL_DELAY_SECS: f64 = 0.25;
/// Reduction applied after a successful page
pub const SUCCESS_STEP_SECS: f64 = 0.05;
/// Increase applied after an empty page
pub const EMPTY_STEP_SECS: f64 = 0.1;
/// Lower bound of the adaptive delay
pub const MIN_DELAY_SECS: f64 = 0.05;
/// Upper bound of the adaptive delay
pub const MAX_DELAY_SECS: f64 = 10.0;

/// Self-tuning delay between requests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveDelay {
    seconds: f64,
}

impl Default for AdaptiveDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveDelay {
    pub fn new() -> Self {
        Self {
            seconds: INITIAL_DELAY_SECS,
        }
    }

    /// Current adaptive value in seconds
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Page returned links: speed up
    pub fn on_success(&mut self) {
        self.seconds = (self.seconds - SUCCESS_STEP_SECS).max(MIN_DELAY_SECS);
    }

    /// Page came back empty: slow down
    pub fn on_empty(&mut self) {
        self.seconds = (self.seconds + EMPTY_STEP_SECS).min(MAX_DELAY_SECS);
    }

    /// Delay to wait after an attempt
    ///
    /// A fixed override wins over the adaptive value. Negative or NaN
    /// overrides are treated as zero.
    pub fn effective(&self, fixed: Option<f64>) -> Duration {
        let secs = fixed.unwrap_or(self.seconds).max(0.0);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }
}
