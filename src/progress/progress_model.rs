use std::time::Duration;

use serde::Serialize;

// Presentation heuristics, not a model of real server progress. Tune freely.
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);
pub const PROGRESS_CAP: u8 = 98;
pub const SLOWDOWN_AT: u8 = 50;
pub const FAST_STEP: u8 = 2;
pub const SLOW_STEP: u8 = 1;

pub const INITIAL_MESSAGE: &str = "Preparing...";

/// Phase messages in display order with the pre-tick percent that unlocks each.
/// `INITIAL_MESSAGE` holds until the first checkpoint.
pub const PHASES: [(u8, &str); 6] = [
    (10, "Analyzing texture and color..."),
    (30, "Evaluating quality..."),
    (45, "Measuring moisture content..."),
    (60, "Determining size category..."),
    (75, "Checking market prices..."),
    (90, "Almost done..."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub percent: u8,
    pub message: &'static str,
}

impl Progress {
    pub fn initial() -> Self {
        Self {
            percent: 0,
            message: INITIAL_MESSAGE,
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    pub tick_interval: Duration,
    pub cap: u8,
    pub slowdown_at: u8,
    pub fast_step: u8,
    pub slow_step: u8,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            cap: PROGRESS_CAP,
            slowdown_at: SLOWDOWN_AT,
            fast_step: FAST_STEP,
            slow_step: SLOW_STEP,
        }
    }
}

// ============================================================================
// ProgressCurve — the pure tick function
// ============================================================================

/// Counters for one simulated run. A fresh curve starts clean.
#[derive(Debug, Clone)]
pub struct ProgressCurve {
    config: ProgressConfig,
    percent: u8,
    /// Number of phases already announced
    phases_fired: usize,
}

impl ProgressCurve {
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            config,
            percent: 0,
            phases_fired: 0,
        }
    }

    pub fn current(&self) -> Progress {
        Progress {
            percent: self.percent,
            message: self.message(),
        }
    }

    fn message(&self) -> &'static str {
        match self.phases_fired {
            0 => INITIAL_MESSAGE,
            n => PHASES[n - 1].1,
        }
    }

    /// Advance one tick. At most one phase fires per tick, judged on the
    /// pre-tick percent, and the percent never passes the cap.
    pub fn tick(&mut self) -> Progress {
        if let Some(&(threshold, _)) = PHASES.get(self.phases_fired) {
            if self.percent >= threshold {
                self.phases_fired += 1;
            }
        }

        let step = if self.percent < self.config.slowdown_at {
            self.config.fast_step
        } else {
            self.config.slow_step
        };
        self.percent = self.percent.saturating_add(step).min(self.config.cap);

        self.current()
    }

    pub fn reset(&mut self) {
        self.percent = 0;
        self.phases_fired = 0;
    }
}
