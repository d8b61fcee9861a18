//! Countdown match clock.
//!
//! Maps wall-clock elapsed time to remaining match time. The clock never
//! schedules anything itself: the caller drives `tick(now_ms)` on a fixed
//! cadence (100ms recommended) and reacts to the expiry signal, which fires
//! exactly once per started run.

use serde::{Deserialize, Serialize};

/// Outcome of a single `tick` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Clock is stopped or paused; nothing happened.
    Idle,
    /// Clock advanced and time remains.
    Running,
    /// This tick reached the full duration. Reported once per start.
    Expired,
}

/// Remaining time as a minutes/seconds display projection.
///
/// Derived from elapsed milliseconds on demand, never stored as a second
/// source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockDisplay {
    pub minutes: u64,
    pub seconds: u64,
}

impl ClockDisplay {
    /// Zero-padded "MM:SS".
    pub fn format(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Countdown clock over a fixed total duration.
///
/// Invariant: `0 <= elapsed_ms <= total_duration_ms`.
#[derive(Debug, Clone)]
pub struct MatchClock {
    total_duration_ms: u64,
    elapsed_ms: u64,
    running: bool,
    paused: bool,
    /// Wall-clock instant (ms) corresponding to elapsed == 0. Recomputed on
    /// start and resume so pauses never lose or double-count elapsed time.
    anchor_ms: u64,
}

impl MatchClock {
    pub fn new(total_duration_ms: u64) -> Self {
        Self {
            total_duration_ms,
            elapsed_ms: 0,
            running: false,
            paused: false,
            anchor_ms: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    /// Start counting down from the already-accumulated elapsed time.
    /// No-op if already running.
    pub fn start(&mut self, now_ms: u64) {
        if self.running {
            return;
        }
        self.running = true;
        self.paused = false;
        self.anchor_ms = now_ms.saturating_sub(self.elapsed_ms);
    }

    /// Advance the clock to `now_ms`.
    ///
    /// Returns `Expired` on the tick that reaches the total duration; the
    /// clock stops itself so the signal cannot fire twice.
    pub fn tick(&mut self, now_ms: u64) -> ClockTick {
        if !self.running || self.paused {
            return ClockTick::Idle;
        }

        let elapsed = now_ms.saturating_sub(self.anchor_ms);
        if elapsed >= self.total_duration_ms {
            self.elapsed_ms = self.total_duration_ms;
            self.running = false;
            return ClockTick::Expired;
        }

        self.elapsed_ms = elapsed;
        ClockTick::Running
    }

    /// Freeze the clock without losing accumulated time.
    pub fn pause(&mut self) {
        if self.running {
            self.paused = true;
        }
    }

    /// Unfreeze; the anchor is recomputed so wall time spent paused does not
    /// count against the match.
    pub fn resume(&mut self, now_ms: u64) {
        if self.running && self.paused {
            self.paused = false;
            self.anchor_ms = now_ms.saturating_sub(self.elapsed_ms);
        }
    }

    /// Stop and rewind to zero elapsed.
    pub fn reset(&mut self) {
        self.running = false;
        self.paused = false;
        self.elapsed_ms = 0;
        self.anchor_ms = 0;
    }

    /// Remaining time as minutes/seconds, floor-divided, never negative.
    pub fn remaining(&self) -> ClockDisplay {
        let remaining_ms = self.total_duration_ms.saturating_sub(self.elapsed_ms);
        let remaining_secs = remaining_ms / 1000;
        ClockDisplay {
            minutes: remaining_secs / 60,
            seconds: remaining_secs % 60,
        }
    }
}
