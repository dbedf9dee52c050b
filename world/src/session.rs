//! Work/break countdown owned by the garden.

use std::time::Duration;

use pomo_patch_core::{Rejection, SessionMode, SessionRules, SessionSnapshot};

#[derive(Debug, Default)]
pub(crate) struct SessionTimer {
    mode: SessionMode,
    remaining: Duration,
    running: bool,
    cycle: u32,
}

impl SessionTimer {
    pub(crate) fn start_work(&mut self, rules: &SessionRules) -> Result<Duration, Rejection> {
        if self.mode != SessionMode::Idle {
            return Err(Rejection::SessionActive { mode: self.mode });
        }
        self.begin(SessionMode::Work, rules.work_duration());
        Ok(self.remaining)
    }

    /// Counts down; returns the mode that just completed, if any.
    pub(crate) fn advance(&mut self, dt: Duration) -> Option<SessionMode> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.running = false;
            return Some(self.mode);
        }
        None
    }

    /// Checks that a countdown in `expected` mode completed and can pay out.
    pub(crate) fn ensure_claimable(&self, expected: SessionMode) -> Result<(), Rejection> {
        if self.mode == expected && !self.running && self.remaining.is_zero() {
            Ok(())
        } else {
            Err(Rejection::SessionIncomplete { expected })
        }
    }

    /// Closes a claimed work session and starts the break that follows it.
    ///
    /// Returns the break length and whether it is a long break.
    pub(crate) fn begin_break(&mut self, rules: &SessionRules) -> (Duration, bool) {
        self.cycle = self.cycle.saturating_add(1);
        let duration = rules.break_duration(self.cycle);
        self.begin(SessionMode::Break, duration);
        (duration, rules.is_long_break(self.cycle))
    }

    /// Reports whether the current break is a long one.
    pub(crate) fn is_long_break(&self, rules: &SessionRules) -> bool {
        self.mode == SessionMode::Break && rules.is_long_break(self.cycle)
    }

    pub(crate) fn finish(&mut self) {
        self.mode = SessionMode::Idle;
        self.remaining = Duration::ZERO;
        self.running = false;
    }

    pub(crate) fn exit(&mut self) -> Result<SessionMode, Rejection> {
        if self.mode == SessionMode::Idle {
            return Err(Rejection::NoActiveSession);
        }
        let mode = self.mode;
        self.finish();
        Ok(mode)
    }

    fn begin(&mut self, mode: SessionMode, duration: Duration) {
        self.mode = mode;
        self.remaining = duration;
        self.running = true;
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            time_remaining: self.remaining,
            running: self.running,
            cycle: self.cycle,
        }
    }
}
