//! Round countdown
//!
//! Wall-clock-free timer: the host drives it with one [`RoundTimer::tick`]
//! per second. Every start hands out a generation token, and ticks
//! carrying an old token are ignored, so a countdown scheduled for a
//! previous round can never judge the current one.

/// Token identifying one started countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerGeneration(u64);

/// Result of advancing the timer by one second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belonged to a cancelled or superseded countdown.
    Stale,
    /// Seconds remaining after the tick.
    Running(u32),
    /// The countdown just hit zero. Fired at most once per start.
    Expired,
}

/// Per-round countdown.
#[derive(Debug, Default)]
pub struct RoundTimer {
    generation: u64,
    seconds_left: u32,
    running: bool,
}

impl RoundTimer {
    /// Idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a countdown of `seconds`, invalidating any previous one.
    pub fn start(&mut self, seconds: u32) -> TimerGeneration {
        self.generation += 1;
        self.seconds_left = seconds;
        self.running = true;
        TimerGeneration(self.generation)
    }

    /// Stop the countdown. Outstanding ticks become stale.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.running = false;
    }

    /// Whether a countdown is in flight.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds remaining on the current countdown.
    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    /// Advance the countdown identified by `token` by one second.
    pub fn tick(&mut self, token: TimerGeneration) -> TickOutcome {
        if token.0 != self.generation || !self.running {
            return TickOutcome::Stale;
        }
        if self.seconds_left > 1 {
            self.seconds_left -= 1;
            TickOutcome::Running(self.seconds_left)
        } else {
            self.seconds_left = 0;
            self.running = false;
            TickOutcome::Expired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_and_expires_once() {
        let mut timer = RoundTimer::new();
        let token = timer.start(3);

        assert_eq!(timer.tick(token), TickOutcome::Running(2));
        assert_eq!(timer.tick(token), TickOutcome::Running(1));
        assert_eq!(timer.tick(token), TickOutcome::Expired);
        // Further ticks of the same countdown are stale, never a second expiry
        assert_eq!(timer.tick(token), TickOutcome::Stale);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_stale_token_after_restart() {
        let mut timer = RoundTimer::new();
        let old = timer.start(5);
        let new = timer.start(10);

        // A tick queued for the superseded countdown cannot touch the new one
        assert_eq!(timer.tick(old), TickOutcome::Stale);
        assert_eq!(timer.seconds_left(), 10);
        assert_eq!(timer.tick(new), TickOutcome::Running(9));
    }

    #[test]
    fn test_cancel_invalidates_outstanding_ticks() {
        let mut timer = RoundTimer::new();
        let token = timer.start(5);
        timer.cancel();

        assert!(!timer.is_running());
        assert_eq!(timer.tick(token), TickOutcome::Stale);
    }

    #[test]
    fn test_zero_second_countdown_expires_immediately() {
        let mut timer = RoundTimer::new();
        let token = timer.start(0);
        assert_eq!(timer.tick(token), TickOutcome::Expired);
    }
}
