//! Idle-tick timeout tracking.
//!
//! The session has no wall clock; its tick counter is the clock. Every
//! tick on which nothing is waiting on the inbound channel is an idle tick.
//! Once the consecutive idle count reaches the threshold, the tick counts
//! as a timeout and the send path is allowed to resend its window.

/// What happens to the idle count after a timeout fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResendPolicy {
    /// The count stays at the threshold, so every further idle tick is a
    /// timeout and resends the window.
    #[default]
    EveryTickAfterTimeout,

    /// The count re-arms after each timeout, so a resend happens once per
    /// `threshold + 1` idle ticks.
    OncePerTimeout,
}

/// Outcome of an idle tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleVerdict {
    /// Below the threshold; the send path stops for this tick.
    Waiting,

    /// Threshold reached; the send path falls through to its resend.
    TimedOut,
}

/// Counts consecutive idle ticks against a fixed threshold.
#[derive(Debug, Clone, Copy)]
pub struct IdleTimer {
    threshold: u32,
    idle_ticks: u32,
    policy: ResendPolicy,
}

impl IdleTimer {
    pub const fn new(threshold: u32, policy: ResendPolicy) -> Self {
        Self {
            threshold,
            idle_ticks: 0,
            policy,
        }
    }

    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    pub const fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    /// Inbound traffic was seen; the idle run is over.
    pub fn on_activity(&mut self) {
        self.idle_ticks = 0;
    }

    /// Records one idle tick.
    pub fn on_idle(&mut self) -> IdleVerdict {
        if self.idle_ticks < self.threshold {
            self.idle_ticks += 1;
            return IdleVerdict::Waiting;
        }
        if self.policy == ResendPolicy::OncePerTimeout {
            self.idle_ticks = 0;
        }
        IdleVerdict::TimedOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_threshold() {
        let mut timer = IdleTimer::new(5, ResendPolicy::EveryTickAfterTimeout);
        for _ in 0..5 {
            assert_eq!(timer.on_idle(), IdleVerdict::Waiting);
        }
        assert_eq!(timer.idle_ticks(), 5);
        assert_eq!(timer.on_idle(), IdleVerdict::TimedOut);
        // Stays expired until traffic shows up.
        assert_eq!(timer.on_idle(), IdleVerdict::TimedOut);
    }

    #[test]
    fn test_activity_resets() {
        let mut timer = IdleTimer::new(2, ResendPolicy::EveryTickAfterTimeout);
        timer.on_idle();
        timer.on_idle();
        timer.on_activity();
        assert_eq!(timer.idle_ticks(), 0);
        assert_eq!(timer.on_idle(), IdleVerdict::Waiting);
    }

    #[test]
    fn test_once_per_timeout_rearms() {
        let mut timer = IdleTimer::new(2, ResendPolicy::OncePerTimeout);
        let verdicts: heapless::Vec<IdleVerdict, 6> = (0..6).map(|_| timer.on_idle()).collect();
        assert_eq!(
            verdicts.as_slice(),
            &[
                IdleVerdict::Waiting,
                IdleVerdict::Waiting,
                IdleVerdict::TimedOut,
                IdleVerdict::Waiting,
                IdleVerdict::Waiting,
                IdleVerdict::TimedOut,
            ]
        );
    }

    #[test]
    fn test_zero_threshold() {
        let mut timer = IdleTimer::new(0, ResendPolicy::EveryTickAfterTimeout);
        assert_eq!(timer.on_idle(), IdleVerdict::TimedOut);
    }
}
