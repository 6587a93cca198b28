use std::time::{Duration, Instant};

/// Display refresh interval while a task is being tracked
pub const TICK_MS: u64 = 1000;

/// Input poll interval for the event loop
pub const POLL_MS: u64 = 250;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(TICK_MS)
}

/// Recurring timer that is armed while tracking and cancelled when idle
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(tick_duration())
    }
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Arm the ticker; the first tick is due immediately
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Whether a tick should fire at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.next_due, Some(due) if now >= due)
    }

    /// Record that a tick fired at `now` and schedule the next one
    pub fn fired(&mut self, now: Instant) {
        if self.next_due.is_some() {
            self.next_due = Some(now + self.interval);
        }
    }

    /// How long the event loop may block before the next tick (capped at the poll interval)
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let poll = Duration::from_millis(POLL_MS);
        match self.next_due {
            Some(due) => due.saturating_duration_since(now).min(poll),
            None => poll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_inactive_ticker_never_due() {
        let ticker = Ticker::default();
        let now = Instant::now();
        assert!(!ticker.is_active());
        assert!(!ticker.is_due(now + Duration::from_secs(10)));
        assert_eq!(ticker.poll_timeout(now), Duration::from_millis(POLL_MS));
    }

    #[test]
    fn test_ticker_schedule() {
        let mut ticker = Ticker::default();
        let now = Instant::now();

        ticker.start(now);
        assert!(ticker.is_due(now));

        ticker.fired(now);
        assert!(!ticker.is_due(now + Duration::from_millis(999)));
        assert!(ticker.is_due(now + Duration::from_secs(1)));
        assert_eq!(
            ticker.poll_timeout(now + Duration::from_millis(900)),
            Duration::from_millis(100)
        );

        ticker.cancel();
        assert!(!ticker.is_due(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_fired_does_not_rearm_cancelled_ticker() {
        let mut ticker = Ticker::default();
        ticker.fired(Instant::now());
        assert!(!ticker.is_active());
    }
}
