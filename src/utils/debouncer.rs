use std::time::{Duration, Instant};

/// Trailing-edge debouncer for keystroke-driven requests.
///
/// Every `trigger` restarts the quiet period; `should_execute` fires once
/// the period has elapsed since the last trigger. Time is passed in so the
/// orchestrator can be driven deterministically.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_event: None,
        }
    }

    /// A zero delay means "fire on the trigger itself"
    pub fn is_immediate(&self) -> bool {
        self.delay.is_zero()
    }

    /// Register that an event occurred at `now`
    pub fn trigger(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// Returns true exactly once per burst, when the quiet period is over
    pub fn should_execute(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(last) if now.saturating_duration_since(last) >= self.delay => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before the pending action fires
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.last_event
            .map(|last| self.delay.saturating_sub(now.saturating_duration_since(last)))
    }

    /// Cancel any pending action
    pub fn reset(&mut self) {
        self.last_event = None;
    }

    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.trigger(start);
        assert!(!debouncer.should_execute(start + Duration::from_millis(100)));

        // another keystroke restarts the clock
        debouncer.trigger(start + Duration::from_millis(200));
        assert!(!debouncer.should_execute(start + Duration::from_millis(400)));
        assert_eq!(
            debouncer.time_remaining(start + Duration::from_millis(400)),
            Some(Duration::from_millis(100))
        );

        assert!(debouncer.should_execute(start + Duration::from_millis(500)));
        assert!(!debouncer.should_execute(start + Duration::from_millis(900)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_reset_cancels() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.trigger(start);
        debouncer.reset();
        assert!(!debouncer.should_execute(start + Duration::from_secs(1)));
        assert_eq!(debouncer.time_remaining(start), None);
    }

    #[test]
    fn test_zero_delay_is_immediate() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        assert!(debouncer.is_immediate());
        debouncer.trigger(start);
        assert!(debouncer.should_execute(start));
    }
}
