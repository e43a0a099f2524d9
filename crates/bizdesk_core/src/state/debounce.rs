//! Quiet-period debouncer for search/filter recomputation.
//!
//! Callers pass the current instant explicitly; nothing here sleeps or
//! spawns, so the owner decides when to poll.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer<T> {
    quiet_period: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Replaces any pending input and restarts the quiet period.
    pub fn submit(&mut self, input: T, now: Instant) {
        self.pending = Some((input, now));
    }

    /// Releases the pending input once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, submitted_at)| now.saturating_duration_since(*submitted_at) >= self.quiet_period);
        if ready {
            return self.pending.take().map(|(input, _)| input);
        }
        None
    }

    /// Releases the pending input regardless of the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(input, _)| input)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use std::time::{Duration, Instant};

    #[test]
    fn fires_once_after_quiet_period_with_latest_input() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.submit("a", start);
        debouncer.submit("ab", start + Duration::from_millis(100));
        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(400)),
            Some("ab")
        );
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn flush_bypasses_quiet_period() {
        let mut debouncer = Debouncer::default();
        debouncer.submit(1, Instant::now());
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.flush(), Some(1));
        assert!(!debouncer.is_pending());
    }
}
