//! Render notification throttling.
//!
//! Decouples how often batches arrive from how often the renderer is asked to
//! refresh. The store stays current regardless; only the refresh cadence is
//! limited.

use std::time::{Duration, Instant};

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    min_interval: Duration,
    last_emit: Option<Instant>,
    pending: bool,
    emitted: u64,
    suppressed: u64,
}

impl Default for RenderThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RenderThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_emit: None,
            pending: false,
            emitted: 0,
            suppressed: 0,
        }
    }

    /// Called for every applied update. Returns true when a render
    /// notification should go out now.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.ready(now) {
            self.emit(now);
            true
        } else {
            self.pending = true;
            self.suppressed += 1;
            false
        }
    }

    /// Emits the suppressed trailing notification once the interval allows it.
    pub fn flush(&mut self, now: Instant) -> bool {
        if self.pending && self.ready(now) {
            self.emit(now);
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    fn ready(&self, now: Instant) -> bool {
        match self.last_emit {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        }
    }

    fn emit(&mut self, now: Instant) {
        self.last_emit = Some(now);
        self.pending = false;
        self.emitted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_emits() {
        let mut throttle = RenderThrottle::default();
        assert!(throttle.request(Instant::now()));
        assert_eq!(throttle.emitted(), 1);
    }

    #[test]
    fn test_burst_is_suppressed() {
        let start = Instant::now();
        let mut throttle = RenderThrottle::new(Duration::from_millis(50));
        assert!(throttle.request(start));
        for ms in 1..50 {
            assert!(!throttle.request(start + Duration::from_millis(ms)));
        }
        assert!(throttle.is_pending());
        assert!(throttle.request(start + Duration::from_millis(50)));
        assert!(!throttle.is_pending());
    }

    #[test]
    fn test_trailing_notification_fires() {
        let start = Instant::now();
        let mut throttle = RenderThrottle::new(Duration::from_millis(50));
        throttle.request(start);
        throttle.request(start + Duration::from_millis(10));
        assert!(!throttle.flush(start + Duration::from_millis(30)));
        assert!(throttle.flush(start + Duration::from_millis(60)));
        assert!(!throttle.flush(start + Duration::from_millis(200)));
    }

    #[test]
    fn test_flush_without_request_is_quiet() {
        let mut throttle = RenderThrottle::default();
        assert!(!throttle.flush(Instant::now()));
        assert_eq!(throttle.emitted(), 0);
    }
}
