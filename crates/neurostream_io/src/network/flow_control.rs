use std::time::Duration;

use neurostream_core::config::ReconnectConfig;

/// Exponential reconnect pacing for a stream that was healthy before.
#[derive(Clone, Debug)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
    max_attempts: Option<u32>,
    attempts: u32,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration, multiplier: f64) -> Self {
        Self {
            initial,
            max,
            multiplier,
            max_attempts: None,
            attempts: 0,
        }
    }

    pub fn from_config(config: &ReconnectConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            ..Self::new(
                Duration::from_millis(config.initial_delay_ms),
                Duration::from_millis(config.max_delay_ms),
                config.multiplier,
            )
        }
    }

    /// Delay before the next attempt, never shorter than `floor` (the
    /// server's `retry:` hint). `None` once the attempt budget is spent.
    pub fn next_delay(&mut self, floor: Option<Duration>) -> Option<Duration> {
        if self.max_attempts.is_some_and(|max| self.attempts >= max) {
            return None;
        }

        let exponent = i32::try_from(self.attempts).unwrap_or(i32::MAX);
        let millis = (self.initial.as_millis() as f64 * self.multiplier.powi(exponent))
            .min(self.max.as_millis() as f64)
            .round() as u64;
        self.attempts += 1;

        let delay = Duration::from_millis(millis);
        Some(floor.map_or(delay, |f| delay.max(f)))
    }

    /// Called after a successful reconnect.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_until_capped() {
        let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_millis(500), 2.0);
        let delays: Vec<u128> = (0..5)
            .map(|_| backoff.next_delay(None).unwrap().as_millis())
            .collect();
        assert_eq!(delays, vec![100, 200, 400, 500, 500]);
        assert_eq!(backoff.attempts(), 5);
    }

    #[test]
    fn test_server_hint_is_a_floor() {
        let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(5), 2.0);
        assert_eq!(
            backoff.next_delay(Some(Duration::from_secs(3))),
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn test_attempt_budget() {
        let config = ReconnectConfig {
            max_attempts: Some(2),
            ..Default::default()
        };
        let mut backoff = Backoff::from_config(&config);
        assert!(backoff.next_delay(None).is_some());
        assert!(backoff.next_delay(None).is_some());
        assert!(backoff.next_delay(None).is_none());
        backoff.reset();
        assert!(backoff.next_delay(None).is_some());
    }
}
