use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::RateLimitConfig;

/// Per-IP submission rate limiter using an exact sliding window.
///
/// Each key holds the instants of accepted submissions. Entries older than the
/// window are pruned whenever the key is read, so the stored list never holds
/// more than `max_submissions` instants.
pub struct SubmissionRateLimiter {
    /// ip -> accepted submission instants, oldest first
    entries: DashMap<String, Vec<Instant>>,
    max_submissions: usize,
    window: Duration,
}

impl SubmissionRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: DashMap::new(),
            max_submissions: config.max_submissions,
            window: Duration::from_secs(config.window_secs),
        }
    }

    /// Returns true when the caller must be rejected. An accepted call is
    /// recorded; a rejected one is not charged.
    pub fn is_limited(&self, ip: &str) -> bool {
        self.is_limited_at(ip, Instant::now())
    }

    pub fn is_limited_at(&self, ip: &str, now: Instant) -> bool {
        let mut entry = self.entries.entry(ip.to_string()).or_default();
        let window = self.window;
        entry.retain(|t| now.duration_since(*t) < window);

        if entry.len() >= self.max_submissions {
            return true;
        }

        entry.push(now);
        false
    }

    /// Drop keys with no instant inside the window.
    pub fn cleanup(&self) {
        self.cleanup_at(Instant::now());
    }

    pub fn cleanup_at(&self, now: Instant) {
        let window = self.window;
        self.entries
            .retain(|_, times| times.last().is_some_and(|t| now.duration_since(*t) < window));
    }

    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
