use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Fixed-quota limiter over a rolling time window. Admitted requests are
/// timestamped; entries at least one full window old are evicted before
/// every admission decision.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    stamps: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            stamps: VecDeque::new(),
        }
    }

    /// Admit or deny one request. Denied attempts leave the window
    /// untouched.
    pub fn check(&mut self) -> bool {
        let now = Instant::now();
        self.evict(now);
        if (self.stamps.len() as u32) < self.limit {
            self.stamps.push_back(now);
            true
        } else {
            false
        }
    }

    /// Time until the oldest retained request falls out of the window.
    /// Zero when the window is empty. Prunes expired entries first, so the
    /// estimate never reflects a stale window even without a prior
    /// `check` call.
    pub fn time_until_next(&mut self) -> Duration {
        let now = Instant::now();
        self.evict(now);
        match self.stamps.front() {
            None => Duration::ZERO,
            Some(oldest) => self.window.saturating_sub(now.duration_since(*oldest)),
        }
    }

    // Keep entries strictly younger than the window; age == window expires.
    fn evict(&mut self, now: Instant) {
        while let Some(front) = self.stamps.front() {
            if now.duration_since(*front) >= self.window {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }
}
