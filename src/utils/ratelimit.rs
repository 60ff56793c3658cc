//! Fixed-window rate limiting for outbound source calls.
//!
//! Each limiter allows `calls` invocations per `period`; once the budget is
//! spent, `acquire` blocks until the window rolls over. The window arithmetic
//! is kept separate from the sleeping so it can be tested without real time.

use std::time::{Duration, Instant};

use tracing::warn;

/// Windowed rate limiter. Not thread-safe; each owner holds its own.
#[derive(Debug)]
pub struct RateLimiter {
    calls: u32,
    period: Duration,
    window_start: Instant,
    used: u32,
}

impl RateLimiter {
    pub fn new(calls: u32, period: Duration) -> Self {
        Self {
            calls: calls.max(1),
            period,
            window_start: Instant::now(),
            used: 0,
        }
    }

    /// Limiter allowing `calls` requests per minute, the default budget for
    /// scraped sources.
    pub fn per_minute(calls: u32) -> Self {
        Self::new(calls, Duration::from_secs(60))
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Replace the limits, resetting the current window. No-op when the
    /// limits are unchanged, so a caller may invoke this unconditionally.
    pub fn reconfigure(&mut self, calls: u32, period: Duration) {
        if self.calls != calls.max(1) || self.period != period {
            self.calls = calls.max(1);
            self.period = period;
            self.window_start = Instant::now();
            self.used = 0;
        }
    }

    /// Core window arithmetic: account for one call at `now`, returning how
    /// long the caller must wait first (`None` when within budget).
    fn next_delay(&mut self, now: Instant) -> Option<Duration> {
        if now.duration_since(self.window_start) >= self.period {
            self.window_start = now;
            self.used = 0;
        }
        if self.used < self.calls {
            self.used += 1;
            None
        } else {
            Some(self.period.saturating_sub(now.duration_since(self.window_start)))
        }
    }

    /// Block until a call slot is available, then consume it.
    pub fn acquire(&mut self) {
        loop {
            match self.next_delay(Instant::now()) {
                None => return,
                Some(delay) => {
                    warn!(
                        "Rate limit exceeded. Sleeping for {:.1}s before retrying.",
                        delay.as_secs_f64()
                    );
                    std::thread::sleep(delay);
                }
            }
        }
    }
}
