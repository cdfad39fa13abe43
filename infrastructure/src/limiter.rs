//! Fixed-window rate limiter.

use async_trait::async_trait;
use squad_application::RateLimiter;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// [`RateLimiter`] counting actions per identity in fixed windows.
///
/// Each (action, identity) pair gets its own window; the count resets
/// when the window elapses. Poisoned state fails open: throttling is a
/// courtesy, not a security boundary.
pub struct FixedWindowRateLimiter {
    max_actions: u32,
    window: Duration,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl FixedWindowRateLimiter {
    pub fn new(max_actions: u32, window: Duration) -> Self {
        Self {
            max_actions,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimiter for FixedWindowRateLimiter {
    async fn check_and_consume(&self, action: &str, identity: &str) -> bool {
        let key = format!("{action}:{identity}");
        let now = Instant::now();

        let mut windows = match self.windows.lock() {
            Ok(windows) => windows,
            Err(_) => return true,
        };
        let (started, count) = windows.entry(key).or_insert((now, 0));
        if now.duration_since(*started) >= self.window {
            *started = now;
            *count = 0;
        }
        if *count >= self.max_actions {
            debug!(action, identity, "rate limit hit");
            return false;
        }
        *count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_enforced_within_window() {
        let limiter = FixedWindowRateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.check_and_consume("propose", "m1").await);
        assert!(limiter.check_and_consume("propose", "m1").await);
        assert!(!limiter.check_and_consume("propose", "m1").await);

        // Other identities and actions have their own windows.
        assert!(limiter.check_and_consume("propose", "m2").await);
        assert!(limiter.check_and_consume("vote", "m1").await);
    }

    #[tokio::test]
    async fn test_window_reset() {
        let limiter = FixedWindowRateLimiter::new(1, Duration::ZERO);
        assert!(limiter.check_and_consume("vote", "m1").await);
        // Zero-length window: every call starts a fresh window.
        assert!(limiter.check_and_consume("vote", "m1").await);
    }
}
