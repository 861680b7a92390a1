use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::{LimitConfig, RateLimitConfig};

/// Fixed-window request counter keyed by client identifier.
///
/// The first hit for a key opens a window of `window` length; at most `points`
/// hits are accepted until the window elapses.
pub struct RateLimiter {
    points: u32,
    window: Duration,
    buckets: DashMap<String, Bucket>,
}

struct Bucket {
    started: Instant,
    hits: u32,
}

impl RateLimiter {
    pub fn new(limit: LimitConfig) -> Self {
        Self {
            points: limit.points,
            window: Duration::from_secs(limit.window_secs),
            buckets: DashMap::new(),
        }
    }

    /// Count one hit for `key`. On rejection returns the seconds until the
    /// current window closes (at least 1).
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), u64> {
        let mut bucket = self.buckets.entry(key.to_owned()).or_insert(Bucket {
            started: now,
            hits: 0,
        });

        if now.duration_since(bucket.started) >= self.window {
            bucket.started = now;
            bucket.hits = 0;
        }

        if bucket.hits >= self.points {
            let remaining = self.window.saturating_sub(now.duration_since(bucket.started));
            return Err(remaining.as_secs().max(1));
        }

        bucket.hits += 1;
        Ok(())
    }

    /// Drop buckets whose window has already elapsed.
    pub fn prune(&self) {
        let now = Instant::now();
        self.buckets
            .retain(|_, b| now.duration_since(b.started) < self.window);
    }
}

/// Limiters for the unauthenticated auth endpoints.
pub struct RateLimiters {
    pub login: RateLimiter,
    pub register: RateLimiter,
    pub forgot_password: RateLimiter,
}

impl RateLimiters {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            login: RateLimiter::new(config.login),
            register: RateLimiter::new(config.register),
            forgot_password: RateLimiter::new(config.forgot_password),
        }
    }

    pub fn prune(&self) {
        self.login.prune();
        self.register.prune();
        self.forgot_password.prune();
    }
}
