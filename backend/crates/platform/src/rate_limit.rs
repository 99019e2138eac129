//! Rate Limiting Infrastructure
//!
//! Fixed-window request counting keyed by an arbitrary string (client IP
//! for the auth routes). Storage sits behind [`RateLimitStore`] so a shared
//! backend can replace the in-process map.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Mutex;

/// Entries kept before expired windows are swept.
const PRUNE_THRESHOLD: usize = 10_000;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    /// 50 requests per 15 minutes
    fn default() -> Self {
        Self {
            max_requests: 50,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    /// Time until the current window closes
    pub reset_after: Duration,
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Rate limit backend error: {0}")]
    Backend(String),
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request against `key` and report whether it is allowed.
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitError>;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Default)]
struct Windows {
    entries: HashMap<String, Window>,
    last_sweep: Option<Instant>,
}

impl Windows {
    /// Drop expired windows, at most once per window length.
    fn sweep(&mut self, now: Instant, window: Duration, threshold: usize) {
        if self.entries.len() < threshold {
            return;
        }
        if self
            .last_sweep
            .is_some_and(|at| now.saturating_duration_since(at) < window)
        {
            return;
        }

        let before = self.entries.len();
        self.entries.retain(|_, w| now.saturating_duration_since(w.started) < window);
        self.last_sweep = Some(now);
        tracing::debug!(
            pruned = before - self.entries.len(),
            "Expired rate limit windows pruned"
        );
    }
}

/// In-process fixed-window store
#[derive(Debug)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<Windows>,
    prune_threshold: usize,
}

impl Default for InMemoryRateLimitStore {
    fn default() -> Self {
        Self {
            windows: Mutex::new(Windows::default()),
            prune_threshold: PRUNE_THRESHOLD,
        }
    }
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as [`RateLimitStore::check_and_increment`] with an explicit clock.
    pub async fn check_and_increment_at(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now: Instant,
    ) -> RateLimitResult {
        let mut windows = self.windows.lock().await;
        windows.sweep(now, config.window, self.prune_threshold);

        let window = windows
            .entries
            .entry(key.to_string())
            .and_modify(|w| {
                if now.saturating_duration_since(w.started) >= config.window {
                    *w = Window {
                        started: now,
                        count: 0,
                    };
                }
            })
            .or_insert(Window {
                started: now,
                count: 0,
            });

        window.count = window.count.saturating_add(1);

        let elapsed = now.saturating_duration_since(window.started);
        RateLimitResult {
            allowed: window.count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(window.count),
            reset_after: config.window.saturating_sub(elapsed),
        }
    }

    pub async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.entries.len()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitError> {
        Ok(self
            .check_and_increment_at(key, config, Instant::now())
            .await)
    }
}
