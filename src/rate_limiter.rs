use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::error::ApiError;

/// Per-client fixed-window request limiter. The window and request budget
/// come from config; the defaults match the original deployment (100
/// requests per 15 minutes, applied to every route).
pub struct RateLimiter {
    windows: RwLock<HashMap<String, Window>>,
    max_requests: u32,
    window: Duration,
}

struct Window {
    count: u32,
    started_at: Instant,
}

/// Outcome of a rate-limit check, carrying what the response headers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub retry_after: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Count one request against `key`'s current window.
    pub fn check(&self, key: &str) -> Result<RateLimitDecision, ApiError> {
        let now = Instant::now();

        let mut windows = self
            .windows
            .write()
            .map_err(|_| ApiError::Internal("rate limiter lock poisoned".to_string()))?;

        let window = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started_at: now,
        });

        if now.duration_since(window.started_at) >= self.window {
            window.count = 0;
            window.started_at = now;
        }

        let retry_after = self
            .window
            .saturating_sub(now.duration_since(window.started_at));

        if window.count >= self.max_requests {
            return Ok(RateLimitDecision {
                allowed: false,
                limit: self.max_requests,
                remaining: 0,
                retry_after,
            });
        }

        window.count += 1;
        Ok(RateLimitDecision {
            allowed: true,
            limit: self.max_requests,
            remaining: self.max_requests - window.count,
            retry_after,
        })
    }

    /// Drop windows whose period has fully elapsed.
    pub fn cleanup_expired(&self) -> Result<usize, ApiError> {
        let mut windows = self
            .windows
            .write()
            .map_err(|_| ApiError::Internal("rate limiter lock poisoned".to_string()))?;

        let before = windows.len();
        windows.retain(|_, w| w.started_at.elapsed() < self.window);
        Ok(before - windows.len())
    }
}
