//! Token-bucket throttle for mutating endpoints.
//!
//! The limiter is an explicit object constructed once at startup and
//! carried in `AppState` — never a bare global. The clock is injected so
//! refill and eviction behavior is testable, and idle buckets are evicted
//! on a TTL sweep so the map stays bounded.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;
use tracing::debug;

use draftroom_core::AppError;
use draftroom_core::config::throttle::ThrottleConfig;

use crate::state::AppState;

/// Time source for the limiter.
pub trait Clock: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time source used in production.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

/// Per-caller token-bucket rate limiter with TTL eviction.
pub struct ThrottleLimiter {
    /// Caller key → bucket state.
    buckets: Mutex<HashMap<String, TokenBucket>>,
    /// Injected time source.
    clock: Arc<dyn Clock>,
    /// Tunables.
    config: ThrottleConfig,
    /// When the last idle-bucket sweep ran.
    last_sweep: Mutex<Instant>,
}

impl ThrottleLimiter {
    /// Create a limiter on the system clock.
    pub fn new(config: ThrottleConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a limiter with an injected clock.
    pub fn with_clock(config: ThrottleConfig, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            buckets: Mutex::new(HashMap::new()),
            clock,
            config,
            last_sweep: Mutex::new(now),
        }
    }

    /// Whether throttling is configured on.
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Try to consume one token for `key`. Always passes when disabled.
    pub async fn check(&self, key: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        let now = self.clock.now();
        self.sweep_idle(now).await;

        let mut buckets = self.buckets.lock().await;
        let max = f64::from(self.config.max_tokens);
        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: max,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.config.refill_per_second).min(max);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Number of tracked buckets (post-sweep), for introspection.
    pub async fn bucket_count(&self) -> usize {
        self.buckets.lock().await.len()
    }

    /// Evict buckets idle longer than the configured window, at most once
    /// per window.
    async fn sweep_idle(&self, now: Instant) {
        let window = Duration::from_secs(self.config.idle_eviction_seconds);
        {
            let mut last_sweep = self.last_sweep.lock().await;
            if now.duration_since(*last_sweep) < window {
                return;
            }
            *last_sweep = now;
        }

        let mut buckets = self.buckets.lock().await;
        let before = buckets.len();
        buckets.retain(|_, bucket| now.duration_since(bucket.last_refill) < window);
        if buckets.len() < before {
            debug!(evicted = before - buckets.len(), "Evicted idle throttle buckets");
        }
    }
}

/// Middleware applying the limiter to mutating requests, keyed by peer IP.
pub async fn throttle_requests(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    ) {
        return Ok(next.run(request).await);
    }

    if !state.throttle.check(&addr.ip().to_string()).await {
        return Err(AppError::rate_limit("Too many write requests"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Clock advanced by hand from tests.
    struct ManualClock {
        base: Instant,
        offset: StdMutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: StdMutex::new(Duration::ZERO),
            }
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock().unwrap()
        }
    }

    fn config(max_tokens: u32, refill_per_second: f64) -> ThrottleConfig {
        ThrottleConfig {
            enabled: true,
            max_tokens,
            refill_per_second,
            idle_eviction_seconds: 60,
        }
    }

    #[tokio::test]
    async fn test_bucket_exhaustion_and_refill() {
        let clock = Arc::new(ManualClock::new());
        let limiter = ThrottleLimiter::with_clock(config(2, 1.0), Arc::clone(&clock) as _);

        assert!(limiter.check("1.2.3.4").await);
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);

        // One second refills one token.
        clock.advance(Duration::from_secs(1));
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let clock = Arc::new(ManualClock::new());
        let limiter = ThrottleLimiter::with_clock(config(1, 0.1), Arc::clone(&clock) as _);

        assert!(limiter.check("1.1.1.1").await);
        assert!(!limiter.check("1.1.1.1").await);
        assert!(limiter.check("2.2.2.2").await);
    }

    #[tokio::test]
    async fn test_idle_buckets_evicted() {
        let clock = Arc::new(ManualClock::new());
        let limiter = ThrottleLimiter::with_clock(config(5, 1.0), Arc::clone(&clock) as _);

        limiter.check("old-caller").await;
        assert_eq!(limiter.bucket_count().await, 1);

        // Past the idle window the next check sweeps the stale bucket.
        clock.advance(Duration::from_secs(120));
        limiter.check("new-caller").await;
        assert_eq!(limiter.bucket_count().await, 1);
    }

    #[tokio::test]
    async fn test_disabled_limiter_always_passes() {
        let limiter = ThrottleLimiter::new(ThrottleConfig::default());
        assert!(!limiter.enabled());
        for _ in 0..100 {
            assert!(limiter.check("1.2.3.4").await);
        }
        assert_eq!(limiter.bucket_count().await, 0);
    }
}
