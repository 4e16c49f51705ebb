//! Token-bucket rate limiting.
//!
//! Each bucket is keyed by client and route. A request consumes one token;
//! tokens refill at `1 / refill_interval` per second up to `capacity`.
//! The check-and-consume step must be atomic per key, so it runs inside the
//! store ([`RedisRateLimitStore`] executes it as one server-side script).
//!
//! Enforcement fails open: if the store errors or does not answer within
//! the configured timeout, the request is allowed.

mod memory;
mod middleware;
mod redis;

use std::time::Duration;

pub use memory::MemoryRateLimitStore;
pub use middleware::{
    DEFAULT_STORE_TIMEOUT, RATE_LIMITED_MESSAGE, RateLimitState, enforce_rate_limit,
};
pub use redis::RedisRateLimitStore;

/// Refill and capacity parameters for one class of route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBucketPolicy {
    pub capacity: u32,
    /// Time to earn one token back.
    pub refill_interval: Duration,
    /// Untouched buckets are dropped after this long.
    pub idle_ttl: Duration,
}

impl TokenBucketPolicy {
    pub const fn new(capacity: u32, refill_interval: Duration, idle_ttl: Duration) -> Self {
        Self {
            capacity,
            refill_interval,
            idle_ttl,
        }
    }

    /// 3 attempts, one back per minute.
    pub const fn login() -> Self {
        Self::new(3, Duration::from_secs(60), Duration::from_secs(24 * 60 * 60))
    }

    /// 5 attempts, one back every 5 seconds.
    pub const fn register() -> Self {
        Self::new(5, Duration::from_secs(5), Duration::from_secs(5 * 60))
    }

    /// Whole seconds per token, at least 1.
    pub fn refill_interval_secs(&self) -> i64 {
        self.refill_interval.as_secs().max(1) as i64
    }

    /// Whole seconds, at least 1.
    pub fn idle_ttl_secs(&self) -> i64 {
        self.idle_ttl.as_secs().max(1) as i64
    }

    /// One check-and-consume step on a bucket.
    ///
    /// `state` is `None` for a bucket that does not exist yet (or expired);
    /// it starts full. `now` is unix seconds. On [`BucketOutcome::Limited`]
    /// nothing is to be persisted.
    pub fn take(&self, state: Option<BucketState>, now: i64) -> BucketOutcome {
        let capacity = f64::from(self.capacity);
        let mut bucket = state.unwrap_or(BucketState {
            tokens: capacity,
            last_refill: now,
        });

        let elapsed = (now - bucket.last_refill).max(0);
        let refill = elapsed / self.refill_interval_secs();
        if refill > 0 {
            bucket.tokens = (bucket.tokens + refill as f64).min(capacity);
            bucket.last_refill = now;
        }

        if bucket.tokens > 0.0 {
            bucket.tokens -= 1.0;
            BucketOutcome::Allowed(bucket)
        } else {
            BucketOutcome::Limited
        }
    }
}

/// Persisted bucket fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketState {
    pub tokens: f64,
    /// Unix seconds of the last refill.
    pub last_refill: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BucketOutcome {
    /// Token consumed; persist the new state.
    Allowed(BucketState),
    Limited,
}

impl BucketOutcome {
    pub fn is_limited(&self) -> bool {
        matches!(self, BucketOutcome::Limited)
    }
}

/// Store failures. Logged by the middleware, never shown to clients.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit store error: {0}")]
    Store(#[from] ::redis::RedisError),

    #[error("rate limit store did not answer within {0:?}")]
    Timeout(Duration),
}

/// Backend holding bucket state.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Atomically run [`TokenBucketPolicy::take`] against the bucket at `key`
    /// and persist the result. Returns `true` when the request must be denied.
    async fn is_limited(
        &self,
        key: &str,
        policy: &TokenBucketPolicy,
        now: i64,
    ) -> Result<bool, RateLimitError>;
}

/// `ratelimit:<client>:<route>`
pub fn bucket_key(client: &str, route: &str) -> String {
    format!("ratelimit:{client}:{route}")
}

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(capacity: u32, interval_secs: u64) -> TokenBucketPolicy {
        TokenBucketPolicy::new(
            capacity,
            Duration::from_secs(interval_secs),
            Duration::from_secs(300),
        )
    }

    fn allowed(outcome: BucketOutcome) -> BucketState {
        match outcome {
            BucketOutcome::Allowed(state) => state,
            BucketOutcome::Limited => panic!("expected the request to be allowed"),
        }
    }

    #[test]
    fn fresh_bucket_starts_full_and_consumes_one() {
        let state = allowed(policy(3, 60).take(None, 1_000));
        assert_eq!(state.tokens, 2.0);
        assert_eq!(state.last_refill, 1_000);
    }

    #[test]
    fn capacity_requests_then_denied() {
        let p = policy(3, 60);
        let mut state = None;
        for _ in 0..3 {
            state = Some(allowed(p.take(state, 1_000)));
        }
        assert!(p.take(state, 1_000).is_limited());
        assert!(p.take(state, 1_059).is_limited());
    }

    #[test]
    fn refill_is_floor_of_elapsed_over_interval() {
        let p = policy(5, 5);
        let empty = BucketState {
            tokens: 0.0,
            last_refill: 100,
        };
        // 4s: no token yet, and last_refill must not move.
        assert!(p.take(Some(empty), 104).is_limited());

        // 12s: two tokens earned, one spent.
        let state = allowed(p.take(Some(empty), 112));
        assert_eq!(state.tokens, 1.0);
        assert_eq!(state.last_refill, 112);
    }

    #[test]
    fn refill_caps_at_capacity() {
        let p = policy(3, 60);
        let state = BucketState {
            tokens: 1.0,
            last_refill: 0,
        };
        let state = allowed(p.take(Some(state), 86_400));
        assert_eq!(state.tokens, 2.0);
    }

    #[test]
    fn denial_does_not_reset_refill_progress() {
        let p = policy(1, 60);
        let state = allowed(p.take(None, 0));
        // A denied attempt at 30s is not persisted, so the token still
        // arrives at 60s.
        assert!(p.take(Some(state), 30).is_limited());
        assert!(!p.take(Some(state), 60).is_limited());
    }

    #[test]
    fn clock_going_backwards_refills_nothing() {
        let p = policy(2, 1);
        let state = BucketState {
            tokens: 0.0,
            last_refill: 500,
        };
        assert!(p.take(Some(state), 400).is_limited());
    }

    #[test]
    fn builtin_policies() {
        let login = TokenBucketPolicy::login();
        assert_eq!(login.capacity, 3);
        assert_eq!(login.refill_interval_secs(), 60);
        assert_eq!(login.idle_ttl_secs(), 86_400);

        let register = TokenBucketPolicy::register();
        assert_eq!(register.capacity, 5);
        assert_eq!(register.refill_interval_secs(), 5);
        assert_eq!(register.idle_ttl_secs(), 300);
    }

    #[test]
    fn key_format() {
        assert_eq!(
            bucket_key("10.0.0.1", "/api/auth/login"),
            "ratelimit:10.0.0.1:/api/auth/login"
        );
    }
}
