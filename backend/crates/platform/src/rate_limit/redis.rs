//! Redis-backed bucket store shared by every API instance.

use ::redis::Script;
use ::redis::aio::ConnectionManager;

use super::{RateLimitError, RateLimitStore, TokenBucketPolicy};

/// Runs the whole read-refill-consume-write step server-side so that
/// concurrent requests on one key cannot interleave.
///
/// KEYS[1] bucket key
/// ARGV    capacity, refill interval (s), idle ttl (s), now (unix s)
/// returns 1 when a token was consumed, 0 when limited
const TOKEN_BUCKET_LUA: &str = r#"
local capacity = tonumber(ARGV[1])
local interval = tonumber(ARGV[2])
local ttl = tonumber(ARGV[3])
local now = tonumber(ARGV[4])

local bucket = redis.call('HMGET', KEYS[1], 'tokens', 'last_refill')
local tokens = tonumber(bucket[1])
local last_refill = tonumber(bucket[2])
if tokens == nil or last_refill == nil then
    tokens = capacity
    last_refill = now
end

local elapsed = now - last_refill
if elapsed < 0 then
    elapsed = 0
end
local refill = math.floor(elapsed / interval)
if refill > 0 then
    tokens = math.min(capacity, tokens + refill)
    last_refill = now
end

if tokens > 0 then
    tokens = tokens - 1
    redis.call('HSET', KEYS[1], 'tokens', tokens, 'last_refill', last_refill)
    redis.call('EXPIRE', KEYS[1], ttl)
    return 1
end
return 0
"#;

#[derive(Clone)]
pub struct RedisRateLimitStore {
    conn: ConnectionManager,
    script: Script,
}

impl RedisRateLimitStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            script: Script::new(TOKEN_BUCKET_LUA),
        }
    }

    /// Open a managed connection (reconnects on its own after failures).
    pub async fn connect(url: &str) -> Result<Self, RateLimitError> {
        let client = ::redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis rate limit store");
        Ok(Self::new(conn))
    }
}

impl RateLimitStore for RedisRateLimitStore {
    async fn is_limited(
        &self,
        key: &str,
        policy: &TokenBucketPolicy,
        now: i64,
    ) -> Result<bool, RateLimitError> {
        let mut conn = self.conn.clone();
        // EVALSHA first, EVAL on NOSCRIPT.
        let allowed: i64 = self
            .script
            .key(key)
            .arg(policy.capacity)
            .arg(policy.refill_interval_secs())
            .arg(policy.idle_ttl_secs())
            .arg(now)
            .invoke_async(&mut conn)
            .await?;

        Ok(allowed == 0)
    }
}

/// Run against a live server: `REDIS_URL=redis://127.0.0.1/ cargo test -p platform -- --ignored`.
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::crypto::random_secret;
    use crate::rate_limit::unix_now;

    async fn store() -> RedisRateLimitStore {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        RedisRateLimitStore::connect(&url).await.unwrap()
    }

    fn key(name: &str) -> String {
        format!("ratelimit:test-{}:{name}", random_secret(8))
    }

    async fn bucket_field(store: &RedisRateLimitStore, key: &str, field: &str) -> Option<i64> {
        let mut conn = store.conn.clone();
        ::redis::cmd("HGET")
            .arg(key)
            .arg(field)
            .query_async(&mut conn)
            .await
            .unwrap()
    }

    async fn cleanup(store: &RedisRateLimitStore, key: &str) {
        let mut conn = store.conn.clone();
        let _: i64 = ::redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "needs a Redis server"]
    async fn capacity_then_limited_then_one_refill() {
        let store = store().await;
        let key = key("/api/auth/register");
        let policy = TokenBucketPolicy::new(2, Duration::from_secs(10), Duration::from_secs(300));

        assert!(!store.is_limited(&key, &policy, 1_000).await.unwrap());
        assert!(!store.is_limited(&key, &policy, 1_000).await.unwrap());
        assert!(store.is_limited(&key, &policy, 1_000).await.unwrap());

        // A denial leaves the stored bucket as it was.
        assert!(store.is_limited(&key, &policy, 1_009).await.unwrap());
        assert_eq!(bucket_field(&store, &key, "tokens").await, Some(0));
        assert_eq!(bucket_field(&store, &key, "last_refill").await, Some(1_000));

        // One interval later, exactly one token is back.
        assert!(!store.is_limited(&key, &policy, 1_010).await.unwrap());
        assert!(store.is_limited(&key, &policy, 1_010).await.unwrap());
        assert_eq!(bucket_field(&store, &key, "last_refill").await, Some(1_010));

        cleanup(&store, &key).await;
    }

    #[tokio::test]
    #[ignore = "needs a Redis server"]
    async fn concurrent_requests_get_exactly_capacity() {
        let store = Arc::new(store().await);
        let key = Arc::new(key("/api/auth/login"));
        let policy = TokenBucketPolicy::new(5, Duration::from_secs(60), Duration::from_secs(300));

        let mut handles = Vec::new();
        for _ in 0..25 {
            let store = store.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                store.is_limited(&key, &policy, 2_000).await
            }));
        }

        let mut allowed = 0;
        for handle in handles {
            if !handle.await.unwrap().unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 5);

        cleanup(&store, &key).await;
    }

    #[tokio::test]
    #[ignore = "needs a Redis server"]
    async fn bucket_expires_after_idle_ttl() {
        let store = store().await;
        let key = key("/api/auth/login");
        let policy = TokenBucketPolicy::login();

        assert!(!store.is_limited(&key, &policy, unix_now()).await.unwrap());

        let mut conn = store.conn.clone();
        let ttl: i64 = ::redis::cmd("TTL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .unwrap();
        assert!(ttl > 0 && ttl <= policy.idle_ttl_secs(), "ttl = {ttl}");

        cleanup(&store, &key).await;
    }
}
