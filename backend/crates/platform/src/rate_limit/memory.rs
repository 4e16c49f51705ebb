//! In-process bucket store for tests and single-instance development.
//!
//! Expired buckets are swept on every call, so memory stays bounded by the
//! number of clients seen within one idle TTL.

use std::collections::HashMap;

use tokio::sync::Mutex;

use super::{BucketOutcome, BucketState, RateLimitError, RateLimitStore, TokenBucketPolicy};

#[derive(Default)]
pub struct MemoryRateLimitStore {
    buckets: Mutex<HashMap<String, StoredBucket>>,
}

#[derive(Clone, Copy)]
struct StoredBucket {
    state: BucketState,
    expires_at: i64,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buckets held, as of the last call.
    pub async fn len(&self) -> usize {
        self.buckets.lock().await.len()
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn is_limited(
        &self,
        key: &str,
        policy: &TokenBucketPolicy,
        now: i64,
    ) -> Result<bool, RateLimitError> {
        let mut buckets = self.buckets.lock().await;
        buckets.retain(|_, b| b.expires_at > now);

        let current = buckets.get(key).map(|b| b.state);

        match policy.take(current, now) {
            BucketOutcome::Allowed(state) => {
                buckets.insert(
                    key.to_string(),
                    StoredBucket {
                        state,
                        expires_at: now + policy.idle_ttl_secs(),
                    },
                );
                Ok(false)
            }
            BucketOutcome::Limited => Ok(true),
        }
    }
}
