use std::time::{Duration, Instant};

use quick_cache::sync::Cache;

#[derive(Debug)]
pub struct Config {
    pub capacity: usize,
    pub ttl: Duration,
}

/// Ids of chat messages that were already handled.
///
/// Slack retries deliveries, so every message id is answered at most once
/// within `ttl`. Older ids are forgotten and the size stays bounded by
/// `capacity`.
pub struct SeenMessages {
    inner: Cache<String, Instant>,
    ttl: Duration,
}

impl SeenMessages {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            inner: Cache::new(config.capacity.max(1)),
            ttl: config.ttl,
        }
    }

    /// Records `id` and returns whether this is its first delivery.
    pub fn first_delivery(&self, id: &str) -> bool {
        self.first_delivery_at(id, Instant::now())
    }

    fn first_delivery_at(&self, id: &str, now: Instant) -> bool {
        if let Some(seen_at) = self.inner.get(id) {
            if now.saturating_duration_since(seen_at) < self.ttl {
                return false;
            }
        }

        self.inner.insert(id.to_string(), now);
        true
    }
}
