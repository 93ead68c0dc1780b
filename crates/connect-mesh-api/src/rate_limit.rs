// Per-key minimum-interval throttle.
//
// Each key owns its own async mutex guarding the instant of the last
// permitted call. Callers on the same key queue behind that mutex and each
// pays the full spacing; callers on different keys never touch each
// other's lock.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Throttles outbound calls per opaque key.
#[derive(Debug, Default)]
pub struct RateLimiter {
    slots: DashMap<String, Arc<Mutex<Option<Instant>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until at least `min_interval` has passed since the last call
    /// permitted for `key`, then record this call.
    pub async fn acquire(&self, key: &str, min_interval: Duration) {
        // Clone the slot out so the map shard is not held across the await.
        let slot = self.slot(key);
        let mut last = slot.lock().await;

        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < min_interval {
                let wait = min_interval - elapsed;
                trace!(key, wait_ms = wait.as_millis(), "rate limited");
                tokio::time::sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Number of keys seen so far.
    pub fn key_count(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, key: &str) -> Arc<Mutex<Option<Instant>>> {
        if let Some(slot) = self.slots.get(key) {
            return Arc::clone(slot.value());
        }
        Arc::clone(
            self.slots
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(None)))
                .value(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SPACING: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn first_call_is_free() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        limiter.acquire("status:a", SPACING).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn same_key_calls_are_spaced() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        limiter.acquire("status:a", SPACING).await;
        limiter.acquire("status:a", SPACING).await;
        assert!(start.elapsed() >= SPACING);
    }

    #[tokio::test(start_paused = true)]
    async fn second_call_pending_until_spacing_elapses() {
        let limiter = RateLimiter::new();
        limiter.acquire("status:a", SPACING).await;

        let mut second = tokio_test::task::spawn(limiter.acquire("status:a", SPACING));
        tokio_test::assert_pending!(second.poll());

        tokio::time::advance(SPACING).await;
        tokio_test::assert_ready!(second.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn no_wait_once_interval_has_passed() {
        let limiter = RateLimiter::new();
        limiter.acquire("status:a", SPACING).await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        let start = Instant::now();
        limiter.acquire("status:a", SPACING).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn different_keys_do_not_block() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        limiter.acquire("status:a", SPACING).await;
        limiter.acquire("status:b", SPACING).await;
        limiter.acquire("status:c", SPACING).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.key_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_each_pay_full_spacing() {
        let limiter = Arc::new(RateLimiter::new());
        let start = Instant::now();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.acquire("status:a", SPACING).await;
                    Instant::now()
                })
            })
            .collect();

        let mut stamps = Vec::new();
        for h in handles {
            stamps.push(h.await.unwrap());
        }
        stamps.sort();

        assert!(stamps[1] - stamps[0] >= SPACING);
        assert!(stamps[2] - stamps[1] >= SPACING);
        assert!(start.elapsed() >= SPACING * 2);
    }
}
