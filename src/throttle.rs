use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// FIFO admission gate enforcing a minimum interval between admissions.
///
/// Waiters queue on tokio's fair mutex, so they are admitted in arrival order.
/// The first caller after an idle period goes through immediately.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_admitted: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_admitted: Mutex::new(None),
        }
    }

    /// Wait for this caller's turn; returns how long it was held back
    pub async fn acquire(&self) -> Duration {
        let arrived = Instant::now();
        let mut last = self.last_admitted.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                tracing::debug!(
                    "Delaying request by {}ms",
                    (ready_at - Instant::now()).as_millis()
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        let now = Instant::now();
        *last = Some(now);
        now - arrived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_request_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_millis(1000));
        assert_eq!(limiter.acquire().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_request_waits_for_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(1000));
        limiter.acquire().await;

        let waited = limiter.acquire().await;
        assert_eq!(waited, Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_gap_counts_toward_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(1000));
        limiter.acquire().await;

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(limiter.acquire().await, Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiters_admitted_in_order() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(100)));
        let start = Instant::now();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..4 {
            let limiter = Arc::clone(&limiter);
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                order.lock().await.push((i, Instant::now() - start));
            }));
            // let each task reach the queue before spawning the next
            tokio::task::yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let order = order.lock().await;
        let ids: Vec<_> = order.iter().map(|(i, _)| *i).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(order[3].1, Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::new(Duration::ZERO);
        limiter.acquire().await;
        assert!(limiter.acquire().await < Duration::from_millis(50));
    }
}
