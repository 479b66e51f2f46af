//! Sleep abstraction for testability.
//!
//! Retry backoff sleeps through a [`Sleeper`] so tests can run retries
//! without waiting.

use std::future::Future;
use std::time::Duration;

/// Abstraction over async sleeping.
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately. Intended for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn instant_sleeper_does_not_wait() {
        let start = Instant::now();

        InstantSleeper.sleep(Duration::from_secs(60)).await;

        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn tokio_sleeper_waits_at_least_duration() {
        let start = Instant::now();

        TokioSleeper.sleep(Duration::from_millis(20)).await;

        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn sleepers_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokioSleeper>();
        assert_send_sync::<InstantSleeper>();
    }
}
