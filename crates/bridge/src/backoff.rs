use std::time::Duration;

use {async_trait::async_trait, tokio_util::sync::CancellationToken};

/// Wait between reconnect attempts.
#[async_trait]
pub trait BackoffPolicy: Send + Sync {
    /// Wait before reconnect `attempt` (1-based). Returns `false` when
    /// cancelled during the wait.
    async fn wait(&self, attempt: u32, cancel: &CancellationToken) -> bool;
}

/// Same delay before every attempt.
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff {
    pub delay: Duration,
}

impl FixedBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl BackoffPolicy for FixedBackoff {
    async fn wait(&self, _attempt: u32, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            () = cancel.cancelled() => false,
            () = tokio::time::sleep(self.delay) => true,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn waits_the_full_delay() {
        let backoff = FixedBackoff::new(Duration::from_millis(20));
        let started = tokio::time::Instant::now();
        assert!(backoff.wait(1, &CancellationToken::new()).await);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn cancellation_cuts_the_wait_short() {
        let backoff = FixedBackoff::new(Duration::from_secs(3600));
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(!backoff.wait(1, &cancel).await);
    }
}
