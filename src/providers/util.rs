use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often a remote call is retried and how long to wait in between. The wait grows
/// linearly with each failed attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub retries: usize,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(retries: usize, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
        }
    }

    fn delay_after(&self, attempt: usize) -> Duration {
        self.base_delay * attempt as u32
    }
}

/// Runs `operation` until it succeeds or the policy's retries are used up, returning the
/// last error in that case.
pub async fn with_retry<F, Fut, T, E>(mut operation: F, policy: RetryPolicy) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<Error>,
{
    let mut attempt = 1;
    loop {
        let err = match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => err.into(),
        };
        if attempt > policy.retries {
            return Err(err);
        }

        let delay = policy.delay_after(attempt);
        debug!(attempt, ?delay, "Request failed, retrying: {err}");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
