//! Waiting on remote jobs.

use std::future::Future;

use tokio::time::Instant;
use tracing::debug;

use paperdesk_core::{Error, Result};

use crate::config::PollConfig;

/// Fetch a value until `is_done` accepts it.
///
/// The first fetch happens immediately; later fetches are spaced by
/// `config.interval`. Fetch errors propagate at once. Once `config.max_wait`
/// has elapsed without a finished value, returns [`Error::Timeout`].
pub async fn poll_until<T, F, Fut, P>(config: &PollConfig, mut fetch: F, is_done: P) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let started = Instant::now();
    let mut polls: u32 = 0;

    loop {
        let value = fetch().await?;
        polls += 1;

        if is_done(&value) {
            debug!(
                subsystem = "workflow",
                component = "poll",
                poll_count = polls,
                duration_ms = started.elapsed().as_millis() as u64,
                "Remote job reached a terminal state"
            );
            return Ok(value);
        }

        if started.elapsed() >= config.max_wait {
            return Err(Error::Timeout(format!(
                "gave up after {} polls over {}s",
                polls,
                config.max_wait.as_secs()
            )));
        }

        tokio::time::sleep(config.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_returns_first_done_value() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let value = poll_until(
            &PollConfig::default(),
            || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok(n) }
            },
            |n| *n >= 3,
        )
        .await
        .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_done_does_not_sleep() {
        let started = Instant::now();
        let value = poll_until(&PollConfig::default(), || async { Ok("done") }, |_| true)
            .await
            .unwrap();
        assert_eq!(value, "done");
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let config = PollConfig::default()
            .with_interval(Duration::from_secs(1))
            .with_max_wait(Duration::from_secs(5));

        let result = poll_until(&config, || async { Ok(0u32) }, |_| false).await;
        assert!(matches!(result, Err(Error::Timeout(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_propagates() {
        let result: Result<u32> = poll_until(
            &PollConfig::default(),
            || async { Err(Error::Remote("boom".to_string())) },
            |_| true,
        )
        .await;
        assert!(matches!(result, Err(Error::Remote(_))));
    }
}
