use crate::error::DataClientError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Runs `op` up to `max_attempts` times, sleeping with doubling backoff
/// between attempts.
///
/// Only transient faults (transport/provider errors) are retried; a NoData
/// answer is a definitive result and is returned immediately.
pub async fn with_retry<T, F, Fut>(
    label: &str,
    max_attempts: u32,
    mut op: F,
) -> Result<T, DataClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DataClientError>>,
{
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                warn!(
                    "transient fetch failure for {label} (attempt {attempt}/{max_attempts}): \
                     {err}; retrying in {backoff:?}"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn no_data_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry("test", 3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(DataClientError::NoData {
                    symbol: "X".to_string(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(DataClientError::NoData { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_faults_retry_until_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry("test", 3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DataClientError::Api("rate limited".to_string())) }
        })
        .await;
        assert!(matches!(result, Err(DataClientError::Api(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn success_after_failure_is_returned() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test", 3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DataClientError::Api("blip".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
