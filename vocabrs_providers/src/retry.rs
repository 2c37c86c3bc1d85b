use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Exponential delays `base, 2*base, 4*base, ...`, one per retry.
#[must_use]
pub fn backoff_delays(base: Duration, retries: u32) -> Vec<Duration> {
    (0..retries).map(|i| base * 2u32.saturating_pow(i)).collect()
}

/// Retry an async operation with backoff.
///
/// # Arguments
/// * `operation` - The async operation to retry
/// * `delays` - Wait before each retry; `delays.len() + 1` attempts at most
/// * `should_retry` - Errors for which this returns false are returned at once
///
/// # Returns
/// The result of the operation if successful, or the last error
pub async fn retry_with_backoff<F, Fut, T, E, R>(
    mut operation: F,
    delays: &[Duration],
    should_retry: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
    R: Fn(&E) -> bool,
{
    let attempts = delays.len() + 1;
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                let Some(delay) = delays.get(attempt).copied().filter(|_| should_retry(&e)) else {
                    return Err(e);
                };
                attempt += 1;
                warn!("Request failed (attempt {attempt}/{attempts}): {e}. Retrying after {delay:?}...");
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NO_WAIT: [Duration; 3] = [Duration::ZERO; 3];

    #[test]
    fn backoff_doubles() {
        assert_eq!(
            backoff_delays(Duration::from_secs(1), 3),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
        assert!(backoff_delays(Duration::from_secs(1), 0).is_empty());
    }

    #[tokio::test]
    async fn retry_succeeds_on_first_attempt() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), String>(())
                }
            },
            &NO_WAIT,
            |_| true,
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_succeeds_after_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if count < 3 {
                        Err(String::from("fail"))
                    } else {
                        Ok(())
                    }
                }
            },
            &NO_WAIT,
            |_| true,
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_fails_after_all_attempts() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(String::from("fail"))
                }
            },
            &NO_WAIT,
            |_| true,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(String::from("bad request"))
                }
            },
            &NO_WAIT,
            |e| e != "bad request",
        )
        .await;
        assert_eq!(result, Err(String::from("bad request")));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
