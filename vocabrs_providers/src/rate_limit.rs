use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// Sliding-window limiter: at most `max_requests` per `window`.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    sent: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// `max_requests == 0` disables limiting.
    #[must_use]
    pub const fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            sent: Mutex::new(VecDeque::new()),
        }
    }

    #[must_use]
    pub const fn per_second(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(1))
    }

    /// Waits until another request fits in the window, then records it.
    pub async fn acquire(&self) {
        let wait = self.delay_at(Instant::now());
        if !wait.is_zero() {
            debug!("Rate limit reached, waiting {wait:?}");
            sleep(wait).await;
        }
        self.record(Instant::now());
    }

    fn delay_at(&self, now: Instant) -> Duration {
        if self.max_requests == 0 {
            return Duration::ZERO;
        }

        let mut sent = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
        while sent
            .front()
            .is_some_and(|&t| now.saturating_duration_since(t) >= self.window)
        {
            sent.pop_front();
        }

        match sent.front() {
            Some(&oldest) if sent.len() >= self.max_requests => {
                self.window.saturating_sub(now.saturating_duration_since(oldest))
            }
            _ => Duration::ZERO,
        }
    }

    fn record(&self, at: Instant) {
        if self.max_requests == 0 {
            return;
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(at);
    }
}
