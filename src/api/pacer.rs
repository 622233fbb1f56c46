use std::time::{Duration, Instant};

/// Enforces a minimum interval between successive requests
///
/// The catalog's search endpoint allows a fixed request rate; the pacer
/// tracks when the last request was issued and makes every caller wait out
/// the remainder of the interval before issuing the next one. It gates every
/// HTTP attempt, including retries of a failed page, so the floor holds
/// unconditionally.
#[derive(Debug)]
pub struct Pacer {
    /// Minimum time between issued requests
    min_interval: Duration,

    /// When the most recent request was issued
    last_request: Option<Instant>,
}

impl Pacer {
    /// Creates a pacer with the given minimum interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Calculates the remaining wait before the next request may be issued
    ///
    /// Returns `None` if a request can be issued now, or the duration still
    /// to wait otherwise.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request?;
        let elapsed = now.duration_since(last);
        if elapsed >= self.min_interval {
            None
        } else {
            Some(self.min_interval - elapsed)
        }
    }

    /// Records that a request was issued
    pub fn record(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    /// Waits until the interval has elapsed, then records the new issuance
    pub async fn wait(&mut self) {
        if let Some(delay) = self.time_until_ready(Instant::now()) {
            tracing::debug!("Waiting {:?} before next request (rate limit compliance)", delay);
            tokio::time::sleep(delay).await;
        }
        self.record(Instant::now());
    }
}
