use std::time::Duration;

/// Reconnect policy for push feeds: a fixed interval and unbounded attempts.
///
/// The directory view stays open for long idle periods, so there is no
/// backoff growth and no retry cap. The policy is a value so the transport
/// loop stays independent of the schedule it follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    interval: Duration,
}

impl RetryPolicy {
    pub const fn fixed(interval: Duration) -> Self {
        Self { interval }
    }

    /// The delay before the given attempt (1-based). Fixed for every attempt.
    pub fn delay(&self, _attempt: u32) -> Duration {
        self.interval
    }

    /// Sleeps out the delay before the given attempt.
    pub async fn wait(&self, attempt: u32) {
        tokio::time::sleep(self.delay(attempt)).await;
    }
}
