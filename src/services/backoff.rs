use std::time::Duration;

/// Exponential delay between failed fetch attempts: `base * 2^attempt_index`.
/// With the default one-second base the waits are 1s, 2s, 4s, ...
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(300))
    }
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        Self { base, max: max.max(base) }
    }

    /// Delay to wait after the zero-based attempt `attempt_index` failed.
    pub fn delay(&self, attempt_index: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt_index).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max)
    }
}
