use std::time::Duration;

/// Decides whether a gap since the last input makes an interval idle.
#[derive(Debug, Clone, Copy)]
pub struct IdleEvaluator {
    threshold: Duration,
}

impl IdleEvaluator {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    #[cfg(test)]
    pub fn from_millis(threshold_ms: u64) -> Self {
        Self::new(Duration::from_millis(threshold_ms))
    }

    /// Strictly greater than the threshold, a gap equal to it still counts as active.
    pub fn is_idle(&self, gap: Duration) -> bool {
        self.threshold < gap
    }
}
