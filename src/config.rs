use std::time::Duration;

/// Polling settings for monitor loops started through
/// [`MonitorTask::spawn_with`](crate::MonitorTask::spawn_with).
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use cad_monitor::PollConfig;
///
/// let config = PollConfig::default()
///     .with_interval(Duration::from_secs(10))
///     .with_min_interval(Duration::from_secs(2));
/// assert_eq!(config.effective_interval(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between two polls of the backend.
    /// Default: 30 s
    pub interval: Duration,

    /// Lower bound applied to `interval`, protecting the CAD system from
    /// being hammered by a misconfigured caller.
    /// Default: 1 s. Set to Duration::ZERO to allow back-to-back polling.
    pub min_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: Duration::from_secs(30),
            min_interval: Duration::from_secs(1),
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Interval actually used by the loop: `interval` clamped to `min_interval`.
    pub fn effective_interval(&self) -> Duration {
        self.interval.max(self.min_interval)
    }
}
