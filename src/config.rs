//! Repository configuration.

use std::time::Duration;

use tracing::warn;

/// How long a shared view keeps its producer alive after the last observer
/// detaches.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Buffered one-shot events before the oldest is dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Upper bound for the event buffer. The channel allocates every slot up front.
pub const MAX_EVENT_CAPACITY: usize = 4_096;

pub const STOP_TIMEOUT_ENV: &str = "TOTP_SYNC_STOP_TIMEOUT_MS";
pub const EVENT_CAPACITY_ENV: &str = "TOTP_SYNC_EVENT_CAPACITY";

/// Configuration for a [`Repository`](crate::repository::Repository).
///
/// # Example
///
/// ```ignore
/// use totp_sync::config::RepositoryConfig;
///
/// let config = RepositoryConfig::default()
///     .with_stop_timeout(Duration::from_secs(1))
///     .with_event_capacity(16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Grace period for every shared view (default: 5s)
    pub stop_timeout: Duration,
    /// Capacity of the one-shot event channel (default: 64)
    pub event_capacity: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl RepositoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.stop_timeout = stop_timeout;
        self
    }

    /// Set the event buffer size. Zero is raised to one and values above
    /// [`MAX_EVENT_CAPACITY`] are lowered to it.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        if capacity > MAX_EVENT_CAPACITY {
            warn!(
                "Event capacity {} exceeds {}, clamping",
                capacity, MAX_EVENT_CAPACITY
            );
        }
        self.event_capacity = capacity.clamp(1, MAX_EVENT_CAPACITY);
        self
    }

    /// Defaults overridden by `TOTP_SYNC_STOP_TIMEOUT_MS` and
    /// `TOTP_SYNC_EVENT_CAPACITY`. Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(STOP_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config = config.with_stop_timeout(Duration::from_millis(ms)),
                Err(e) => warn!("Ignoring invalid {}={:?}: {}", STOP_TIMEOUT_ENV, raw, e),
            }
        }

        if let Ok(raw) = std::env::var(EVENT_CAPACITY_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) => config = config.with_event_capacity(capacity),
                Err(e) => warn!("Ignoring invalid {}={:?}: {}", EVENT_CAPACITY_ENV, raw, e),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(STOP_TIMEOUT_ENV);
        std::env::remove_var(EVENT_CAPACITY_ENV);
    }

    #[test]
    fn test_config_default() {
        let config = RepositoryConfig::default();
        assert_eq!(config.stop_timeout, Duration::from_secs(5));
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_config_builder() {
        let config = RepositoryConfig::new()
            .with_stop_timeout(Duration::from_millis(250))
            .with_event_capacity(0);
        assert_eq!(config.stop_timeout, Duration::from_millis(250));
        assert_eq!(config.event_capacity, 1);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var(STOP_TIMEOUT_ENV, "1500");
        std::env::set_var(EVENT_CAPACITY_ENV, "8");

        let config = RepositoryConfig::from_env();
        assert_eq!(config.stop_timeout, Duration::from_millis(1500));
        assert_eq!(config.event_capacity, 8);
        clear_env();
    }

    #[test]
    fn test_event_capacity_is_clamped() {
        let config = RepositoryConfig::new().with_event_capacity(usize::MAX);
        assert_eq!(config.event_capacity, MAX_EVENT_CAPACITY);
    }

    #[test]
    #[serial]
    fn test_from_env_clamps_huge_capacity() {
        clear_env();
        std::env::set_var(EVENT_CAPACITY_ENV, "18446744073709551615");

        assert_eq!(RepositoryConfig::from_env().event_capacity, MAX_EVENT_CAPACITY);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        clear_env();
        std::env::set_var(STOP_TIMEOUT_ENV, "soon");

        assert_eq!(RepositoryConfig::from_env(), RepositoryConfig::default());
        clear_env();
    }
}
