//! Agent configuration from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;

use crate::state::QueueSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub flush_interval_secs: u64,
    pub retention_secs: i64,
    pub min_confidence: f64,
    /// Hard cap on queued detections; unbounded when unset
    pub max_queue_len: Option<usize>,
    /// Drones silent for longer than this are dropped from tracking
    pub drone_stale_secs: i64,
    pub event_channel_capacity: usize,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flush_interval_secs: 30,
            retention_secs: 3600,
            min_confidence: 0.7,
            max_queue_len: None,
            drone_stale_secs: 300,
            event_channel_capacity: 256,
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            flush_interval_secs: parse_env("SAR_FLUSH_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.flush_interval_secs),
            retention_secs: parse_env("SAR_RETENTION_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.retention_secs),
            min_confidence: parse_env("SAR_MIN_CONFIDENCE").unwrap_or(defaults.min_confidence),
            max_queue_len: parse_env("SAR_MAX_QUEUE_LEN").filter(|len| *len > 0),
            drone_stale_secs: parse_env("SAR_DRONE_STALE_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.drone_stale_secs),
            event_channel_capacity: parse_env("SAR_EVENT_CHANNEL_CAPACITY")
                .unwrap_or(defaults.event_channel_capacity),
            log_json: env::var("SAR_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs.max(1))
    }

    pub fn drone_stale_after(&self) -> TimeDelta {
        positive_secs(self.drone_stale_secs, Self::default().drone_stale_secs)
    }

    pub fn queue_settings(&self) -> QueueSettings {
        QueueSettings {
            min_confidence: self.min_confidence,
            retention: positive_secs(self.retention_secs, Self::default().retention_secs),
            max_len: self.max_queue_len,
        }
    }
}

/// Non-positive values fall back to `default`; values past chrono's range
/// saturate.
fn positive_secs(secs: i64, default: i64) -> TimeDelta {
    let secs = if secs > 0 { secs } else { default };
    TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX)
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_queue_defaults() {
        let settings = Config::default().queue_settings();
        let expected = QueueSettings::default();
        assert_eq!(settings.min_confidence, expected.min_confidence);
        assert_eq!(settings.retention, expected.retention);
        assert_eq!(settings.max_len, None);
        assert_eq!(Config::default().flush_interval(), Duration::from_secs(30));
    }

    #[test]
    fn oversized_durations_saturate() {
        let config = Config {
            retention_secs: i64::MAX,
            drone_stale_secs: i64::MAX,
            ..Config::default()
        };
        assert_eq!(config.queue_settings().retention, TimeDelta::MAX);
        assert_eq!(config.drone_stale_after(), TimeDelta::MAX);
    }

    #[test]
    fn non_positive_durations_use_defaults() {
        let config = Config {
            retention_secs: -5,
            drone_stale_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.queue_settings().retention, TimeDelta::seconds(3600));
        assert_eq!(config.drone_stale_after(), TimeDelta::seconds(300));
    }
}
