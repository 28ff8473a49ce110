use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Tracker Configuration
// ============================================================================
//
// Built by the caller and passed in; nothing here is global. Every field
// has a default so a partial JSON document is enough.
//
// ============================================================================

/// Which attempts reach subscribers besides real state changes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Broadcast refused operations as `accepted = false` events
    pub broadcast_rejections: bool,
    /// Broadcast operations that found the order already where they lead
    pub rebroadcast_noops: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            broadcast_rejections: true,
            rebroadcast_noops: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// ETA quoted to customers when the dish has no cooking time
    pub fallback_eta_minutes: u32,
    /// Number printed on cancellation messages
    pub support_phone: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            fallback_eta_minutes: 10,
            support_phone: "(555) 123-4567".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub tracking: TrackingConfig,
    pub notifications: NotificationConfig,
}

impl TrackerConfig {
    /// Every attempt is broadcast, including refusals and no-ops
    pub fn verbose() -> Self {
        Self {
            tracking: TrackingConfig {
                broadcast_rejections: true,
                rebroadcast_noops: true,
            },
            ..Self::default()
        }
    }

    /// Only real state changes are broadcast
    pub fn quiet() -> Self {
        Self {
            tracking: TrackingConfig {
                broadcast_rejections: false,
                rebroadcast_noops: false,
            },
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid tracker configuration")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Load from the file named by `var`, or fall back to defaults when the
    /// variable is unset
    pub fn from_env_path(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert!(config.tracking.broadcast_rejections);
        assert!(!config.tracking.rebroadcast_noops);
        assert_eq!(config.notifications.fallback_eta_minutes, 10);
    }

    #[test]
    fn test_quiet_preset() {
        let config = TrackerConfig::quiet();
        assert!(!config.tracking.broadcast_rejections);
        assert!(!config.tracking.rebroadcast_noops);
        assert_eq!(config.notifications, NotificationConfig::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"tracking": {"rebroadcast_noops": true}}"#;
        let config = TrackerConfig::from_json_str(json).unwrap();

        assert!(config.tracking.rebroadcast_noops);
        assert!(config.tracking.broadcast_rejections);
        assert_eq!(config.notifications, NotificationConfig::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = TrackerConfig::from_json_str(r#"{"tracking": {"rebroadcast_noops": "yes"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = TrackerConfig::from_file("/definitely/not/here.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_unset_env_var_gives_defaults() {
        let config = TrackerConfig::from_env_path("ORDER_TRACKING_TEST_UNSET_VARIABLE").unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn test_verbose_preset() {
        let config = TrackerConfig::verbose();
        assert!(config.tracking.broadcast_rejections);
        assert!(config.tracking.rebroadcast_noops);
    }
}
