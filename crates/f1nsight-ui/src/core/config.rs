//! Dashboard configuration with defaults and embedded JSON overrides.
//!
//! # Design
//! - Every field has a default so pages without a config block behave like
//!   the stock dashboard.
//! - Overrides come from a JSON document rendered into the page; unknown
//!   fields are rejected to surface typos early.

use crate::core::breakpoints::MOBILE_MAX_WIDTH;
use crate::core::notifications::{
    DEFAULT_BADGE, DEFAULT_ICON, DEFAULT_TAG, NotificationDefaults,
};
use f1nsight_events::DEFAULT_REPLAY_CAPACITY;
use serde::Deserialize;
use thiserror::Error;

/// Element id of the optional `<script type="application/json">` config block.
pub const CONFIG_ELEMENT_ID: &str = "f1nsight-config";

/// Default tracing filter when the page does not provide one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Delay before the "notifications enabled" confirmation, in milliseconds.
pub const DEFAULT_CONFIRMATION_DELAY_MS: u32 = 500;

/// Largest accepted replay ring size for the UI event bus.
pub const MAX_REPLAY_CAPACITY: usize = 4096;

/// Error raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The config block was not valid JSON for [`DashboardConfig`].
    #[error("invalid dashboard config document")]
    InvalidDocument {
        /// Parser detail.
        detail: String,
    },
    /// A field held an unusable value.
    #[error("invalid dashboard config field")]
    InvalidField {
        /// Dotted field path.
        field: &'static str,
        /// Machine-readable reason.
        reason: &'static str,
    },
}

/// Notification defaults and timing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationSettings {
    /// Fallback icon URL.
    pub icon: String,
    /// Fallback badge URL.
    pub badge: String,
    /// Fallback tag.
    pub tag: String,
    /// Delay before the confirmation notification.
    pub confirmation_delay_ms: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            icon: DEFAULT_ICON.to_string(),
            badge: DEFAULT_BADGE.to_string(),
            tag: DEFAULT_TAG.to_string(),
            confirmation_delay_ms: DEFAULT_CONFIRMATION_DELAY_MS,
        }
    }
}

/// Page-level settings for all widgets.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Widest viewport treated as mobile.
    pub mobile_max_width: u32,
    /// Tracing filter directive (`EnvFilter` syntax).
    pub log_level: String,
    /// Replay ring size for the UI event bus.
    pub replay_capacity: usize,
    /// Notification defaults.
    pub notifications: NotificationSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            mobile_max_width: MOBILE_MAX_WIDTH,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            replay_capacity: DEFAULT_REPLAY_CAPACITY,
            notifications: NotificationSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a JSON override document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDocument`] for malformed JSON or unknown
    /// fields and [`ConfigError::InvalidField`] for unusable values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|err| ConfigError::InvalidDocument {
                detail: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse an optional document, falling back to defaults on any error.
    #[must_use]
    pub fn from_json_or_default(text: Option<&str>) -> Self {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return Self::default();
        };
        match Self::from_json(text) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, detail = ?err, "ignoring dashboard config");
                Self::default()
            }
        }
    }

    /// Check value constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] for the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mobile_max_width == 0 {
            return Err(ConfigError::InvalidField {
                field: "mobile_max_width",
                reason: "must be positive",
            });
        }
        if self.replay_capacity > MAX_REPLAY_CAPACITY {
            return Err(ConfigError::InvalidField {
                field: "replay_capacity",
                reason: "must be at most 4096",
            });
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "log_level",
                reason: "must not be empty",
            });
        }
        if self.notifications.tag.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "notifications.tag",
                reason: "must not be empty",
            });
        }
        Ok(())
    }

    /// Fallbacks for [`crate::core::notifications::NotificationRequest::resolve`].
    #[must_use]
    pub fn notification_defaults(&self) -> NotificationDefaults {
        NotificationDefaults {
            icon: self.notifications.icon.clone(),
            badge: self.notifications.badge.clone(),
            tag: self.notifications.tag.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_dashboard() {
        let config = DashboardConfig::default();
        assert_eq!(config.mobile_max_width, 600);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.notifications.confirmation_delay_ms, 500);
        assert_eq!(config.notification_defaults(), NotificationDefaults::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = DashboardConfig::from_json(
            r#"{ "log_level": "debug", "notifications": { "tag": "race-alerts" } }"#,
        )
        .expect("valid config");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.notifications.tag, "race-alerts");
        assert_eq!(config.notifications.icon, DEFAULT_ICON);
        assert_eq!(config.mobile_max_width, MOBILE_MAX_WIDTH);
    }

    #[test]
    fn unknown_fields_and_bad_values_are_rejected() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{ "breakpoint": 700 }"#),
            Err(ConfigError::InvalidDocument { .. })
        ));
        assert_eq!(
            DashboardConfig::from_json(r#"{ "mobile_max_width": 0 }"#),
            Err(ConfigError::InvalidField {
                field: "mobile_max_width",
                reason: "must be positive",
            })
        );
    }

    #[test]
    fn oversized_replay_capacity_is_rejected() {
        let huge = r#"{ "replay_capacity": 18446744073709551615 }"#;
        assert_eq!(
            DashboardConfig::from_json(huge),
            Err(ConfigError::InvalidField {
                field: "replay_capacity",
                reason: "must be at most 4096",
            })
        );
        assert_eq!(
            DashboardConfig::from_json_or_default(Some(huge)),
            DashboardConfig::default()
        );
        let at_limit = DashboardConfig::from_json(r#"{ "replay_capacity": 4096 }"#)
            .expect("limit is accepted");
        assert_eq!(at_limit.replay_capacity, MAX_REPLAY_CAPACITY);
    }

    #[test]
    fn fallback_swallows_errors() {
        assert_eq!(
            DashboardConfig::from_json_or_default(Some("not json")),
            DashboardConfig::default()
        );
        assert_eq!(
            DashboardConfig::from_json_or_default(Some("   ")),
            DashboardConfig::default()
        );
        assert_eq!(
            DashboardConfig::from_json_or_default(None),
            DashboardConfig::default()
        );
    }
}
