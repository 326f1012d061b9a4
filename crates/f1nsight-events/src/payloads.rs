//! Event payload definitions shared by widgets and coordinators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Identifier assigned to each event emitted on the bus.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
pub const DEFAULT_REPLAY_CAPACITY: usize = 64;

/// Ordinal position of a driver selector on the comparison page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SelectorSlot {
    /// Left-hand selector (`selector: 1`).
    First,
    /// Right-hand selector (`selector: 2`).
    Second,
}

impl SelectorSlot {
    /// Map a zero-based position in document order onto a slot.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            _ => None,
        }
    }

    /// One-based ordinal used in event payloads.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }

    /// Zero-based index for slot-addressed storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

impl From<SelectorSlot> for u8 {
    fn from(slot: SelectorSlot) -> Self {
        slot.ordinal()
    }
}

impl TryFrom<u8> for SelectorSlot {
    type Error = SelectorSlotError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(SelectorSlotError { value: other }),
        }
    }
}

/// Error returned when a selector ordinal is outside `1..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorSlotError {
    /// Offending ordinal.
    pub value: u8,
}

impl Display for SelectorSlotError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "selector ordinal {} out of range", self.value)
    }
}

impl std::error::Error for SelectorSlotError {}

/// Payload of a driver pick in one of the comparison selectors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriverSelection {
    /// Driver identifier taken from the option's `data-value`.
    pub driver: String,
    /// Selector that produced the pick.
    pub selector: SelectorSlot,
}

/// Typed events surfaced across the dashboard widgets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// A driver option was picked in a search select.
    DriverSelected(DriverSelection),
    /// Both comparison selectors hold a driver.
    ComparisonReady {
        /// Driver in the first selector.
        driver1: String,
        /// Driver in the second selector.
        driver2: String,
    },
    /// The active colour theme changed.
    ThemeChanged {
        /// Theme identifier (`default`, `ferrari`, `mclaren`).
        theme: String,
    },
    /// The sidebar collapsed or expanded.
    SidebarToggled {
        /// Desktop collapse state after the change.
        collapsed: bool,
        /// Whether the mobile overlay is visible after the change.
        mobile_visible: bool,
    },
    /// The standings table was collapsed or expanded.
    TableCollapsed {
        /// Collapse state after the change.
        collapsed: bool,
    },
    /// A notification permission request resolved.
    NotificationPermissionChanged {
        /// Resolved permission (`granted`, `denied`, `default`).
        permission: String,
    },
}

impl UiEvent {
    /// Machine-friendly discriminator for logs and subscribers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DriverSelected(_) => "driver_selected",
            Self::ComparisonReady { .. } => "comparison_ready",
            Self::ThemeChanged { .. } => "theme_changed",
            Self::SidebarToggled { .. } => "sidebar_toggled",
            Self::TableCollapsed { .. } => "table_collapsed",
            Self::NotificationPermissionChanged { .. } => "notification_permission_changed",
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and emission timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Monotonic identifier assigned to the wrapped event.
    pub id: EventId,
    /// Timestamp recording when the envelope was produced.
    pub timestamp: DateTime<Utc>,
    /// Wrapped event payload.
    pub event: UiEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_selection_serializes_with_numeric_selector() {
        let selection = DriverSelection {
            driver: "hamilton".into(),
            selector: SelectorSlot::First,
        };
        let json = serde_json::to_value(&selection).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "driver": "hamilton", "selector": 1 })
        );
    }

    #[test]
    fn selector_slot_rejects_out_of_range_ordinals() {
        let parsed: Result<DriverSelection, _> =
            serde_json::from_str(r#"{"driver":"norris","selector":3}"#);
        assert!(parsed.is_err());
        assert_eq!(SelectorSlot::try_from(2_u8), Ok(SelectorSlot::Second));
        assert_eq!(
            SelectorSlot::try_from(0_u8).unwrap_err().to_string(),
            "selector ordinal 0 out of range"
        );
    }

    #[test]
    fn selector_slot_maps_document_positions() {
        assert_eq!(SelectorSlot::from_index(0), Some(SelectorSlot::First));
        assert_eq!(SelectorSlot::from_index(1), Some(SelectorSlot::Second));
        assert_eq!(SelectorSlot::from_index(2), None);
        assert_eq!(SelectorSlot::Second.index(), 1);
    }

    #[test]
    fn event_kind_covers_every_variant() {
        assert_event_kind(
            &UiEvent::DriverSelected(DriverSelection {
                driver: "leclerc".into(),
                selector: SelectorSlot::Second,
            }),
            "driver_selected",
        );
        assert_event_kind(
            &UiEvent::ComparisonReady {
                driver1: "a".into(),
                driver2: "b".into(),
            },
            "comparison_ready",
        );
        assert_event_kind(
            &UiEvent::ThemeChanged {
                theme: "ferrari".into(),
            },
            "theme_changed",
        );
        assert_event_kind(
            &UiEvent::SidebarToggled {
                collapsed: true,
                mobile_visible: false,
            },
            "sidebar_toggled",
        );
        assert_event_kind(
            &UiEvent::TableCollapsed { collapsed: false },
            "table_collapsed",
        );
        assert_event_kind(
            &UiEvent::NotificationPermissionChanged {
                permission: "granted".into(),
            },
            "notification_permission_changed",
        );
    }

    #[test]
    fn tagged_event_uses_snake_case_type() {
        let json = serde_json::to_value(UiEvent::ThemeChanged {
            theme: "mclaren".into(),
        })
        .expect("serialize");
        assert_eq!(json["type"], "theme_changed");
        assert_eq!(json["theme"], "mclaren");
    }

    fn assert_event_kind(event: &UiEvent, expected: &str) {
        assert_eq!(event.kind(), expected);
    }
}
