//! Event topic identifiers used across transports.

/// Name of the document-level `CustomEvent` page scripts listen for.
pub const DRIVER_SELECTED_DOM_EVENT: &str = "driverSelected";

/// Machine-friendly discriminator for log fields and subscribers.
#[must_use]
pub const fn event_kind(event: &crate::payloads::UiEvent) -> &'static str {
    event.kind()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::UiEvent;

    #[test]
    fn event_kind_matches_payload() {
        assert_eq!(
            event_kind(&UiEvent::ThemeChanged {
                theme: "default".into()
            }),
            "theme_changed"
        );
        assert_eq!(
            event_kind(&UiEvent::TableCollapsed { collapsed: true }),
            "table_collapsed"
        );
    }
}
