//! Generic open/closed widget state machine shared by dropdowns, panels and selects.
//!
//! # Design
//! - The state machine owns no DOM references; callers classify pointer
//!   targets into a [`Hit`] and apply the returned [`Transition`].
//! - Persistence is opt-in: a storage key makes every state change write
//!   through to the [`PreferenceStore`].
//! - `open`/`close` report [`Transition::Unchanged`] when already in the
//!   target state so callers can skip DOM work and redundant writes.

use crate::core::preferences::{PreferenceStore, load_flag, persist_flag};
use std::rc::Rc;

/// Per-widget state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WidgetState {
    /// Whether the panel is currently shown.
    pub is_open: bool,
    /// Value picked in selection variants.
    pub selected_value: Option<String>,
}

/// Where a pointer interaction landed relative to a widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// Inside the trigger element.
    Trigger,
    /// Inside the panel element.
    Panel,
    /// Anywhere else in the document.
    Outside,
}

impl Hit {
    /// Classify a target from two containment checks, trigger first.
    #[must_use]
    pub const fn classify(in_trigger: bool, in_panel: bool) -> Self {
        if in_trigger {
            Self::Trigger
        } else if in_panel {
            Self::Panel
        } else {
            Self::Outside
        }
    }
}

/// Result of a state-machine operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The widget moved from closed to open.
    Opened,
    /// The widget moved from open to closed.
    Closed,
    /// No state change happened.
    Unchanged,
}

impl Transition {
    /// Whether the DOM needs to be refreshed.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

struct Persistence {
    key: &'static str,
    store: Rc<dyn PreferenceStore>,
}

/// Open/closed toggle with optional persisted state.
pub struct ToggleWidget {
    state: WidgetState,
    persistence: Option<Persistence>,
}

impl ToggleWidget {
    /// Volatile widget that always starts closed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: WidgetState::default(),
            persistence: None,
        }
    }

    /// Widget whose open state is restored from and written to `key`.
    ///
    /// A missing key or an unavailable store leaves the widget closed.
    #[must_use]
    pub fn persisted(key: &'static str, store: Rc<dyn PreferenceStore>) -> Self {
        let is_open = load_flag(store.as_ref(), key);
        tracing::debug!(key, is_open, "restored widget state");
        Self {
            state: WidgetState {
                is_open,
                selected_value: None,
            },
            persistence: Some(Persistence { key, store }),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub const fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Whether the panel is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Storage key backing this widget, if persisted.
    #[must_use]
    pub fn storage_key(&self) -> Option<&'static str> {
        self.persistence.as_ref().map(|p| p.key)
    }

    /// Flip the open state.
    pub fn toggle(&mut self) -> Transition {
        if self.state.is_open {
            self.set_open(false)
        } else {
            self.set_open(true)
        }
    }

    /// Open the widget; no-op when already open.
    pub fn open(&mut self) -> Transition {
        if self.state.is_open {
            return Transition::Unchanged;
        }
        self.set_open(true)
    }

    /// Close the widget; no-op when already closed.
    pub fn close(&mut self) -> Transition {
        if !self.state.is_open {
            return Transition::Unchanged;
        }
        self.set_open(false)
    }

    /// Close when the interaction landed outside both trigger and panel.
    pub fn on_outside_interaction(&mut self, hit: Hit) -> Transition {
        match hit {
            Hit::Outside => self.close(),
            Hit::Trigger | Hit::Panel => Transition::Unchanged,
        }
    }

    /// Record a picked value without touching the open state.
    pub fn set_selected(&mut self, value: Option<String>) {
        self.state.selected_value = value;
    }

    /// Panel projection for the DOM layer.
    #[must_use]
    pub const fn view(&self) -> WidgetView {
        WidgetView {
            open: self.state.is_open,
            arrow_transform: if self.state.is_open {
                "rotate(180deg)"
            } else {
                "rotate(0deg)"
            },
        }
    }

    fn set_open(&mut self, open: bool) -> Transition {
        self.state.is_open = open;
        if let Some(persistence) = &self.persistence {
            persist_flag(persistence.store.as_ref(), persistence.key, open);
        }
        if open {
            Transition::Opened
        } else {
            Transition::Closed
        }
    }
}

/// DOM-facing projection of a [`ToggleWidget`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetView {
    /// Whether the panel's open class is present.
    pub open: bool,
    /// CSS `transform` for an arrow icon next to the trigger.
    pub arrow_transform: &'static str,
}

impl Default for ToggleWidget {
    fn default() -> Self {
        Self::new()
    }
}

/// Dropdown with a rotating arrow icon, closed by outside clicks.
pub struct Dropdown {
    widget: ToggleWidget,
}

/// Class added to the panel while a dropdown is shown.
pub const DROPDOWN_SHOW_CLASS: &str = "show";
/// Class added to every dropdown panel for the open/close animation.
pub const DROPDOWN_ANIMATE_CLASS: &str = "dropdown-animate";

impl Dropdown {
    /// Closed dropdown.
    #[must_use]
    pub fn new() -> Self {
        Self {
            widget: ToggleWidget::new(),
        }
    }

    /// Trigger click.
    pub fn toggle(&mut self) -> Transition {
        self.widget.toggle()
    }

    /// Document click routed through containment checks.
    pub fn on_outside_interaction(&mut self, hit: Hit) -> Transition {
        self.widget.on_outside_interaction(hit)
    }

    /// Whether the panel carries the `show` class.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.widget.is_open()
    }

    /// CSS `transform` for the optional arrow icon.
    #[must_use]
    pub const fn arrow_transform(&self) -> &'static str {
        self.widget.view().arrow_transform
    }
}

impl Default for Dropdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::{MemoryStore, TABLE_COLLAPSED_KEY};

    fn store() -> (MemoryStore, Rc<dyn PreferenceStore>) {
        let store = MemoryStore::new();
        let shared: Rc<dyn PreferenceStore> = Rc::new(store.clone());
        (store, shared)
    }

    #[test]
    fn double_toggle_restores_state() {
        let mut widget = ToggleWidget::new();
        assert_eq!(widget.toggle(), Transition::Opened);
        assert_eq!(widget.toggle(), Transition::Closed);
        assert!(!widget.is_open());
    }

    #[test]
    fn explicit_transitions_are_noops_in_target_state() {
        let mut widget = ToggleWidget::new();
        assert_eq!(widget.close(), Transition::Unchanged);
        assert_eq!(widget.open(), Transition::Opened);
        assert_eq!(widget.open(), Transition::Unchanged);
        assert!(widget.is_open());
    }

    #[test]
    fn outside_interaction_only_closes_for_outside_hits() {
        let mut widget = ToggleWidget::new();
        let _ = widget.open();
        assert_eq!(widget.on_outside_interaction(Hit::Trigger), Transition::Unchanged);
        assert_eq!(widget.on_outside_interaction(Hit::Panel), Transition::Unchanged);
        assert!(widget.is_open());
        assert_eq!(widget.on_outside_interaction(Hit::Outside), Transition::Closed);
        assert_eq!(widget.on_outside_interaction(Hit::Outside), Transition::Unchanged);
    }

    #[test]
    fn hit_classification_prefers_trigger() {
        assert_eq!(Hit::classify(true, true), Hit::Trigger);
        assert_eq!(Hit::classify(false, true), Hit::Panel);
        assert_eq!(Hit::classify(false, false), Hit::Outside);
    }

    #[test]
    fn persisted_state_tracks_every_change_and_restores() {
        let (raw, shared) = store();
        let mut widget = ToggleWidget::persisted(TABLE_COLLAPSED_KEY, Rc::clone(&shared));
        assert!(!widget.is_open());
        assert_eq!(widget.storage_key(), Some(TABLE_COLLAPSED_KEY));

        let _ = widget.toggle();
        assert_eq!(raw.peek(TABLE_COLLAPSED_KEY).as_deref(), Some("true"));

        let restored = ToggleWidget::persisted(TABLE_COLLAPSED_KEY, shared);
        assert!(restored.is_open());
    }

    #[test]
    fn noop_close_does_not_write() {
        let (raw, shared) = store();
        let mut widget = ToggleWidget::persisted(TABLE_COLLAPSED_KEY, shared);
        assert_eq!(widget.close(), Transition::Unchanged);
        assert_eq!(raw.peek(TABLE_COLLAPSED_KEY), None);
    }

    #[test]
    fn unavailable_store_starts_closed_and_still_toggles() {
        let shared: Rc<dyn PreferenceStore> = Rc::new(MemoryStore::unavailable());
        let mut widget = ToggleWidget::persisted(TABLE_COLLAPSED_KEY, shared);
        assert!(!widget.is_open());
        assert_eq!(widget.toggle(), Transition::Opened);
    }

    #[test]
    fn view_tracks_open_state() {
        let mut widget = ToggleWidget::new();
        assert_eq!(
            widget.view(),
            WidgetView {
                open: false,
                arrow_transform: "rotate(0deg)",
            }
        );
        let _ = widget.open();
        assert!(widget.view().open);
        assert_eq!(widget.view().arrow_transform, "rotate(180deg)");
    }

    #[test]
    fn dropdown_arrow_follows_state() {
        let mut dropdown = Dropdown::new();
        assert_eq!(dropdown.arrow_transform(), "rotate(0deg)");
        let _ = dropdown.toggle();
        assert_eq!(dropdown.arrow_transform(), "rotate(180deg)");
        let _ = dropdown.on_outside_interaction(Hit::Outside);
        assert!(!dropdown.is_open());
        assert_eq!(dropdown.arrow_transform(), "rotate(0deg)");
    }
}
