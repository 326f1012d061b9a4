//! Searchable custom select used by the driver comparison page.
//!
//! # Design
//! - Options are fixed at bind time; only visibility changes while filtering.
//! - Filtering is a case-insensitive substring match on the option label.
//! - A pick closes the panel, clears the filter and yields a typed
//!   [`DriverSelection`] for the event bus.

use crate::core::group::GroupMember;
use crate::core::widget::{ToggleWidget, Transition};
use f1nsight_events::{DriverSelection, SelectorSlot};

/// Single entry in a select's option list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    /// Machine value (`data-value`).
    pub value: String,
    /// Visible label (trimmed text content).
    pub label: String,
}

impl SelectOption {
    /// Build an option, trimming surrounding whitespace from the label.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl AsRef<str>) -> Self {
        Self {
            value: value.into(),
            label: label.as_ref().trim().to_string(),
        }
    }
}

/// Class carried by the select container while open.
pub const SELECT_OPEN_CLASS: &str = "open";
/// Class carried by the picked option.
pub const OPTION_SELECTED_CLASS: &str = "selected";

/// Searchable select bound to one comparison slot.
pub struct SearchSelect {
    widget: ToggleWidget,
    slot: SelectorSlot,
    options: Vec<SelectOption>,
    filter: String,
}

impl SearchSelect {
    /// Closed select with no active filter.
    #[must_use]
    pub fn new(slot: SelectorSlot, options: Vec<SelectOption>) -> Self {
        Self {
            widget: ToggleWidget::new(),
            slot,
            options,
            filter: String::new(),
        }
    }

    /// Slot this select feeds.
    #[must_use]
    pub const fn slot(&self) -> SelectorSlot {
        self.slot
    }

    /// All options in document order.
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Current filter text as typed.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Replace the live filter.
    pub fn set_filter(&mut self, text: &str) {
        text.clone_into(&mut self.filter);
    }

    /// Whether an option passes the live filter.
    #[must_use]
    pub fn matches(&self, option: &SelectOption) -> bool {
        if self.filter.is_empty() {
            return true;
        }
        option
            .label
            .to_lowercase()
            .contains(&self.filter.to_lowercase())
    }

    /// Options that pass the live filter.
    #[must_use]
    pub fn visible_options(&self) -> Vec<&SelectOption> {
        self.options.iter().filter(|o| self.matches(o)).collect()
    }

    /// Whether the option with `value` passes the live filter.
    #[must_use]
    pub fn is_visible(&self, value: &str) -> bool {
        self.options
            .iter()
            .find(|o| o.value == value)
            .is_some_and(|o| self.matches(o))
    }

    /// Per-option visibility flags in document order.
    #[must_use]
    pub fn visibility(&self) -> Vec<bool> {
        self.options.iter().map(|o| self.matches(o)).collect()
    }

    /// Value currently picked, if any.
    #[must_use]
    pub fn selected_value(&self) -> Option<&str> {
        self.widget.state().selected_value.as_deref()
    }

    /// Label of the picked option for the header text.
    #[must_use]
    pub fn selected_label(&self) -> Option<&str> {
        let value = self.selected_value()?;
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    /// Pick an option by value.
    ///
    /// Returns `None` and leaves state untouched for unknown values.
    pub fn select(&mut self, value: &str) -> Option<DriverSelection> {
        if !self.options.iter().any(|o| o.value == value) {
            tracing::debug!(value, "ignoring pick of unknown option");
            return None;
        }
        self.widget.set_selected(Some(value.to_string()));
        let _ = self.widget.close();
        self.filter.clear();
        Some(DriverSelection {
            driver: value.to_string(),
            selector: self.slot,
        })
    }

    /// Whether the option list is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.widget.is_open()
    }

    /// Header click outside a group.
    pub fn toggle(&mut self) -> Transition {
        self.widget.toggle()
    }
}

impl GroupMember for SearchSelect {
    fn widget(&self) -> &ToggleWidget {
        &self.widget
    }

    fn widget_mut(&mut self) -> &mut ToggleWidget {
        &mut self.widget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::group::ExclusiveGroup;

    fn drivers() -> Vec<SelectOption> {
        vec![
            SelectOption::new("hamilton", "  Lewis Hamilton "),
            SelectOption::new("verstappen", "Max Verstappen"),
            SelectOption::new("leclerc", "Charles Leclerc"),
        ]
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut select = SearchSelect::new(SelectorSlot::First, drivers());
        select.set_filter("LE");
        let options = select.visible_options();
        let visible = options
            .iter()
            .map(|o| o.value.as_str())
            .collect::<Vec<_>>();
        assert_eq!(visible, vec!["leclerc"]);
        assert_eq!(select.visibility(), vec![false, false, true]);
        assert!(select.is_visible("leclerc"));
        assert!(!select.is_visible("hamilton"));
        assert!(!select.is_visible("senna"));

        select.set_filter("ham");
        assert_eq!(select.visibility(), vec![true, false, false]);
    }

    #[test]
    fn selecting_emits_slot_payload_and_resets_filter() {
        let mut select = SearchSelect::new(SelectorSlot::First, drivers());
        let _ = select.toggle();
        select.set_filter("xyz");
        assert_eq!(select.visibility(), vec![false, false, false]);

        let picked = select.select("hamilton");
        assert_eq!(
            picked,
            Some(DriverSelection {
                driver: "hamilton".into(),
                selector: SelectorSlot::First,
            })
        );
        assert!(!select.is_open());
        assert_eq!(select.filter(), "");
        assert_eq!(select.visibility(), vec![true, true, true]);
        assert_eq!(select.selected_label(), Some("Lewis Hamilton"));
    }

    #[test]
    fn unknown_value_is_ignored() {
        let mut select = SearchSelect::new(SelectorSlot::Second, drivers());
        assert_eq!(select.slot(), SelectorSlot::Second);
        assert_eq!(select.options().len(), 3);
        assert_eq!(select.options()[0].label, "Lewis Hamilton");
        let _ = select.toggle();
        assert_eq!(select.select("senna"), None);
        assert!(select.is_open());
        assert_eq!(select.selected_value(), None);
    }

    #[test]
    fn selects_share_an_exclusive_group() {
        let mut group = ExclusiveGroup::new(vec![
            SearchSelect::new(SelectorSlot::First, drivers()),
            SearchSelect::new(SelectorSlot::Second, drivers()),
        ]);
        let _ = group.toggle(0);
        let _ = group.toggle(1);
        assert_eq!(group.open_index(), Some(1));
        assert!(group.get(0).is_some_and(|s| !s.is_open()));
        let picked = group.get_mut(1).and_then(|s| s.select("leclerc"));
        assert_eq!(picked.map(|p| p.selector), Some(SelectorSlot::Second));
        assert_eq!(group.open_index(), None);
    }
}
