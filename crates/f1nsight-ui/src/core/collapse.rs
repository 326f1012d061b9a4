//! Collapsible standings table card.

use crate::core::preferences::{PreferenceStore, TABLE_COLLAPSED_KEY};
use crate::core::widget::{ToggleWidget, Transition};
use std::rc::Rc;

/// Class applied to the table while collapsed.
pub const TABLE_COLLAPSED_CLASS: &str = "collapsed";

/// Table collapse toggle persisted under `tableCollapsed`.
///
/// The underlying widget's "open" state means "collapsed".
pub struct TableCollapse {
    widget: ToggleWidget,
}

impl TableCollapse {
    /// Restore the collapse state from the store.
    #[must_use]
    pub fn restore(store: Rc<dyn PreferenceStore>) -> Self {
        Self {
            widget: ToggleWidget::persisted(TABLE_COLLAPSED_KEY, store),
        }
    }

    /// Collapse button click.
    pub fn toggle(&mut self) -> Transition {
        self.widget.toggle()
    }

    /// Whether the table is collapsed.
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.widget.is_open()
    }

    /// Material Symbols ligature for the toggle button.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        if self.is_collapsed() {
            "expand_more"
        } else {
            "expand_less"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::MemoryStore;

    #[test]
    fn toggle_persists_and_swaps_icon() {
        let store = MemoryStore::new();
        let mut table = TableCollapse::restore(Rc::new(store.clone()));
        assert_eq!(table.icon(), "expand_less");

        let _ = table.toggle();
        assert!(table.is_collapsed());
        assert_eq!(table.icon(), "expand_more");
        assert_eq!(store.peek(TABLE_COLLAPSED_KEY).as_deref(), Some("true"));

        let _ = table.toggle();
        assert_eq!(store.peek(TABLE_COLLAPSED_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn restores_collapsed_table() {
        let store = MemoryStore::with_entries([(TABLE_COLLAPSED_KEY, "true")]);
        let table = TableCollapse::restore(Rc::new(store));
        assert!(table.is_collapsed());
        assert_eq!(table.icon(), "expand_more");
    }
}
