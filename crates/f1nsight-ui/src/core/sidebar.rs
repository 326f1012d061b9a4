//! Responsive sidebar state.
//!
//! # Design
//! - Desktop collapse state is persisted under `sidebarCollapsed`.
//! - The mobile overlay is volatile: it starts hidden on every load and is
//!   closed whenever the viewport crosses the breakpoint.
//! - While the overlay is visible the page body is scroll-locked.

use crate::core::breakpoints::{MOBILE_MAX_WIDTH, ViewportMode};
use crate::core::preferences::{PreferenceStore, SIDEBAR_COLLAPSED_KEY};
use crate::core::widget::{Hit, ToggleWidget, Transition};
use std::rc::Rc;

/// Class on the sidebar container while collapsed.
pub const SIDEBAR_COLLAPSED_CLASS: &str = "collapsed";
/// Class on `<body>` while the sidebar is collapsed.
pub const BODY_COLLAPSED_CLASS: &str = "sidebar-collapsed";
/// Class on the sidebar container while the mobile overlay is shown.
pub const MOBILE_VISIBLE_CLASS: &str = "mobile-visible";

/// DOM-facing projection of the sidebar state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SidebarView {
    /// `collapsed` on the container.
    pub container_collapsed: bool,
    /// `sidebar-collapsed` on the body.
    pub body_collapsed: bool,
    /// `mobile-visible` on the container.
    pub mobile_visible: bool,
    /// Whether body scrolling must be disabled.
    pub scroll_locked: bool,
}

impl SidebarView {
    /// Scroll lock transition from `previous` to this view.
    ///
    /// `Some(true)` takes the lock, `Some(false)` releases it and `None`
    /// leaves body scrolling alone. The first paint (`previous == None`)
    /// only takes the lock; it never clears a style the page set itself.
    #[must_use]
    pub const fn scroll_lock_change(&self, previous: Option<&Self>) -> Option<bool> {
        match previous {
            Some(previous) if previous.scroll_locked == self.scroll_locked => None,
            Some(_) => Some(self.scroll_locked),
            None if self.scroll_locked => Some(true),
            None => None,
        }
    }
}

/// Sidebar manager with separate desktop and mobile state.
pub struct Sidebar {
    desktop: ToggleWidget,
    mobile: ToggleWidget,
    mode: ViewportMode,
    mobile_max_width: u32,
}

impl Sidebar {
    /// Restore the persisted desktop state for the current viewport width.
    #[must_use]
    pub fn restore(store: Rc<dyn PreferenceStore>, width: u32) -> Self {
        Self::restore_with_breakpoint(store, width, MOBILE_MAX_WIDTH)
    }

    /// Same as [`Sidebar::restore`] with a custom breakpoint.
    #[must_use]
    pub fn restore_with_breakpoint(
        store: Rc<dyn PreferenceStore>,
        width: u32,
        mobile_max_width: u32,
    ) -> Self {
        let mode = ViewportMode::for_width_with(width, mobile_max_width);
        Self {
            desktop: ToggleWidget::persisted(SIDEBAR_COLLAPSED_KEY, store),
            mobile: ToggleWidget::new(),
            mode,
            mobile_max_width,
        }
    }

    /// Current viewport mode.
    #[must_use]
    pub const fn mode(&self) -> ViewportMode {
        self.mode
    }

    /// Persisted desktop collapse state.
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.desktop.is_open()
    }

    /// Whether the mobile overlay is visible.
    #[must_use]
    pub const fn is_mobile_visible(&self) -> bool {
        self.mobile.is_open()
    }

    /// Toggle button click; acts on the state owned by the current mode.
    pub fn toggle(&mut self) -> Transition {
        let transition = match self.mode {
            ViewportMode::Desktop => self.desktop.toggle(),
            ViewportMode::Mobile => self.mobile.toggle(),
        };
        tracing::debug!(
            mode = self.mode.as_str(),
            collapsed = self.is_collapsed(),
            mobile_visible = self.is_mobile_visible(),
            "sidebar toggled"
        );
        transition
    }

    /// Window resize.
    ///
    /// Returns `true` when the viewport crossed the breakpoint. Crossing
    /// always hides the mobile overlay; the desktop state is left as
    /// persisted.
    pub fn on_resize(&mut self, width: u32) -> bool {
        let mode = ViewportMode::for_width_with(width, self.mobile_max_width);
        if mode == self.mode {
            return false;
        }
        tracing::debug!(from = self.mode.as_str(), to = mode.as_str(), "viewport mode changed");
        self.mode = mode;
        let _ = self.mobile.close();
        true
    }

    /// Document click; only the mobile overlay reacts.
    pub fn on_outside_interaction(&mut self, hit: Hit) -> Transition {
        match self.mode {
            ViewportMode::Mobile => self.mobile.on_outside_interaction(hit),
            ViewportMode::Desktop => Transition::Unchanged,
        }
    }

    /// Classes and side effects to apply to the DOM.
    #[must_use]
    pub const fn view(&self) -> SidebarView {
        let mobile_visible = self.mobile.is_open();
        SidebarView {
            container_collapsed: self.desktop.is_open(),
            body_collapsed: self.desktop.is_open(),
            mobile_visible,
            scroll_locked: mobile_visible,
        }
    }
}
