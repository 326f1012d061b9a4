//! Page loader overlay and navigation flag.
//!
//! The overlay is hidden on every lifecycle signal; the session flag only
//! records that a non-reload navigation is in flight so a page restored from
//! the back/forward cache does not keep a stale loader.

use crate::core::preferences::{NAVIGATING_KEY, PreferenceStore, clear, load_string, persist_string};
use std::rc::Rc;

/// Browser lifecycle signals the loader reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLifecycle {
    /// `DOMContentLoaded`.
    Ready,
    /// `beforeunload`; `is_reload` is true for a page refresh.
    BeforeUnload {
        /// Navigation type is a reload.
        is_reload: bool,
    },
    /// `pageshow`, including back/forward cache restores.
    PageShow,
    /// `load`.
    Load,
    /// `popstate`.
    PopState,
}

/// DOM side effects requested by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoaderEffect {
    /// Set the loader's `display` to `none`.
    pub hide_loader: bool,
    /// Reset `body.style.overflow` to `auto`.
    pub restore_scroll: bool,
}

impl LoaderEffect {
    const NONE: Self = Self {
        hide_loader: false,
        restore_scroll: false,
    };
    const SETTLED: Self = Self {
        hide_loader: true,
        restore_scroll: true,
    };
}

/// Session-backed navigation state.
pub struct PageLoader {
    session: Rc<dyn PreferenceStore>,
}

impl PageLoader {
    /// Loader bound to session storage.
    #[must_use]
    pub const fn new(session: Rc<dyn PreferenceStore>) -> Self {
        Self { session }
    }

    /// Whether a navigation flag is pending.
    #[must_use]
    pub fn is_navigating(&self) -> bool {
        load_string(self.session.as_ref(), NAVIGATING_KEY).is_some()
    }

    /// React to a lifecycle signal.
    pub fn handle(&self, event: PageLifecycle) -> LoaderEffect {
        match event {
            PageLifecycle::Ready => {
                if self.is_navigating() {
                    tracing::debug!("clearing navigation flag left by previous page");
                    clear(self.session.as_ref(), NAVIGATING_KEY);
                }
                LoaderEffect {
                    hide_loader: true,
                    restore_scroll: false,
                }
            }
            PageLifecycle::BeforeUnload { is_reload } => {
                if !is_reload {
                    persist_string(self.session.as_ref(), NAVIGATING_KEY, "true");
                }
                LoaderEffect::NONE
            }
            PageLifecycle::PageShow | PageLifecycle::Load | PageLifecycle::PopState => {
                clear(self.session.as_ref(), NAVIGATING_KEY);
                LoaderEffect::SETTLED
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::MemoryStore;

    #[test]
    fn navigation_sets_flag_but_reload_does_not() {
        let session = MemoryStore::new();
        let loader = PageLoader::new(Rc::new(session.clone()));

        let _ = loader.handle(PageLifecycle::BeforeUnload { is_reload: true });
        assert!(!loader.is_navigating());

        let effect = loader.handle(PageLifecycle::BeforeUnload { is_reload: false });
        assert_eq!(effect, LoaderEffect::NONE);
        assert_eq!(session.peek(NAVIGATING_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn lifecycle_signals_clear_flag_and_settle_page() {
        for event in [
            PageLifecycle::PageShow,
            PageLifecycle::Load,
            PageLifecycle::PopState,
        ] {
            let session = MemoryStore::with_entries([(NAVIGATING_KEY, "true")]);
            let loader = PageLoader::new(Rc::new(session.clone()));
            assert_eq!(loader.handle(event), LoaderEffect::SETTLED);
            assert_eq!(session.peek(NAVIGATING_KEY), None);
        }
    }

    #[test]
    fn ready_hides_loader_and_consumes_stale_flag() {
        let session = MemoryStore::with_entries([(NAVIGATING_KEY, "true")]);
        let loader = PageLoader::new(Rc::new(session.clone()));
        let effect = loader.handle(PageLifecycle::Ready);
        assert!(effect.hide_loader);
        assert!(!effect.restore_scroll);
        assert!(!loader.is_navigating());
    }

    #[test]
    fn unavailable_session_storage_is_tolerated() {
        let loader = PageLoader::new(Rc::new(MemoryStore::unavailable()));
        let _ = loader.handle(PageLifecycle::BeforeUnload { is_reload: false });
        assert!(!loader.is_navigating());
        assert!(loader.handle(PageLifecycle::Load).hide_loader);
    }
}
