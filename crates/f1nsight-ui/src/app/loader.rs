//! `#pageLoader` overlay driven by page lifecycle events.

use crate::app::dom::{BodyScroll, set_style};
use crate::core::loader::{LoaderEffect, PageLifecycle, PageLoader};
use crate::core::preferences::PreferenceStore;
use gloo::events::EventListener;
use std::rc::Rc;
use web_sys::Element;

/// `PerformanceNavigation.TYPE_RELOAD`.
const NAVIGATION_TYPE_RELOAD: u16 = 1;

/// Lifecycle listeners for the loader overlay.
pub(crate) struct LoaderBinding {
    _listeners: Vec<EventListener>,
}

fn apply(overlay: Option<&Element>, scroll: &BodyScroll, effect: LoaderEffect) {
    if effect.hide_loader
        && let Some(overlay) = overlay
    {
        set_style(overlay, "display", "none");
    }
    if effect.restore_scroll {
        scroll.restore();
    }
}

fn is_reload() -> bool {
    gloo::utils::window()
        .performance()
        .is_some_and(|perf| perf.navigation().type_() == NAVIGATION_TYPE_RELOAD)
}

/// Settle the loader for the ready page and listen for later lifecycle signals.
pub(crate) fn bind(session: Rc<dyn PreferenceStore>, scroll: &BodyScroll) -> LoaderBinding {
    let overlay = Rc::new(gloo::utils::document().get_element_by_id("pageLoader"));
    if overlay.is_none() {
        tracing::debug!("page has no loader overlay");
    }
    let loader = Rc::new(PageLoader::new(session));
    apply((*overlay).as_ref(), scroll, loader.handle(PageLifecycle::Ready));

    let window = gloo::utils::window();
    let mut listeners = vec![EventListener::new(&window, "beforeunload", {
        let loader = Rc::clone(&loader);
        let overlay = Rc::clone(&overlay);
        let scroll = scroll.clone();
        move |_event| {
            let effect = loader.handle(PageLifecycle::BeforeUnload {
                is_reload: is_reload(),
            });
            apply((*overlay).as_ref(), &scroll, effect);
        }
    })];
    for (name, signal) in [
        ("pageshow", PageLifecycle::PageShow),
        ("load", PageLifecycle::Load),
        ("popstate", PageLifecycle::PopState),
    ] {
        let loader = Rc::clone(&loader);
        let overlay = Rc::clone(&overlay);
        let scroll = scroll.clone();
        listeners.push(EventListener::new(&window, name, move |_event| {
            apply((*overlay).as_ref(), &scroll, loader.handle(signal));
        }));
    }
    LoaderBinding {
        _listeners: listeners,
    }
}
