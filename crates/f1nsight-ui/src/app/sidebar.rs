//! Sidebar container, toggle button and body classes.

use crate::app::dom::{BodyScroll, event_within, query_one, set_class, window_width};
use crate::core::preferences::PreferenceStore;
use crate::core::sidebar::{
    BODY_COLLAPSED_CLASS, MOBILE_VISIBLE_CLASS, SIDEBAR_COLLAPSED_CLASS, Sidebar, SidebarView,
};
use crate::core::widget::Hit;
use f1nsight_events::{EventBus, UiEvent};
use gloo::events::EventListener;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_sys::Element;

/// Listeners keeping the sidebar binding alive.
pub(crate) struct SidebarBinding {
    _listeners: Vec<EventListener>,
}

struct SidebarDom {
    container: Element,
    toggle: Element,
    scroll: BodyScroll,
    painted: Cell<Option<SidebarView>>,
}

impl SidebarDom {
    fn paint(&self, sidebar: &Sidebar) {
        let view = sidebar.view();
        set_class(&self.container, SIDEBAR_COLLAPSED_CLASS, view.container_collapsed);
        set_class(&self.container, MOBILE_VISIBLE_CLASS, view.mobile_visible);
        if let Some(body) = gloo::utils::document().body() {
            set_class(&body, BODY_COLLAPSED_CLASS, view.body_collapsed);
        }
        match view.scroll_lock_change(self.painted.get().as_ref()) {
            Some(true) => self.scroll.lock(),
            Some(false) => self.scroll.unlock(),
            None => {}
        }
        self.painted.set(Some(view));
    }
}

/// Bind `.sidebar-container` and `.sidebar-toggle` when both exist.
pub(crate) fn bind(
    store: Rc<dyn PreferenceStore>,
    bus: &EventBus,
    scroll: BodyScroll,
    mobile_max_width: u32,
) -> Option<SidebarBinding> {
    let (Some(container), Some(toggle)) =
        (query_one(".sidebar-container"), query_one(".sidebar-toggle"))
    else {
        tracing::debug!("page has no sidebar");
        return None;
    };
    let dom = Rc::new(SidebarDom {
        container,
        toggle,
        scroll,
        painted: Cell::new(None),
    });
    let sidebar = Rc::new(RefCell::new(Sidebar::restore_with_breakpoint(
        store,
        window_width(),
        mobile_max_width,
    )));
    dom.paint(&sidebar.borrow());

    let window = gloo::utils::window();
    let listeners = vec![
        EventListener::new(&dom.toggle, "click", {
            let dom = Rc::clone(&dom);
            let sidebar = Rc::clone(&sidebar);
            let bus = bus.clone();
            move |_event| {
                let (collapsed, mobile_visible) = {
                    let mut sidebar = sidebar.borrow_mut();
                    let _ = sidebar.toggle();
                    dom.paint(&sidebar);
                    (sidebar.is_collapsed(), sidebar.is_mobile_visible())
                };
                let _ = bus.publish(UiEvent::SidebarToggled {
                    collapsed,
                    mobile_visible,
                });
            }
        }),
        EventListener::new(&gloo::utils::document(), "click", {
            let dom = Rc::clone(&dom);
            let sidebar = Rc::clone(&sidebar);
            move |event| {
                let hit = Hit::classify(
                    event_within(event, &dom.toggle),
                    event_within(event, &dom.container),
                );
                let mut sidebar = sidebar.borrow_mut();
                if sidebar.on_outside_interaction(hit).changed() {
                    dom.paint(&sidebar);
                }
            }
        }),
        EventListener::new(&window, "resize", {
            let dom = Rc::clone(&dom);
            let sidebar = Rc::clone(&sidebar);
            move |_event| {
                let mut sidebar = sidebar.borrow_mut();
                if sidebar.on_resize(window_width()) {
                    dom.paint(&sidebar);
                }
            }
        }),
    ];
    Some(SidebarBinding {
        _listeners: listeners,
    })
}
