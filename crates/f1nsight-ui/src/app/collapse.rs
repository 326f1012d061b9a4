//! Collapsible table cards and modular dropdowns.
//!
//! Markup contract:
//! - a card carrying `data-collapse-table="<table id>"` with a
//!   `.collapse-toggle` button and a `.material-symbols-rounded` icon;
//! - a trigger carrying `data-dropdown="<panel id>"`, optionally with a
//!   `.dropdown-icon` arrow inside it.

use crate::app::dom::{event_within, query, query_document, set_class, set_style};
use crate::core::collapse::{TABLE_COLLAPSED_CLASS, TableCollapse};
use crate::core::preferences::PreferenceStore;
use crate::core::widget::{DROPDOWN_ANIMATE_CLASS, DROPDOWN_SHOW_CLASS, Dropdown, Hit};
use f1nsight_events::{EventBus, UiEvent};
use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::Element;

/// Listeners for every collapsible card and dropdown on the page.
pub(crate) struct CollapseBindings {
    listeners: Vec<EventListener>,
}

impl CollapseBindings {
    /// Number of live listeners, for diagnostics.
    pub(crate) const fn len(&self) -> usize {
        self.listeners.len()
    }
}

/// Bind table cards and dropdown triggers found in the document.
pub(crate) fn bind(store: &Rc<dyn PreferenceStore>, bus: &EventBus) -> CollapseBindings {
    let mut listeners = Vec::new();
    for card in query_document("[data-collapse-table]") {
        listeners.extend(bind_table(&card, Rc::clone(store), bus));
    }
    for trigger in query_document("[data-dropdown]") {
        listeners.extend(bind_dropdown(trigger));
    }
    CollapseBindings { listeners }
}

struct TableDom {
    table: Element,
    icon: Option<Element>,
}

impl TableDom {
    fn paint(&self, state: &TableCollapse) {
        set_class(&self.table, TABLE_COLLAPSED_CLASS, state.is_collapsed());
        if let Some(icon) = &self.icon {
            icon.set_text_content(Some(state.icon()));
        }
    }
}

fn bind_table(card: &Element, store: Rc<dyn PreferenceStore>, bus: &EventBus) -> Option<EventListener> {
    let table = card
        .get_attribute("data-collapse-table")
        .and_then(|id| gloo::utils::document().get_element_by_id(&id));
    let (Some(table), Some(button)) = (table, query(card, ".collapse-toggle")) else {
        tracing::debug!("collapsible card is missing its table or toggle");
        return None;
    };
    let dom = TableDom {
        icon: query(&button, ".material-symbols-rounded"),
        table,
    };
    let state = RefCell::new(TableCollapse::restore(store));
    dom.paint(&state.borrow());

    let bus = bus.clone();
    Some(EventListener::new(&button, "click", move |_event| {
        let collapsed = {
            let mut state = state.borrow_mut();
            let _ = state.toggle();
            dom.paint(&state);
            state.is_collapsed()
        };
        let _ = bus.publish(UiEvent::TableCollapsed { collapsed });
    }))
}

struct DropdownDom {
    trigger: Element,
    panel: Element,
    arrow: Option<Element>,
}

impl DropdownDom {
    fn paint(&self, dropdown: &Dropdown) {
        set_class(&self.panel, DROPDOWN_SHOW_CLASS, dropdown.is_open());
        if let Some(arrow) = &self.arrow {
            set_style(arrow, "transform", dropdown.arrow_transform());
        }
    }
}

fn bind_dropdown(trigger: Element) -> Vec<EventListener> {
    let Some(panel) = trigger
        .get_attribute("data-dropdown")
        .and_then(|id| gloo::utils::document().get_element_by_id(&id))
    else {
        tracing::debug!("dropdown trigger names no panel");
        return Vec::new();
    };
    set_class(&panel, DROPDOWN_ANIMATE_CLASS, true);
    let dom = Rc::new(DropdownDom {
        arrow: query(&trigger, ".dropdown-icon"),
        trigger,
        panel,
    });
    let dropdown = Rc::new(RefCell::new(Dropdown::new()));

    vec![
        EventListener::new(&dom.trigger, "click", {
            let dom = Rc::clone(&dom);
            let dropdown = Rc::clone(&dropdown);
            move |_event| {
                let mut dropdown = dropdown.borrow_mut();
                let _ = dropdown.toggle();
                dom.paint(&dropdown);
            }
        }),
        EventListener::new(&gloo::utils::document(), "click", move |event| {
            let hit = Hit::classify(
                event_within(event, &dom.trigger),
                event_within(event, &dom.panel),
            );
            let mut dropdown = dropdown.borrow_mut();
            if dropdown.on_outside_interaction(hit).changed() {
                dom.paint(&dropdown);
            }
        }),
    ]
}
