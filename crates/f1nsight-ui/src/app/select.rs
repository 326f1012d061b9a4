//! Driver comparison selects bound to `.custom-select` markup.

use crate::app::dom::{event_within, query, query_all, query_document, set_class, set_style, text_of};
use crate::core::compare::{ChartUpdater, ComparisonCoordinator};
use crate::core::group::ExclusiveGroup;
use crate::core::select::{OPTION_SELECTED_CLASS, SELECT_OPEN_CLASS, SearchSelect, SelectOption};
use crate::core::widget::Hit;
use f1nsight_events::{
    DRIVER_SELECTED_DOM_EVENT, DriverSelection, EventBus, SelectorSlot, Subscription, UiEvent,
};
use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Element, HtmlInputElement};

struct SelectElements {
    container: Element,
    header: Element,
    label: Option<Element>,
    panel: Element,
    search: Option<HtmlInputElement>,
    hidden: Option<HtmlInputElement>,
    options: Vec<(String, Element)>,
}

impl SelectElements {
    fn collect(container: Element) -> Option<Self> {
        let Some(header) = query(&container, ".select-header") else {
            tracing::debug!("custom select without header; skipping");
            return None;
        };
        let Some(panel) = query(&container, ".select-options") else {
            tracing::debug!("custom select without option list; skipping");
            return None;
        };
        let options = query_all(&panel, ".select-option")
            .into_iter()
            .filter_map(|option| Some((option.get_attribute("data-value")?, option)))
            .collect();
        Some(Self {
            label: query(&header, ".selected-driver"),
            search: query(&container, ".driver-search").and_then(|el| el.dyn_into().ok()),
            hidden: query(&container, "input[type=\"hidden\"]").and_then(|el| el.dyn_into().ok()),
            container,
            header,
            panel,
            options,
        })
    }

    fn model(&self, slot: SelectorSlot) -> SearchSelect {
        let options = self
            .options
            .iter()
            .map(|(value, el)| SelectOption::new(value.clone(), text_of(el)))
            .collect();
        SearchSelect::new(slot, options)
    }

    fn paint(&self, select: &SearchSelect) {
        set_class(&self.container, SELECT_OPEN_CLASS, select.is_open());
        for ((value, option), visible) in self.options.iter().zip(select.visibility()) {
            set_style(option, "display", if visible { "" } else { "none" });
            set_class(
                option,
                OPTION_SELECTED_CLASS,
                select.selected_value() == Some(value.as_str()),
            );
        }
        if let (Some(label), Some(text)) = (&self.label, select.selected_label()) {
            label.set_text_content(Some(text));
        }
        if let (Some(hidden), Some(value)) = (&self.hidden, select.selected_value()) {
            hidden.set_value(value);
        }
    }
}

type SharedGroup = Rc<RefCell<ExclusiveGroup<SearchSelect>>>;

/// Listeners and subscriptions for the comparison selects.
pub(crate) struct SelectBindings {
    _listeners: Vec<EventListener>,
    _coordinator: Subscription,
}

/// Bind every `.custom-select`; returns `None` on pages without any.
pub(crate) fn bind(bus: &EventBus) -> Option<SelectBindings> {
    let elements: Vec<SelectElements> = query_document(".custom-select")
        .into_iter()
        .filter_map(SelectElements::collect)
        .collect();
    let slotted: Vec<(SelectorSlot, SelectElements)> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, el)| match SelectorSlot::from_index(index) {
            Some(slot) => Some((slot, el)),
            None => {
                tracing::debug!(index, "extra custom select ignored");
                None
            }
        })
        .collect();
    if slotted.is_empty() {
        return None;
    }

    let mut members = Vec::with_capacity(slotted.len());
    for (slot, el) in &slotted {
        let mut select = el.model(*slot);
        tracing::debug!(
            slot = select.slot().ordinal(),
            options = select.options().len(),
            "custom select collected"
        );
        if let Some(value) = el
            .hidden
            .as_ref()
            .map(HtmlInputElement::value)
            .filter(|value| !value.is_empty())
        {
            let _ = select.select(&value);
        }
        members.push(select);
    }
    let elements: Rc<Vec<SelectElements>> = Rc::new(slotted.into_iter().map(|(_, el)| el).collect());
    let group: SharedGroup = Rc::new(RefCell::new(ExclusiveGroup::new(members)));
    repaint(&elements, &group);

    let coordinator = Rc::new(RefCell::new(ComparisonCoordinator::new(
        bus.clone(),
        Rc::new(PageChart),
    )));
    for slot in [SelectorSlot::First, SelectorSlot::Second] {
        if let Some(value) = seed_value(slot) {
            coordinator.borrow_mut().seed(slot, &value);
        }
    }
    let subscription = ComparisonCoordinator::attach(&coordinator);

    let mut listeners = Vec::new();
    for index in 0..elements.len() {
        listeners.extend(bind_member(index, &elements, &group, bus));
    }
    listeners.push(EventListener::new(&gloo::utils::document(), "click", {
        let elements = Rc::clone(&elements);
        let group = Rc::clone(&group);
        move |event| {
            let changes = group.borrow_mut().on_outside_interaction(|index| {
                let inside = elements
                    .get(index)
                    .is_some_and(|el| event_within(event, &el.container));
                Hit::classify(false, inside)
            });
            if !changes.is_empty() {
                repaint(&elements, &group);
            }
        }
    }));

    tracing::debug!(selects = elements.len(), "comparison selects bound");
    Some(SelectBindings {
        _listeners: listeners,
        _coordinator: subscription,
    })
}

fn bind_member(
    index: usize,
    elements: &Rc<Vec<SelectElements>>,
    group: &SharedGroup,
    bus: &EventBus,
) -> Vec<EventListener> {
    let Some(el) = elements.get(index) else {
        return Vec::new();
    };
    let mut listeners = Vec::with_capacity(3);

    listeners.push(EventListener::new(&el.header, "click", {
        let elements = Rc::clone(elements);
        let group = Rc::clone(group);
        move |event| {
            event.stop_propagation();
            let _ = group.borrow_mut().toggle(index);
            repaint(&elements, &group);
            let opened = group.borrow().get(index).is_some_and(SearchSelect::is_open);
            if opened {
                if let Some(search) = elements.get(index).and_then(|el| el.search.as_ref()) {
                    let _ = search.focus();
                }
            }
        }
    }));

    if let Some(search) = &el.search {
        listeners.push(EventListener::new(search, "input", {
            let elements = Rc::clone(elements);
            let group = Rc::clone(group);
            move |event| {
                let Some(input) = event
                    .target()
                    .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                if let Some(select) = group.borrow_mut().get_mut(index) {
                    select.set_filter(&input.value());
                }
                repaint(&elements, &group);
            }
        }));
    }

    listeners.push(EventListener::new(&el.panel, "click", {
        let elements = Rc::clone(elements);
        let group = Rc::clone(group);
        let bus = bus.clone();
        move |event| {
            let Some(value) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|target| target.closest(".select-option").ok().flatten())
                .and_then(|option| option.get_attribute("data-value"))
            else {
                return;
            };
            let picked = group
                .borrow_mut()
                .get_mut(index)
                .and_then(|select| select.select(&value));
            let Some(selection) = picked else {
                return;
            };
            if let Some(search) = elements.get(index).and_then(|el| el.search.as_ref()) {
                search.set_value("");
            }
            repaint(&elements, &group);
            dispatch_dom_event(&selection);
            let _ = bus.publish(UiEvent::DriverSelected(selection));
        }
    }));

    listeners
}

fn repaint(elements: &[SelectElements], group: &SharedGroup) {
    let group = group.borrow();
    for (el, select) in elements.iter().zip(group.iter()) {
        el.paint(select);
    }
}

fn seed_value(slot: SelectorSlot) -> Option<String> {
    let id = match slot {
        SelectorSlot::First => "driver1",
        SelectorSlot::Second => "driver2",
    };
    gloo::utils::document()
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .filter(|value| !value.is_empty())
}

/// Re-emit a pick as the `driverSelected` DOM event for page scripts.
fn dispatch_dom_event(selection: &DriverSelection) {
    let detail = match serde_json::to_string(selection) {
        Ok(json) => js_sys::JSON::parse(&json).unwrap_or(JsValue::NULL),
        Err(err) => {
            tracing::warn!(error = %err, "failed to encode driver selection");
            return;
        }
    };
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    match CustomEvent::new_with_event_init_dict(DRIVER_SELECTED_DOM_EVENT, &init) {
        Ok(event) => {
            let _ = gloo::utils::document().dispatch_event(&event);
        }
        Err(err) => tracing::warn!(error = ?err, "failed to create driverSelected event"),
    }
}

/// Calls the page's global `updateChart(driver1, driver2)` when defined.
struct PageChart;

impl ChartUpdater for PageChart {
    fn update_chart(&self, driver1: &str, driver2: &str) {
        let hook = js_sys::Reflect::get(&gloo::utils::window(), &JsValue::from_str("updateChart"))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok());
        let Some(hook) = hook else {
            tracing::debug!("page defines no updateChart hook");
            return;
        };
        if let Err(err) = hook.call2(
            &JsValue::NULL,
            &JsValue::from_str(driver1),
            &JsValue::from_str(driver2),
        ) {
            tracing::error!(error = ?err, "updateChart threw");
        }
    }
}
