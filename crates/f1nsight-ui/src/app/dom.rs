//! Small DOM helpers shared by the widget bindings.

use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, Node};

/// All elements under `root` matching `selector`, in document order.
pub(crate) fn query_all(root: &impl AsRef<Element>, selector: &str) -> Vec<Element> {
    let Ok(list) = root.as_ref().query_selector_all(selector) else {
        tracing::warn!(selector, "invalid selector");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// All elements in the document matching `selector`.
pub(crate) fn query_document(selector: &str) -> Vec<Element> {
    gloo::utils::document()
        .document_element()
        .map(|root| query_all(&root, selector))
        .unwrap_or_default()
}

/// First element under `root` matching `selector`.
pub(crate) fn query(root: &impl AsRef<Element>, selector: &str) -> Option<Element> {
    root.as_ref().query_selector(selector).ok().flatten()
}

/// First element in the document matching `selector`.
pub(crate) fn query_one(selector: &str) -> Option<Element> {
    gloo::utils::document().query_selector(selector).ok().flatten()
}

/// Whether an event's target sits inside `element`.
pub(crate) fn event_within(event: &Event, element: &Element) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Node>().ok())
        .is_some_and(|node| element.contains(Some(&node)))
}

/// Add or remove a class.
pub(crate) fn set_class(element: &Element, class: &str, enabled: bool) {
    let classes = element.class_list();
    let result = if enabled {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if result.is_err() {
        tracing::warn!(class, "failed to update class list");
    }
}

/// Set an inline style property.
pub(crate) fn set_style(element: &Element, property: &str, value: &str) {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    if element.style().set_property(property, value).is_err() {
        tracing::warn!(property, value, "failed to set inline style");
    }
}

/// Set the page body's `overflow` style.
fn set_body_overflow(value: &str) {
    if let Some(body) = gloo::utils::document().body() {
        set_style(&body, "overflow", value);
    }
}

/// Body scrolling shared by the sidebar overlay and the page loader.
///
/// While the overlay holds the lock the loader leaves `overflow` alone.
#[derive(Clone, Default)]
pub(crate) struct BodyScroll {
    locked: Rc<Cell<bool>>,
}

impl BodyScroll {
    pub(crate) fn lock(&self) {
        self.locked.set(true);
        set_body_overflow("hidden");
    }

    pub(crate) fn unlock(&self) {
        self.locked.set(false);
        set_body_overflow("");
    }

    /// Loader restore; skipped while the overlay holds the lock.
    pub(crate) fn restore(&self) {
        if self.locked.get() {
            tracing::debug!("body scroll locked by sidebar overlay");
            return;
        }
        set_body_overflow("auto");
    }
}

/// Viewport width in CSS pixels.
pub(crate) fn window_width() -> u32 {
    gloo::utils::window()
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .map_or(0, |width| {
            if width <= 0.0 {
                0
            } else {
                // Widths are small positive integers; truncation is intended.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let width = width as u32;
                width
            }
        })
}

/// Trimmed text content of an element.
pub(crate) fn text_of(element: &Element) -> String {
    element.text_content().unwrap_or_default().trim().to_string()
}
