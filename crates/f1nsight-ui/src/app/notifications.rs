//! Browser Notification API backend and the preference checkbox.

use crate::core::notifications::{
    NotificationBackend, NotificationCenter, NotificationControl, NotificationError,
    NotificationOptions, Permission, PreferenceOutcome,
};
use async_trait::async_trait;
use gloo::events::EventListener;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Object, Reflect};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, HtmlInputElement, Notification, NotificationPermission};

/// [`NotificationBackend`] over `window.Notification`.
pub(crate) struct WebNotifications;

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn options_object(options: &NotificationOptions) -> Result<Object, JsValue> {
    let object = Object::new();
    let fields: [(&str, JsValue); 6] = [
        ("body", JsValue::from_str(&options.body)),
        ("icon", JsValue::from_str(&options.icon)),
        ("badge", JsValue::from_str(&options.badge)),
        ("tag", JsValue::from_str(&options.tag)),
        ("silent", JsValue::from_bool(options.silent)),
        ("requireInteraction", JsValue::from_bool(options.require_interaction)),
    ];
    for (key, value) in fields {
        let _ = Reflect::set(&object, &JsValue::from_str(key), &value)?;
    }
    Ok(object)
}

#[async_trait(?Send)]
impl NotificationBackend for WebNotifications {
    type Handle = Notification;

    fn is_supported(&self) -> bool {
        Reflect::has(&gloo::utils::window(), &JsValue::from_str("Notification")).unwrap_or(false)
    }

    fn permission(&self) -> Permission {
        match Notification::permission() {
            NotificationPermission::Granted => Permission::Granted,
            NotificationPermission::Denied => Permission::Denied,
            _ => Permission::Default,
        }
    }

    async fn request_permission(&self) -> Result<Permission, NotificationError> {
        let promise = Notification::request_permission().map_err(|err| {
            NotificationError::RequestFailed {
                detail: describe(&err),
            }
        })?;
        let answer = JsFuture::from(promise)
            .await
            .map_err(|err| NotificationError::RequestFailed {
                detail: describe(&err),
            })?;
        Ok(answer
            .as_string()
            .map_or(Permission::Default, |value| Permission::parse(&value)))
    }

    fn show(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<Notification, NotificationError> {
        let create_failed = |err: JsValue| NotificationError::CreateFailed {
            detail: describe(&err),
        };
        let init = options_object(options).map_err(create_failed)?;
        let notification =
            Notification::new_with_options(title, init.unchecked_ref()).map_err(create_failed)?;

        // Clicking focuses the dashboard and dismisses the notification.
        let handle = notification.clone();
        let on_click = Closure::once_into_js(move || {
            let _ = gloo::utils::window().focus();
            handle.close();
        });
        notification.set_onclick(Some(on_click.unchecked_ref()));
        Ok(notification)
    }
}

/// Page-wide notification controller.
pub(crate) type WebNotificationCenter = NotificationCenter<WebNotifications>;

struct PreferenceDom {
    checkbox: HtmlInputElement,
    label: Option<Element>,
}

impl PreferenceDom {
    fn paint(&self, control: NotificationControl) {
        self.checkbox.set_checked(control.checked);
        self.checkbox.set_disabled(control.disabled);
        let Some(label) = &self.label else {
            return;
        };
        label.set_text_content(Some(control.label));
        if let Some(title) = control.title {
            let _ = label.set_attribute("title", title);
        }
    }
}

/// Bind the `input[type="checkbox"].filled-in` preference, when present.
pub(crate) fn bind(
    center: &Rc<WebNotificationCenter>,
    confirmation_delay_ms: u32,
) -> Option<EventListener> {
    let checkbox = gloo::utils::document()
        .query_selector("input[type=\"checkbox\"].filled-in")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())?;
    let dom = Rc::new(PreferenceDom {
        label: checkbox.next_element_sibling(),
        checkbox,
    });
    dom.paint(center.control());
    tracing::debug!(
        supported = center.is_supported(),
        permission = center.permission_status().as_str(),
        "notification preference bound"
    );

    let center = Rc::clone(center);
    Some(EventListener::new(&dom.checkbox.clone(), "change", move |_event| {
        if !dom.checkbox.checked() {
            return;
        }
        let center = Rc::clone(&center);
        let dom = Rc::clone(&dom);
        wasm_bindgen_futures::spawn_local(async move {
            match center.on_preference_checked().await {
                PreferenceOutcome::Granted => {
                    dom.paint(center.control());
                    TimeoutFuture::new(confirmation_delay_ms).await;
                    let _ = center.send_confirmation();
                }
                PreferenceOutcome::Refused(control) => dom.paint(control),
            }
        });
    }))
}
