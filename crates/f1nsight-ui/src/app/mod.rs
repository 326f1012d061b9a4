//! Browser entry point binding the core widgets to the dashboard markup.
//!
//! # Design
//! - One [`Dashboard`] per page owns the event bus, every DOM listener and
//!   the notification controller; it lives in a thread-local slot and is
//!   dropped on a `pagehide` that does not enter the back/forward cache.
//! - Each binding is optional: pages without the matching markup skip it.

mod collapse;
mod dom;
mod loader;
mod notifications;
mod preferences;
mod select;
mod sidebar;

use crate::app::dom::BodyScroll;
use crate::components::theme_switcher::{ThemeSwitcherMenu, ThemeSwitcherProps};
use crate::core::config::{CONFIG_ELEMENT_ID, DashboardConfig};
use crate::telemetry::{LogFormat, LoggingConfig, init_logging};
use f1nsight_events::{EventBus, Subscription};
use gloo::events::EventListener;
use notifications::{WebNotificationCenter, WebNotifications};
use preferences::{BrowserStorage, StorageArea};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::PageTransitionEvent;
use yew::AppHandle;

thread_local! {
    static DASHBOARD: RefCell<Option<Dashboard>> = const { RefCell::new(None) };
}

/// Everything bound for the current page.
struct Dashboard {
    _bus_log: Subscription,
    _selects: Option<select::SelectBindings>,
    _sidebar: Option<sidebar::SidebarBinding>,
    _collapse: collapse::CollapseBindings,
    _loader: loader::LoaderBinding,
    _notifications: Option<EventListener>,
    _notification_center: Rc<WebNotificationCenter>,
    _theme_switcher: Option<AppHandle<ThemeSwitcherMenu>>,
}

impl Dashboard {
    fn mount(config: &DashboardConfig) -> Self {
        let bus = EventBus::with_capacity(config.replay_capacity);
        let bus_log = bus.subscribe(|envelope| {
            tracing::debug!(id = envelope.id, kind = envelope.event.kind(), "ui event");
        });
        let local = BrowserStorage::open(StorageArea::Local);
        let session = BrowserStorage::open(StorageArea::Session);

        let scroll = BodyScroll::default();
        let loader = loader::bind(session, &scroll);
        let sidebar = sidebar::bind(Rc::clone(&local), &bus, scroll, config.mobile_max_width);
        let collapse = collapse::bind(&local, &bus);
        let selects = select::bind(&bus);

        let center = Rc::new(WebNotificationCenter::new(
            WebNotifications,
            config.notification_defaults(),
            bus.clone(),
        ));
        let notifications =
            notifications::bind(&center, config.notifications.confirmation_delay_ms);

        let theme_switcher = mount_theme_switcher(ThemeSwitcherProps {
            store: local,
            bus: bus.clone(),
        });

        tracing::info!(
            sidebar = sidebar.is_some(),
            selects = selects.is_some(),
            collapse_listeners = collapse.len(),
            notifications = notifications.is_some(),
            theme_switcher = theme_switcher.is_some(),
            "dashboard bound"
        );
        Self {
            _bus_log: bus_log,
            _selects: selects,
            _sidebar: sidebar,
            _collapse: collapse,
            _loader: loader,
            _notifications: notifications,
            _notification_center: center,
            _theme_switcher: theme_switcher,
        }
    }
}

fn mount_theme_switcher(props: ThemeSwitcherProps) -> Option<AppHandle<ThemeSwitcherMenu>> {
    let document = gloo::utils::document();
    let body = document.body()?;
    let container = match document.create_element("div") {
        Ok(container) => container,
        Err(err) => {
            tracing::warn!(error = ?err, "failed to create theme switcher container");
            return None;
        }
    };
    container.set_class_name("theme-switcher-container");
    if let Err(err) = body.append_child(&container) {
        tracing::warn!(error = ?err, "failed to attach theme switcher container");
        return None;
    }
    Some(yew::Renderer::<ThemeSwitcherMenu>::with_root_and_props(container, props).render())
}

fn read_config() -> DashboardConfig {
    let text = gloo::utils::document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    DashboardConfig::from_json_or_default(text.as_deref())
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let config = read_config();
    if let Err(err) = init_logging(&LoggingConfig {
        level: &config.log_level,
        format: LogFormat::infer(),
    }) {
        gloo::console::warn!(format!("logging disabled: {err}"));
    }

    let dashboard = Dashboard::mount(&config);
    DASHBOARD.with(|slot| *slot.borrow_mut() = Some(dashboard));

    EventListener::new(&gloo::utils::window(), "pagehide", |event| {
        let cached = event
            .dyn_ref::<PageTransitionEvent>()
            .is_some_and(PageTransitionEvent::persisted);
        if cached {
            return;
        }
        let _ = DASHBOARD.with(|slot| slot.borrow_mut().take());
        tracing::debug!("dashboard disposed");
    })
    .forget();
}
