//! Floating palette button and theme option list.
//!
//! # Design
//! - Theme state lives in [`ThemeSwitcher`]; the component only renders a
//!   snapshot of it and forwards clicks.
//! - The document root's `data-theme` attribute is kept in sync from an effect.
//! - Outside clicks are detected with a document listener scoped to the
//!   component's lifetime.

use crate::core::preferences::PreferenceStore;
use crate::core::theme::{THEME_ATTRIBUTE, Theme, ThemeSwitcher};
use crate::core::widget::Hit;
use f1nsight_events::EventBus;
use gloo::events::EventListener;
use std::rc::Rc;
use web_sys::Node;
use yew::prelude::*;

#[derive(Properties)]
pub(crate) struct ThemeSwitcherProps {
    pub(crate) store: Rc<dyn PreferenceStore>,
    pub(crate) bus: EventBus,
}

impl PartialEq for ThemeSwitcherProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    current: Theme,
    open: bool,
}

impl Snapshot {
    const fn of(switcher: &ThemeSwitcher) -> Self {
        Self {
            current: switcher.current(),
            open: switcher.is_open(),
        }
    }
}

fn apply_theme(theme: Theme) {
    let Some(root) = gloo::utils::document().document_element() else {
        return;
    };
    if root.set_attribute(THEME_ATTRIBUTE, theme.id()).is_err() {
        tracing::warn!(theme = theme.id(), "failed to set theme attribute");
    }
}

fn contains(node_ref: &NodeRef, event: &Event) -> bool {
    let target = event.target().and_then(|t| wasm_bindgen::JsCast::dyn_into::<Node>(t).ok());
    node_ref
        .get()
        .is_some_and(|node| node.contains(target.as_ref()))
}

#[function_component(ThemeSwitcherMenu)]
pub(crate) fn theme_switcher_menu(props: &ThemeSwitcherProps) -> Html {
    let switcher = {
        let store = Rc::clone(&props.store);
        let bus = props.bus.clone();
        use_mut_ref(move || ThemeSwitcher::restore(store, bus))
    };
    let snapshot = use_state(|| Snapshot::of(&switcher.borrow()));
    let toggle_ref = use_node_ref();
    let panel_ref = use_node_ref();

    use_effect_with_deps(
        |theme| {
            apply_theme(*theme);
            || ()
        },
        snapshot.current,
    );
    {
        let switcher = switcher.clone();
        let snapshot = snapshot.clone();
        let toggle_ref = toggle_ref.clone();
        let panel_ref = panel_ref.clone();
        use_effect_with_deps(
            move |_| {
                let listener =
                    EventListener::new(&gloo::utils::document(), "click", move |event| {
                        let hit = Hit::classify(
                            contains(&toggle_ref, event),
                            contains(&panel_ref, event),
                        );
                        let mut switcher = switcher.borrow_mut();
                        if switcher.on_outside_interaction(hit).changed() {
                            snapshot.set(Snapshot::of(&switcher));
                        }
                    });
                move || drop(listener)
            },
            (),
        );
    }

    let on_toggle = {
        let switcher = switcher.clone();
        let snapshot = snapshot.clone();
        Callback::from(move |_: MouseEvent| {
            let mut switcher = switcher.borrow_mut();
            let _ = switcher.toggle();
            snapshot.set(Snapshot::of(&switcher));
        })
    };

    html! {
        <>
            <div class="theme-toggle" id="themeToggle" ref={toggle_ref} onclick={on_toggle}>
                <i class="material-symbols-rounded">{"palette"}</i>
            </div>
            <div
                class="theme-switcher"
                id="themeSwitcher"
                ref={panel_ref}
                style={if snapshot.open { "display: block" } else { "display: none" }}
            >
                <div class="theme-title">{"Select Theme"}</div>
                <div class="theme-options">
                    {for Theme::all().into_iter().map(|theme| {
                        let onclick = {
                            let switcher = switcher.clone();
                            let snapshot = snapshot.clone();
                            Callback::from(move |_: MouseEvent| {
                                let mut switcher = switcher.borrow_mut();
                                switcher.select(theme);
                                snapshot.set(Snapshot::of(&switcher));
                            })
                        };
                        let active = (snapshot.current == theme).then_some("active");
                        html! {
                            <div
                                class={classes!("theme-option", active)}
                                data-theme={theme.id()}
                                {onclick}
                            >
                                <span
                                    class={classes!("theme-option-color", theme.id())}
                                    style={format!("background-color: {}", theme.accent().hex)}
                                />
                                <span>{theme.label()}</span>
                            </div>
                        }
                    })}
                </div>
            </div>
        </>
    }
}
