//! Team colour themes and the theme switcher state.

use crate::core::preferences::{PreferenceStore, THEME_KEY, load_string, persist_string};
use crate::core::widget::{Hit, ToggleWidget, Transition};
use f1nsight_events::{EventBus, UiEvent};
use std::rc::Rc;

/// A single colour token with a stable name and hex value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorToken {
    /// Semantic identifier (e.g. "accent").
    pub name: &'static str,
    /// Hex RGB value.
    pub hex: &'static str,
}

/// Selectable dashboard theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    /// Stock F1 red.
    #[default]
    Default,
    /// Scuderia Ferrari red.
    Ferrari,
    /// McLaren papaya.
    McLaren,
}

impl Theme {
    /// All themes in switcher order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Default, Self::Ferrari, Self::McLaren]
    }

    /// Identifier stored in `localStorage` and the root `data-theme` attribute.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Ferrari => "ferrari",
            Self::McLaren => "mclaren",
        }
    }

    /// Human-readable label for the switcher.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Ferrari => "Ferrari",
            Self::McLaren => "McLaren",
        }
    }

    /// Swatch colour shown next to the label.
    #[must_use]
    pub const fn accent(self) -> ColorToken {
        match self {
            Self::Default => ColorToken {
                name: "accent",
                hex: "#E10600",
            },
            Self::Ferrari => ColorToken {
                name: "accent",
                hex: "#DC0000",
            },
            Self::McLaren => ColorToken {
                name: "accent",
                hex: "#FF8000",
            },
        }
    }

    /// Parse a stored identifier.
    #[must_use]
    pub fn from_id(value: &str) -> Option<Self> {
        Self::all().into_iter().find(|theme| theme.id() == value)
    }
}

/// Attribute set on the document root to activate a theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Palette button plus theme option panel.
pub struct ThemeSwitcher {
    panel: ToggleWidget,
    current: Theme,
    store: Rc<dyn PreferenceStore>,
    bus: EventBus,
}

impl ThemeSwitcher {
    /// Restore the persisted theme; unknown or missing values fall back to [`Theme::Default`].
    #[must_use]
    pub fn restore(store: Rc<dyn PreferenceStore>, bus: EventBus) -> Self {
        let current = load_string(store.as_ref(), THEME_KEY)
            .and_then(|value| {
                let theme = Theme::from_id(&value);
                if theme.is_none() {
                    tracing::debug!(value = %value, "unknown stored theme; using default");
                }
                theme
            })
            .unwrap_or_default();
        Self {
            panel: ToggleWidget::new(),
            current,
            store,
            bus,
        }
    }

    /// Active theme.
    #[must_use]
    pub const fn current(&self) -> Theme {
        self.current
    }

    /// Whether the option panel is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.panel.is_open()
    }

    /// Palette button click.
    pub fn toggle(&mut self) -> Transition {
        self.panel.toggle()
    }

    /// Document click.
    pub fn on_outside_interaction(&mut self, hit: Hit) -> Transition {
        self.panel.on_outside_interaction(hit)
    }

    /// Apply and persist a theme, then close the panel.
    pub fn select(&mut self, theme: Theme) {
        self.current = theme;
        persist_string(self.store.as_ref(), THEME_KEY, theme.id());
        let _ = self.panel.close();
        tracing::info!(theme = theme.id(), "theme applied");
        let _ = self.bus.publish(UiEvent::ThemeChanged {
            theme: theme.id().to_string(),
        });
    }
}
