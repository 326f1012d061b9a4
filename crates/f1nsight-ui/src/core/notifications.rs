//! Desktop notification permission flow and preference control.
//!
//! # Design
//! - [`NotificationCenter`] owns the cached permission instead of a
//!   page-global flag; the browser API sits behind [`NotificationBackend`].
//! - Nothing here raises to the user: unsupported browsers and denied
//!   permissions degrade the preference checkbox via [`NotificationControl`].
//! - Requests are not cancellable; overlapping requests resolve in order and
//!   the last resolution wins.

use async_trait::async_trait;
use f1nsight_events::{EventBus, UiEvent};
use std::cell::Cell;
use thiserror::Error;

/// Icon used when a notification does not name one.
pub const DEFAULT_ICON: &str = "/static/images/F1_logo.png";
/// Badge used when a notification does not name one.
pub const DEFAULT_BADGE: &str = "/static/images/F1_logo.png";
/// Tag used when a notification does not name one.
pub const DEFAULT_TAG: &str = "f1nsight-notification";

const LABEL_ENABLE: &str = "enable desktop notifications";
const LABEL_UNSUPPORTED: &str = "desktop notifications (not supported)";
const LABEL_BLOCKED: &str = "desktop notifications (blocked by browser)";
const TITLE_BLOCKED: &str =
    "To enable notifications, you need to change permission settings in your browser";

/// Title of the confirmation shown after permission is granted.
pub const CONFIRMATION_TITLE: &str = "Notifications Enabled";
/// Body of the confirmation shown after permission is granted.
pub const CONFIRMATION_BODY: &str = "You will now receive notifications from F1nsight";

/// Browser notification permission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Permission {
    /// The user allowed notifications.
    Granted,
    /// The user blocked notifications.
    Denied,
    /// The user has not decided yet.
    #[default]
    Default,
}

impl Permission {
    /// Identifier used by the Notification API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Default => "default",
        }
    }

    /// Parse the Notification API string; unknown values map to [`Permission::Default`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            _ => Self::Default,
        }
    }
}

/// Error raised by a notification backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The browser has no Notification API.
    #[error("notifications unsupported")]
    Unsupported,
    /// The permission prompt rejected.
    #[error("notification permission request failed")]
    RequestFailed {
        /// Browser-provided detail.
        detail: String,
    },
    /// Constructing the notification threw.
    #[error("notification creation failed")]
    CreateFailed {
        /// Browser-provided detail.
        detail: String,
    },
}

/// State of the notification preference checkbox and its label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationControl {
    /// Checkbox `checked`.
    pub checked: bool,
    /// Checkbox `disabled`.
    pub disabled: bool,
    /// Label text next to the checkbox.
    pub label: &'static str,
    /// Tooltip for the label, when one applies.
    pub title: Option<&'static str>,
}

impl NotificationControl {
    /// Derive the control from browser support and the live permission.
    #[must_use]
    pub const fn derive(supported: bool, permission: Permission) -> Self {
        if !supported {
            return Self {
                checked: false,
                disabled: true,
                label: LABEL_UNSUPPORTED,
                title: None,
            };
        }
        match permission {
            Permission::Granted => Self {
                checked: true,
                disabled: false,
                label: LABEL_ENABLE,
                title: None,
            },
            Permission::Denied => Self {
                checked: false,
                disabled: true,
                label: LABEL_BLOCKED,
                title: Some(TITLE_BLOCKED),
            },
            Permission::Default => Self {
                checked: false,
                disabled: false,
                label: LABEL_ENABLE,
                title: None,
            },
        }
    }
}

/// Fallback values applied to fields a caller leaves unset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationDefaults {
    /// Default icon URL.
    pub icon: String,
    /// Default badge URL.
    pub badge: String,
    /// Default tag.
    pub tag: String,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            icon: DEFAULT_ICON.to_string(),
            badge: DEFAULT_BADGE.to_string(),
            tag: DEFAULT_TAG.to_string(),
        }
    }
}

/// Caller-supplied notification fields; unset fields take defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Body text.
    pub body: Option<String>,
    /// Icon URL.
    pub icon: Option<String>,
    /// Badge URL.
    pub badge: Option<String>,
    /// Replacement tag.
    pub tag: Option<String>,
    /// Suppress sound/vibration.
    pub silent: Option<bool>,
    /// Keep the notification until the user acts on it.
    pub require_interaction: Option<bool>,
}

impl NotificationRequest {
    /// Request with only a body.
    #[must_use]
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// Fill unset fields from `defaults`.
    #[must_use]
    pub fn resolve(self, defaults: &NotificationDefaults) -> NotificationOptions {
        NotificationOptions {
            body: self.body.unwrap_or_default(),
            icon: self.icon.unwrap_or_else(|| defaults.icon.clone()),
            badge: self.badge.unwrap_or_else(|| defaults.badge.clone()),
            tag: self.tag.unwrap_or_else(|| defaults.tag.clone()),
            silent: self.silent.unwrap_or(false),
            require_interaction: self.require_interaction.unwrap_or(false),
        }
    }
}

/// Fully resolved options handed to the Notification constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationOptions {
    /// Body text.
    pub body: String,
    /// Icon URL.
    pub icon: String,
    /// Badge URL.
    pub badge: String,
    /// Replacement tag.
    pub tag: String,
    /// Suppress sound/vibration.
    pub silent: bool,
    /// Keep the notification until the user acts on it.
    pub require_interaction: bool,
}

/// Seam to the browser Notification API.
#[async_trait(?Send)]
pub trait NotificationBackend {
    /// Handle to a displayed notification.
    type Handle;

    /// Whether the API exists at all.
    fn is_supported(&self) -> bool;

    /// Live permission as reported by the browser.
    fn permission(&self) -> Permission;

    /// Prompt the user.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::RequestFailed`] when the prompt rejects.
    async fn request_permission(&self) -> Result<Permission, NotificationError>;

    /// Display a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::CreateFailed`] when construction throws.
    fn show(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<Self::Handle, NotificationError>;
}

/// What the preference checkbox should do after a check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreferenceOutcome {
    /// Permission granted; show the confirmation after the configured delay.
    Granted,
    /// Permission not granted; refresh the control.
    Refused(NotificationControl),
}

/// Owned notification controller for one page.
pub struct NotificationCenter<B> {
    backend: B,
    permission: Cell<Permission>,
    defaults: NotificationDefaults,
    bus: EventBus,
}

impl<B: NotificationBackend> NotificationCenter<B> {
    /// Controller seeded with the browser's current permission.
    #[must_use]
    pub fn new(backend: B, defaults: NotificationDefaults, bus: EventBus) -> Self {
        let permission = if backend.is_supported() {
            backend.permission()
        } else {
            Permission::Default
        };
        Self {
            backend,
            permission: Cell::new(permission),
            defaults,
            bus,
        }
    }

    /// Whether the browser supports notifications.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.backend.is_supported()
    }

    /// Permission cached from the last resolution.
    #[must_use]
    pub const fn permission_status(&self) -> Permission {
        self.permission.get()
    }

    /// Checkbox state for the live browser permission.
    #[must_use]
    pub fn control(&self) -> NotificationControl {
        let supported = self.backend.is_supported();
        let permission = if supported {
            self.backend.permission()
        } else {
            Permission::Default
        };
        NotificationControl::derive(supported, permission)
    }

    /// Ask for permission, resolving to whether notifications may be shown.
    ///
    /// Never fails: unsupported browsers, denied permissions and backend
    /// errors all resolve to `false`.
    #[allow(clippy::future_not_send)]
    pub async fn request_permission(&self) -> bool {
        if !self.backend.is_supported() {
            tracing::info!("browser does not support desktop notifications");
            return false;
        }
        match self.backend.permission() {
            Permission::Granted => {
                self.record(Permission::Granted);
                return true;
            }
            Permission::Denied => {
                self.record(Permission::Denied);
                return false;
            }
            Permission::Default => {}
        }
        match self.backend.request_permission().await {
            Ok(permission) => {
                self.record(permission);
                permission == Permission::Granted
            }
            Err(err) => {
                tracing::error!(error = %err, "notification permission request failed");
                false
            }
        }
    }

    /// Display a notification when supported and granted.
    pub fn send(&self, title: &str, request: NotificationRequest) -> Option<B::Handle> {
        if !self.backend.is_supported() || self.permission.get() != Permission::Granted {
            tracing::debug!(title, "notifications unavailable or not granted");
            return None;
        }
        let options = request.resolve(&self.defaults);
        match self.backend.show(title, &options) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::error!(title, error = %err, "failed to create notification");
                None
            }
        }
    }

    /// Handle the preference checkbox becoming checked.
    #[allow(clippy::future_not_send)]
    pub async fn on_preference_checked(&self) -> PreferenceOutcome {
        if self.request_permission().await {
            PreferenceOutcome::Granted
        } else {
            PreferenceOutcome::Refused(self.control())
        }
    }

    /// Show the "notifications enabled" confirmation.
    pub fn send_confirmation(&self) -> Option<B::Handle> {
        self.send(
            CONFIRMATION_TITLE,
            NotificationRequest {
                require_interaction: Some(false),
                ..NotificationRequest::with_body(CONFIRMATION_BODY)
            },
        )
    }

    fn record(&self, permission: Permission) {
        self.permission.set(permission);
        let _ = self.bus.publish(UiEvent::NotificationPermissionChanged {
            permission: permission.as_str().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeBackend {
        supported: bool,
        live: Cell<Permission>,
        answer: Result<Permission, NotificationError>,
        prompts: Cell<usize>,
        shown: RefCell<Vec<(String, NotificationOptions)>>,
        fail_show: bool,
    }

    impl FakeBackend {
        fn new(supported: bool, live: Permission) -> Self {
            Self {
                supported,
                live: Cell::new(live),
                answer: Ok(Permission::Granted),
                prompts: Cell::new(0),
                shown: RefCell::new(Vec::new()),
                fail_show: false,
            }
        }
    }

    #[async_trait(?Send)]
    impl NotificationBackend for FakeBackend {
        type Handle = usize;

        fn is_supported(&self) -> bool {
            self.supported
        }

        fn permission(&self) -> Permission {
            self.live.get()
        }

        async fn request_permission(&self) -> Result<Permission, NotificationError> {
            self.prompts.set(self.prompts.get() + 1);
            if let Ok(permission) = &self.answer {
                self.live.set(*permission);
            }
            self.answer.clone()
        }

        fn show(
            &self,
            title: &str,
            options: &NotificationOptions,
        ) -> Result<usize, NotificationError> {
            if self.fail_show {
                return Err(NotificationError::CreateFailed {
                    detail: "TypeError".into(),
                });
            }
            let mut shown = self.shown.borrow_mut();
            shown.push((title.to_string(), options.clone()));
            Ok(shown.len())
        }
    }

    fn center(backend: FakeBackend) -> NotificationCenter<FakeBackend> {
        NotificationCenter::new(backend, NotificationDefaults::default(), EventBus::new())
    }

    #[tokio::test]
    async fn unsupported_browser_resolves_false_without_prompt() {
        let center = center(FakeBackend::new(false, Permission::Default));
        assert!(!center.is_supported());
        assert!(!center.request_permission().await);
        assert_eq!(center.backend.prompts.get(), 0);
        assert_eq!(
            center.control(),
            NotificationControl {
                checked: false,
                disabled: true,
                label: "desktop notifications (not supported)",
                title: None,
            }
        );
        assert!(center.send("x", NotificationRequest::default()).is_none());
    }

    #[tokio::test]
    async fn granted_permission_short_circuits() {
        let center = center(FakeBackend::new(true, Permission::Granted));
        assert!(center.is_supported());
        assert!(center.request_permission().await);
        assert_eq!(center.backend.prompts.get(), 0);
        assert_eq!(center.permission_status(), Permission::Granted);
    }

    #[tokio::test]
    async fn denied_permission_is_not_asked_again() {
        let center = center(FakeBackend::new(true, Permission::Denied));
        assert_eq!(
            center.on_preference_checked().await,
            PreferenceOutcome::Refused(NotificationControl {
                checked: false,
                disabled: true,
                label: "desktop notifications (blocked by browser)",
                title: Some(
                    "To enable notifications, you need to change permission settings in your browser"
                ),
            })
        );
        assert_eq!(center.backend.prompts.get(), 0);
    }

    #[tokio::test]
    async fn prompt_grant_enables_confirmation() {
        let bus = EventBus::new();
        let center = NotificationCenter::new(
            FakeBackend::new(true, Permission::Default),
            NotificationDefaults::default(),
            bus.clone(),
        );
        assert_eq!(center.on_preference_checked().await, PreferenceOutcome::Granted);
        assert_eq!(center.backend.prompts.get(), 1);
        assert_eq!(
            bus.backlog_since(0).last().map(|env| env.event.clone()),
            Some(UiEvent::NotificationPermissionChanged {
                permission: "granted".into()
            })
        );

        assert_eq!(center.send_confirmation(), Some(1));
        let shown = center.backend.shown.borrow();
        let (title, options) = &shown[0];
        assert_eq!(title, CONFIRMATION_TITLE);
        assert_eq!(options.body, CONFIRMATION_BODY);
        assert_eq!(options.icon, DEFAULT_ICON);
        assert_eq!(options.badge, DEFAULT_BADGE);
        assert_eq!(options.tag, DEFAULT_TAG);
        assert!(!options.silent);
        assert!(!options.require_interaction);
    }

    #[tokio::test]
    async fn backend_error_resolves_false() {
        let mut backend = FakeBackend::new(true, Permission::Default);
        backend.answer = Err(NotificationError::RequestFailed {
            detail: "AbortError".into(),
        });
        let center = center(backend);
        assert!(!center.request_permission().await);
        assert_eq!(center.permission_status(), Permission::Default);
        assert_eq!(center.control().label, "enable desktop notifications");
    }

    #[test]
    fn send_requires_cached_grant_and_tolerates_create_errors() {
        let mut backend = FakeBackend::new(true, Permission::Granted);
        backend.fail_show = true;
        let center = center(backend);
        assert!(center.send("Race start", NotificationRequest::default()).is_none());
    }

    #[test]
    fn request_overrides_take_precedence() {
        let options = NotificationRequest {
            icon: Some("/static/images/ferrari.png".into()),
            tag: Some("race".into()),
            silent: Some(true),
            ..NotificationRequest::default()
        }
        .resolve(&NotificationDefaults::default());
        assert_eq!(options.icon, "/static/images/ferrari.png");
        assert_eq!(options.badge, DEFAULT_BADGE);
        assert_eq!(options.tag, "race");
        assert!(options.silent);
        assert_eq!(options.body, "");
    }

    #[test]
    fn control_matrix_matches_permission() {
        let granted = NotificationControl::derive(true, Permission::Granted);
        assert!(granted.checked && !granted.disabled);
        let default = NotificationControl::derive(true, Permission::Default);
        assert!(!default.checked && !default.disabled);
        assert_eq!(Permission::parse("granted"), Permission::Granted);
        assert_eq!(Permission::parse("bogus"), Permission::Default);
    }
}
