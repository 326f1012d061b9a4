//! Key-value persistence for UI preferences.
//!
//! # Design
//! - Widgets talk to a [`PreferenceStore`] seam so the core stays DOM-free.
//! - Values are plain strings (`"true"`/`"false"`, theme ids) to stay
//!   readable by the page's own scripts.
//! - Reads never fail loudly: an unavailable store or a missing key yields
//!   the widget default.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Persisted table collapse state.
pub const TABLE_COLLAPSED_KEY: &str = "tableCollapsed";
/// Persisted desktop sidebar collapse state.
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebarCollapsed";
/// Persisted theme identifier.
pub const THEME_KEY: &str = "theme";
/// Session flag marking an in-flight navigation.
pub const NAVIGATING_KEY: &str = "isNavigating";

/// Error raised by a backing store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The store cannot be reached (private mode, disabled storage).
    #[error("storage unavailable")]
    Unavailable,
    /// The store refused a write (quota, security policy).
    #[error("storage write rejected")]
    WriteRejected {
        /// Key being written.
        key: String,
        /// Browser-provided detail.
        detail: String,
    },
}

/// String key-value store backing persisted preferences.
pub trait PreferenceStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the store is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the store is unavailable or rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` from the store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the store is unavailable.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Read a string preference, treating any failure as absent.
pub fn load_string(store: &dyn PreferenceStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, error = %err, "preference read failed; using default");
            None
        }
    }
}

/// Read a boolean preference; only the exact string `"true"` is truthy.
pub fn load_flag(store: &dyn PreferenceStore, key: &str) -> bool {
    load_string(store, key).is_some_and(|value| value == "true")
}

/// Write a string preference, logging and swallowing failures.
pub fn persist_string(store: &dyn PreferenceStore, key: &str, value: &str) {
    if let Err(err) = store.set(key, value) {
        tracing::warn!(key, error = %err, "preference write failed");
    }
}

/// Write a boolean preference as `"true"`/`"false"`.
pub fn persist_flag(store: &dyn PreferenceStore, key: &str, value: bool) {
    persist_string(store, key, if value { "true" } else { "false" });
}

/// Remove a preference, logging and swallowing failures.
pub fn clear(store: &dyn PreferenceStore, key: &str) {
    if let Err(err) = store.remove(key) {
        tracing::warn!(key, error = %err, "preference delete failed");
    }
}

/// In-memory store used natively and as a fallback when browser storage is missing.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    unavailable: bool,
}

impl MemoryStore {
    /// Empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that fails every operation, mirroring disabled browser storage.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            entries: Rc::default(),
            unavailable: true,
        }
    }

    /// Store seeded with the given entries.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        store
    }

    /// Snapshot of the raw value for assertions and diagnostics.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
