//! `localStorage`/`sessionStorage` adapters for [`PreferenceStore`].

use crate::core::preferences::{MemoryStore, PreferenceStore, StorageError};
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Which browser storage area to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StorageArea {
    Local,
    Session,
}

impl StorageArea {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Session => "session",
        }
    }
}

/// Preference store backed by a Web Storage area.
pub(crate) struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    /// Open `area`, falling back to an in-memory store when the browser
    /// refuses access.
    pub(crate) fn open(area: StorageArea) -> Rc<dyn PreferenceStore> {
        let window = gloo::utils::window();
        let storage = match area {
            StorageArea::Local => window.local_storage(),
            StorageArea::Session => window.session_storage(),
        };
        match storage {
            Ok(Some(storage)) => Rc::new(Self { storage }),
            Ok(None) | Err(_) => {
                tracing::warn!(area = area.as_str(), "web storage unavailable; preferences will not persist");
                Rc::new(MemoryStore::new())
            }
        }
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl PreferenceStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StorageError::WriteRejected {
                key: key.to_string(),
                detail: describe(&err),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|_| StorageError::Unavailable)
    }
}
