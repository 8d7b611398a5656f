#![forbid(unsafe_code)]

//! Persisted language preference.
//!
//! The page stores a single key/value pair. [`PreferenceStore`] abstracts the
//! browser's `localStorage` so the controller can run against
//! [`MemoryStore`] in tests or when the browser refuses storage access.

use std::collections::BTreeMap;

#[cfg(feature = "tracing")]
use tracing::warn;

use crate::error::Result;
use crate::lang::Lang;

/// Key/value preference storage.
pub trait PreferenceStore {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store. Lives as long as the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value.
    #[must_use]
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_owned(), value.to_owned());
        store
    }

    /// Raw stored value, if any.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Resolve the initial language from storage.
///
/// Missing, empty, unrecognized, or unreadable values all resolve to
/// `default`.
pub fn load_language<S: PreferenceStore + ?Sized>(store: &S, key: &str, default: Lang) -> Lang {
    match store.get(key) {
        Ok(Some(raw)) if !raw.is_empty() => match Lang::from_tag(&raw) {
            Some(lang) => lang,
            None => {
                #[cfg(feature = "tracing")]
                warn!(key, value = %raw, "ignoring unknown stored language");
                default
            }
        },
        Ok(_) => default,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            warn!(key, error = %_err, "language preference unreadable");
            default
        }
    }
}

/// Persist the language. Failures are logged and otherwise ignored; the
/// in-memory language stays authoritative for the rest of the page's life.
pub fn save_language<S: PreferenceStore + ?Sized>(store: &mut S, key: &str, lang: Lang) -> bool {
    match store.set(key, lang.tag()) {
        Ok(()) => true,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            warn!(key, error = %_err, "language preference not saved");
            false
        }
    }
}
