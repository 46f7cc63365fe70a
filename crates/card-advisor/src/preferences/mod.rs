//! Shopper-side persistence: the criteria picked on the home page and the cards
//! bookmarked while browsing. Both live in a string key-value store shaped like
//! browser local storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::catalog::CardId;
use crate::recommendation::{Criterion, PreferenceSet};

pub const SELECTED_CRITERIA_KEY: &str = "selectedCriteria";
pub const SAVED_CARDS_KEY: &str = "savedCards";

/// String key-value storage owned by a single shopper session.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.insert(key.to_string(), value);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persists the home page selection under `selectedCriteria`.
pub struct PreferenceStore<K> {
    store: Arc<K>,
}

impl<K: KeyValueStore> PreferenceStore<K> {
    pub fn new(store: Arc<K>) -> Self {
        Self { store }
    }

    /// `None` when nothing was stored or the stored value is not a JSON array of
    /// strings. Unknown identifiers inside a valid array are dropped.
    pub fn load(&self) -> Option<PreferenceSet> {
        let raw = self.store.get(SELECTED_CRITERIA_KEY)?;
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(slugs) => Some(PreferenceSet::from_slugs(slugs)),
            Err(err) => {
                debug!(error = %err, "ignoring malformed stored criteria");
                None
            }
        }
    }

    pub fn save(&self, preferences: &PreferenceSet) -> Result<(), PreferenceError> {
        let encoded = serde_json::to_string(&preferences.slugs())?;
        self.store.set(SELECTED_CRITERIA_KEY, encoded);
        Ok(())
    }

    /// Applies the home page click rule and persists the result.
    pub fn toggle(&self, criterion: Criterion) -> Result<PreferenceSet, PreferenceError> {
        let mut preferences = self.load().unwrap_or_default();
        if preferences.toggle(criterion) {
            self.save(&preferences)?;
        }
        Ok(preferences)
    }
}

/// Persists bookmarked card ids under `savedCards`.
pub struct BookmarkStore<K> {
    store: Arc<K>,
}

impl<K: KeyValueStore> BookmarkStore<K> {
    pub fn new(store: Arc<K>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Vec<CardId> {
        self.store
            .get(SAVED_CARDS_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<CardId>>(&raw).ok())
            .unwrap_or_default()
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.load().contains(id)
    }

    /// Adds or removes the card; returns whether it is saved afterwards.
    pub fn toggle(&self, id: &CardId) -> Result<bool, PreferenceError> {
        let mut saved = self.load();
        let now_saved = match saved.iter().position(|existing| existing == id) {
            Some(position) => {
                saved.remove(position);
                false
            }
            None => {
                saved.push(id.clone());
                true
            }
        };
        self.store
            .set(SAVED_CARDS_KEY, serde_json::to_string(&saved)?);
        Ok(now_saved)
    }
}
