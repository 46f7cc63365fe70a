use card_advisor::catalog::{
    AssetError, AssetStore, Bank, CardId, CatalogImportError, CatalogImporter, CatalogRepository,
    CatalogSnapshot, CreditCard, RepositoryError,
};
use card_advisor::chat::{ChatMessage, ConversationLog, ConversationLogError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

const SAMPLE_CATALOG: &str = include_str!("../../../data/sample_catalog.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Cards keep insertion order so the unscored path reflects catalog order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCatalogRepository {
    cards: Arc<Mutex<Vec<CreditCard>>>,
    banks: Arc<Mutex<Vec<Bank>>>,
}

impl CatalogRepository for InMemoryCatalogRepository {
    fn list_cards(&self) -> Result<Vec<CreditCard>, RepositoryError> {
        let guard = self.cards.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn fetch_card(&self, id: &CardId) -> Result<Option<CreditCard>, RepositoryError> {
        let guard = self.cards.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|card| &card.id == id).cloned())
    }

    fn insert_card(&self, card: CreditCard) -> Result<CreditCard, RepositoryError> {
        let mut guard = self.cards.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == card.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(card.clone());
        Ok(card)
    }

    fn update_card(&self, card: CreditCard) -> Result<(), RepositoryError> {
        let mut guard = self.cards.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == card.id) {
            Some(slot) => {
                *slot = card;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete_card(&self, id: &CardId) -> Result<(), RepositoryError> {
        let mut guard = self.cards.lock().expect("repository mutex poisoned");
        let position = guard
            .iter()
            .position(|card| &card.id == id)
            .ok_or(RepositoryError::NotFound)?;
        guard.remove(position);
        Ok(())
    }

    fn list_banks(&self) -> Result<Vec<Bank>, RepositoryError> {
        let guard = self.banks.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn find_bank_by_name(&self, name: &str) -> Result<Option<Bank>, RepositoryError> {
        let guard = self.banks.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|bank| bank.name == name).cloned())
    }

    fn insert_bank(&self, bank: Bank) -> Result<Bank, RepositoryError> {
        let mut guard = self.banks.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == bank.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(bank.clone());
        Ok(bank)
    }
}

/// Keeps uploaded images in memory and hands back URLs under the configured base.
#[derive(Clone)]
pub(crate) struct InMemoryAssetStore {
    base_url: String,
    objects: Arc<Mutex<HashMap<String, (String, Vec<u8>)>>>,
}

impl InMemoryAssetStore {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Arc::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn content_type(&self, key: &str) -> Option<String> {
        let guard = self.objects.lock().expect("asset mutex poisoned");
        guard.get(key).map(|(content_type, _)| content_type.clone())
    }
}

impl AssetStore for InMemoryAssetStore {
    fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String, AssetError> {
        let mut guard = self.objects.lock().expect("asset mutex poisoned");
        guard.insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(format!("{}/{}", self.base_url, key))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryConversationLog {
    messages: Arc<Mutex<Vec<ChatMessage>>>,
}

impl InMemoryConversationLog {
    #[cfg(test)]
    pub(crate) fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().expect("log mutex poisoned").clone()
    }
}

impl ConversationLog for InMemoryConversationLog {
    fn append(&self, messages: &[ChatMessage]) -> Result<(), ConversationLogError> {
        let mut guard = self.messages.lock().expect("log mutex poisoned");
        guard.extend_from_slice(messages);
        Ok(())
    }
}

/// Reads the given export, or the bundled sample catalog when none is configured.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<CatalogSnapshot, CatalogImportError> {
    match path {
        Some(path) => CatalogImporter::from_path(path),
        None => CatalogImporter::from_reader(Cursor::new(SAMPLE_CATALOG)),
    }
}
