use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::catalog::domain::{Bank, CardId, CreditCard};
use crate::catalog::repository::{AssetError, AssetStore, CatalogRepository, RepositoryError};
use crate::catalog::test_support::{bank, card};
use crate::catalog::{catalog_router, CatalogService};
use crate::config::CatalogConfig;

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) cards: Arc<Mutex<Vec<CreditCard>>>,
    pub(super) banks: Arc<Mutex<Vec<Bank>>>,
}

impl CatalogRepository for MemoryRepository {
    fn list_cards(&self) -> Result<Vec<CreditCard>, RepositoryError> {
        Ok(self.cards.lock().expect("card mutex poisoned").clone())
    }

    fn fetch_card(&self, id: &CardId) -> Result<Option<CreditCard>, RepositoryError> {
        let guard = self.cards.lock().expect("card mutex poisoned");
        Ok(guard.iter().find(|card| &card.id == id).cloned())
    }

    fn insert_card(&self, card: CreditCard) -> Result<CreditCard, RepositoryError> {
        let mut guard = self.cards.lock().expect("card mutex poisoned");
        if guard.iter().any(|existing| existing.id == card.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(card.clone());
        Ok(card)
    }

    fn update_card(&self, card: CreditCard) -> Result<(), RepositoryError> {
        let mut guard = self.cards.lock().expect("card mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == card.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = card;
        Ok(())
    }

    fn delete_card(&self, id: &CardId) -> Result<(), RepositoryError> {
        let mut guard = self.cards.lock().expect("card mutex poisoned");
        let before = guard.len();
        guard.retain(|card| &card.id != id);
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }

    fn list_banks(&self) -> Result<Vec<Bank>, RepositoryError> {
        Ok(self.banks.lock().expect("bank mutex poisoned").clone())
    }

    fn find_bank_by_name(&self, name: &str) -> Result<Option<Bank>, RepositoryError> {
        let guard = self.banks.lock().expect("bank mutex poisoned");
        Ok(guard.iter().find(|bank| bank.name == name).cloned())
    }

    fn insert_bank(&self, bank: Bank) -> Result<Bank, RepositoryError> {
        self.banks
            .lock()
            .expect("bank mutex poisoned")
            .push(bank.clone());
        Ok(bank)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssets {
    keys: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemoryAssets {
    pub(super) fn stored(&self) -> Vec<(String, String)> {
        self.keys.lock().expect("asset mutex poisoned").clone()
    }
}

impl AssetStore for MemoryAssets {
    fn put(&self, key: &str, content_type: &str, _bytes: Vec<u8>) -> Result<String, AssetError> {
        self.keys
            .lock()
            .expect("asset mutex poisoned")
            .push((key.to_string(), content_type.to_string()));
        Ok(format!("https://assets.example/{key}"))
    }
}

pub(super) struct UnavailableRepository;

impl CatalogRepository for UnavailableRepository {
    fn list_cards(&self) -> Result<Vec<CreditCard>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn fetch_card(&self, _id: &CardId) -> Result<Option<CreditCard>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn insert_card(&self, _card: CreditCard) -> Result<CreditCard, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn update_card(&self, _card: CreditCard) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn delete_card(&self, _id: &CardId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn list_banks(&self) -> Result<Vec<Bank>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn find_bank_by_name(&self, _name: &str) -> Result<Option<Bank>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn insert_bank(&self, _bank: Bank) -> Result<Bank, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }
}

/// Two banks and three cards; the middle card is hidden.
pub(super) fn seeded_repository() -> MemoryRepository {
    let repository = MemoryRepository::default();
    repository
        .insert_bank(bank("bank-vcb", "Vietcombank"))
        .expect("bank inserted");
    repository
        .insert_bank(bank("bank-tcb", "Techcombank"))
        .expect("bank inserted");

    let mut first = card("card-a", "Vietcombank Cashback");
    first.bank_id = crate::catalog::BankId("bank-vcb".to_string());
    first.tags = vec!["high-cashback".to_string()];
    first.cashback_percent = 2.0;

    let mut hidden = card("card-b", "Retired Card");
    hidden.bank_id = crate::catalog::BankId("bank-tcb".to_string());
    hidden.is_visible = false;

    let mut third = card("card-c", "Techcombank Travel");
    third.bank_id = crate::catalog::BankId("bank-tcb".to_string());
    third.tags = vec!["travel-benefits".to_string()];

    for entry in [first, hidden, third] {
        repository.insert_card(entry).expect("card inserted");
    }
    repository
}

pub(super) fn build_service() -> (
    CatalogService<MemoryRepository, MemoryAssets>,
    MemoryRepository,
    MemoryAssets,
) {
    let repository = seeded_repository();
    let assets = MemoryAssets::default();
    let service = CatalogService::new(
        Arc::new(repository.clone()),
        Arc::new(assets.clone()),
        CatalogConfig::default(),
    );
    (service, repository, assets)
}

pub(super) fn catalog_router_with_service(
    service: CatalogService<MemoryRepository, MemoryAssets>,
) -> axum::Router {
    catalog_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
