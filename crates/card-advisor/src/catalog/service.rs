use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::browse::BrowseQuery;
use super::domain::{Bank, BankId, CardDraft, CardId, CatalogStats, CreditCard};
use super::importer::CatalogSnapshot;
use super::repository::{AssetError, AssetKind, AssetStore, CatalogRepository, RepositoryError};
use super::slug::{affiliate_url, generate_slug};
use super::validation::ValidationErrors;
use crate::config::CatalogConfig;

/// Service composing the catalog repository, asset storage, and admin rules.
pub struct CatalogService<R, S> {
    repository: Arc<R>,
    assets: Arc<S>,
    config: CatalogConfig,
}

static CARD_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static BANK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_card_id() -> CardId {
    let id = CARD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CardId(format!("card-{id:06}"))
}

fn next_bank_id() -> BankId {
    let id = BANK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BankId(format!("bank-{id:06}"))
}

impl<R, S> CatalogService<R, S>
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    pub fn new(repository: Arc<R>, assets: Arc<S>, config: CatalogConfig) -> Self {
        Self {
            repository,
            assets,
            config,
        }
    }

    /// Visible cards in catalog order with their issuing bank attached.
    pub fn visible_cards(&self) -> Result<Vec<CreditCard>, CatalogServiceError> {
        let cards = self
            .repository
            .list_cards()?
            .into_iter()
            .filter(|card| card.is_visible)
            .collect();
        self.with_banks(cards)
    }

    pub fn browse(&self, query: &BrowseQuery) -> Result<Vec<CreditCard>, CatalogServiceError> {
        Ok(query.apply(self.visible_cards()?))
    }

    pub fn banks(&self) -> Result<Vec<Bank>, CatalogServiceError> {
        let mut banks = self.repository.list_banks()?;
        banks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(banks)
    }

    /// Every card, hidden ones included, newest first.
    pub fn all_cards(&self) -> Result<Vec<CreditCard>, CatalogServiceError> {
        let mut cards = self.with_banks(self.repository.list_cards()?)?;
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cards)
    }

    pub fn get(&self, id: &CardId) -> Result<CreditCard, CatalogServiceError> {
        let card = self
            .repository
            .fetch_card(id)?
            .ok_or(RepositoryError::NotFound)?;
        let mut resolved = self.with_banks(vec![card])?;
        resolved.pop().ok_or(CatalogServiceError::Repository(RepositoryError::NotFound))
    }

    /// Validate the admin form, resolve or create the bank, and store the card.
    pub fn create_card(&self, draft: CardDraft) -> Result<CreditCard, CatalogServiceError> {
        draft.validate()?;

        let slug = generate_slug(&draft.name);
        if slug.is_empty() {
            return Err(CatalogServiceError::EmptySlug(draft.name));
        }
        if self
            .repository
            .list_cards()?
            .iter()
            .any(|card| card.slug == slug)
        {
            return Err(CatalogServiceError::DuplicateSlug(slug));
        }

        let bank = self.find_or_create_bank(draft.bank_name.trim())?;
        let now = Utc::now();

        let card = CreditCard {
            id: next_card_id(),
            affiliate_url: affiliate_url(&draft.affiliate_url, &slug, &self.config.utm_source),
            name: draft.name.trim().to_string(),
            slug,
            bank_id: bank.id.clone(),
            bank: None,
            image_url: draft.image_url,
            logo_url: draft.logo_url,
            short_description: draft.short_description,
            detailed_benefits: draft.detailed_benefits,
            highlight_benefits: draft
                .highlight_benefits
                .into_iter()
                .filter(|benefit| !benefit.trim().is_empty())
                .collect(),
            cashback_percent: draft.cashback_percent,
            no_annual_fee: draft.no_annual_fee,
            interest_rate_percent: draft.interest_rate_percent,
            max_limit_vnd: draft.max_limit_vnd,
            approval_time: draft.approval_time,
            tags: draft.tags,
            is_visible: draft.is_visible,
            created_at: now,
            updated_at: now,
        };

        let mut stored = self.repository.insert_card(card)?;
        info!(card_id = %stored.id.0, slug = %stored.slug, bank = %bank.name, "card created");
        stored.bank = Some(bank);
        Ok(stored)
    }

    pub fn set_visibility(
        &self,
        id: &CardId,
        visible: bool,
    ) -> Result<CreditCard, CatalogServiceError> {
        let mut card = self
            .repository
            .fetch_card(id)?
            .ok_or(RepositoryError::NotFound)?;
        card.is_visible = visible;
        card.updated_at = Utc::now();
        self.repository.update_card(card.clone())?;
        info!(card_id = %id.0, visible, "card visibility changed");
        Ok(card)
    }

    pub fn toggle_visibility(&self, id: &CardId) -> Result<CreditCard, CatalogServiceError> {
        let current = self
            .repository
            .fetch_card(id)?
            .ok_or(RepositoryError::NotFound)?;
        self.set_visibility(id, !current.is_visible)
    }

    pub fn delete_card(&self, id: &CardId) -> Result<(), CatalogServiceError> {
        self.repository.delete_card(id)?;
        info!(card_id = %id.0, "card deleted");
        Ok(())
    }

    pub fn stats(&self) -> Result<CatalogStats, CatalogServiceError> {
        let cards = self.repository.list_cards()?;
        Ok(CatalogStats {
            total_cards: cards.len(),
            visible_cards: cards.iter().filter(|card| card.is_visible).count(),
        })
    }

    /// Stores an uploaded image under a timestamped key and returns its public URL.
    pub fn upload_asset(
        &self,
        kind: AssetKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, CatalogServiceError> {
        if bytes.is_empty() {
            return Err(AssetError::Empty.into());
        }

        let content_type = mime_guess::from_path(file_name).first_or_octet_stream();
        if content_type.type_() != mime::IMAGE {
            return Err(AssetError::UnsupportedType(content_type.to_string()).into());
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("bin")
            .to_ascii_lowercase();
        let key = format!(
            "{}_{}.{}",
            kind.prefix(),
            Utc::now().timestamp_millis(),
            extension
        );

        let url = self
            .assets
            .put(&key, content_type.essence_str(), bytes)?;
        info!(%key, "asset uploaded");
        Ok(url)
    }

    /// Loads an imported snapshot, skipping banks whose name is already present.
    pub fn seed(&self, snapshot: CatalogSnapshot) -> Result<usize, CatalogServiceError> {
        let mut bank_ids: HashMap<BankId, BankId> = HashMap::new();
        for bank in snapshot.banks {
            let stored = match self.repository.find_bank_by_name(&bank.name)? {
                Some(existing) => existing,
                None => self.repository.insert_bank(bank.clone())?,
            };
            bank_ids.insert(bank.id, stored.id);
        }

        let mut inserted = 0;
        for mut card in snapshot.cards {
            if let Some(stored_id) = bank_ids.get(&card.bank_id) {
                card.bank_id = stored_id.clone();
            }
            match self.repository.insert_card(card) {
                Ok(_) => inserted += 1,
                Err(RepositoryError::Conflict) => {
                    warn!("skipping seeded card that already exists");
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!(inserted, "catalog seeded");
        Ok(inserted)
    }

    fn find_or_create_bank(&self, name: &str) -> Result<Bank, CatalogServiceError> {
        if let Some(bank) = self.repository.find_bank_by_name(name)? {
            return Ok(bank);
        }

        let now = Utc::now();
        let bank = self.repository.insert_bank(Bank {
            id: next_bank_id(),
            name: name.to_string(),
            code: String::new(),
            logo_url: String::new(),
            website_url: String::new(),
            created_at: now,
            updated_at: now,
        })?;
        info!(bank_id = %bank.id.0, bank_name = name, "bank created");
        Ok(bank)
    }

    fn with_banks(&self, mut cards: Vec<CreditCard>) -> Result<Vec<CreditCard>, CatalogServiceError> {
        let banks: HashMap<BankId, Bank> = self
            .repository
            .list_banks()?
            .into_iter()
            .map(|bank| (bank.id.clone(), bank))
            .collect();

        for card in &mut cards {
            card.bank = banks.get(&card.bank_id).cloned();
        }
        Ok(cards)
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("invalid card: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("a card with slug '{0}' already exists")]
    DuplicateSlug(String),
    #[error("card name '{0}' does not produce a usable slug")]
    EmptySlug(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}
