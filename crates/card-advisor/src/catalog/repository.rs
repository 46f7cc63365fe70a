use serde::{Deserialize, Serialize};

use super::domain::{Bank, CardId, CreditCard};

/// Storage abstraction over the hosted card and bank tables so the service can be
/// exercised in isolation.
pub trait CatalogRepository: Send + Sync {
    /// All cards in catalog order, with `bank` left for the caller to resolve.
    fn list_cards(&self) -> Result<Vec<CreditCard>, RepositoryError>;
    fn fetch_card(&self, id: &CardId) -> Result<Option<CreditCard>, RepositoryError>;
    fn insert_card(&self, card: CreditCard) -> Result<CreditCard, RepositoryError>;
    fn update_card(&self, card: CreditCard) -> Result<(), RepositoryError>;
    fn delete_card(&self, id: &CardId) -> Result<(), RepositoryError>;
    fn list_banks(&self) -> Result<Vec<Bank>, RepositoryError>;
    fn find_bank_by_name(&self, name: &str) -> Result<Option<Bank>, RepositoryError>;
    fn insert_bank(&self, bank: Bank) -> Result<Bank, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Which admin upload slot an asset fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Logo,
    Card,
}

impl AssetKind {
    pub fn prefix(self) -> &'static str {
        match self {
            AssetKind::Logo => "logo",
            AssetKind::Card => "card",
        }
    }
}

/// Binary blob storage returning a publicly reachable URL (bank logos, card art).
pub trait AssetStore: Send + Sync {
    fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String, AssetError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("unsupported asset type {0}; upload an image")]
    UnsupportedType(String),
    #[error("asset is empty")]
    Empty,
    #[error("asset storage unavailable: {0}")]
    Transport(String),
}
