//! Card and bank catalog: typed records, the repository seam over the hosted
//! tables, admin CRUD rules, CSV seeding, and the HTTP surface for browsing.

mod browse;
pub mod domain;
mod importer;
pub mod repository;
pub mod router;
pub mod service;
mod slug;
mod validation;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use browse::{BrowseQuery, SortOrder};
pub use domain::{
    coerce_number, parse_amount, Bank, BankId, CardDraft, CardId, CatalogStats, CreditCard,
};
pub use importer::{CatalogImportError, CatalogImporter, CatalogSnapshot};
pub use repository::{
    AssetError, AssetKind, AssetStore, CatalogRepository, RepositoryError,
};
pub use router::catalog_router;
pub use service::{CatalogService, CatalogServiceError};
pub use slug::{affiliate_url, generate_slug};
pub use validation::{
    ValidationErrors, MAX_CASHBACK_PERCENT, MAX_HIGHLIGHT_BENEFITS, MAX_INTEREST_PERCENT,
};
