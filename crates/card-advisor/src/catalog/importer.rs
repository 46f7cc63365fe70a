use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::domain::{coerce_number, parse_amount, Bank, BankId, CardId, CreditCard};
use super::slug::generate_slug;

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read catalog export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Banks and cards parsed from a spreadsheet export, ready to seed a repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub banks: Vec<Bank>,
    pub cards: Vec<CreditCard>,
}

pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CatalogSnapshot, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Rows sharing a slug with an earlier row are skipped; banks are deduplicated
    /// by display name.
    pub fn from_reader<R: Read>(reader: R) -> Result<CatalogSnapshot, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut banks: BTreeMap<String, Bank> = BTreeMap::new();
        let mut bank_order: Vec<String> = Vec::new();
        let mut seen_slugs: HashSet<String> = HashSet::new();
        let mut cards = Vec::new();
        let now = Utc::now();

        for row in csv_reader.deserialize::<CatalogRow>() {
            let row = row?;
            let slug = generate_slug(&row.name);
            if slug.is_empty() || !seen_slugs.insert(slug.clone()) {
                debug!(card_name = %row.name, "skipping catalog row without a unique slug");
                continue;
            }

            let bank_name = row.bank.trim().to_string();
            let bank = banks.entry(bank_name.clone()).or_insert_with(|| {
                bank_order.push(bank_name.clone());
                Bank {
                    id: BankId(format!("bank-{}", generate_slug(&bank_name))),
                    name: bank_name.clone(),
                    code: String::new(),
                    logo_url: String::new(),
                    website_url: String::new(),
                    created_at: now,
                    updated_at: now,
                }
            });

            cards.push(CreditCard {
                id: CardId(row.id.unwrap_or_else(|| slug.clone())),
                name: row.name,
                slug,
                bank_id: bank.id.clone(),
                bank: None,
                image_url: row.image_url.unwrap_or_default(),
                logo_url: row.logo_url.unwrap_or_default(),
                short_description: row.short_description.unwrap_or_default(),
                detailed_benefits: String::new(),
                highlight_benefits: split_list(row.highlight_benefits.as_deref()),
                cashback_percent: row.cashback_percent.as_deref().map_or(0.0, coerce_number),
                no_annual_fee: parse_flag(row.no_annual_fee.as_deref(), false),
                interest_rate_percent: row
                    .interest_rate_percent
                    .as_deref()
                    .map_or(0.0, coerce_number),
                max_limit_vnd: row.max_limit_vnd.as_deref().map_or(0, parse_amount),
                approval_time: row.approval_time.unwrap_or_default(),
                tags: split_list(row.tags.as_deref()),
                affiliate_url: row.affiliate_url.unwrap_or_default(),
                is_visible: parse_flag(row.is_visible.as_deref(), true),
                created_at: now,
                updated_at: now,
            });
        }

        let banks = bank_order
            .into_iter()
            .filter_map(|name| banks.remove(&name))
            .collect();

        Ok(CatalogSnapshot { banks, cards })
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    name: String,
    bank: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    short_description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cashback_percent: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    no_annual_fee: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    interest_rate_percent: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    max_limit_vnd: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    approval_time: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tags: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    highlight_benefits: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    affiliate_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_visible: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    image_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    logo_url: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|value| value.trim().to_ascii_lowercase()) {
        Some(value) => matches!(value.as_str(), "true" | "yes" | "y" | "1" | "x"),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "name,bank,short_description,cashback_percent,no_annual_fee,interest_rate_percent,max_limit_vnd,approval_time,tags,highlight_benefits,affiliate_url,is_visible\n";

    #[test]
    fn rows_become_cards_with_shared_banks() {
        let csv = format!(
            "{HEADER}\
Cashback Plus,Techcombank,Everyday cashback,2%,yes,18,\"50,000,000\",1-2 ngày,high-cashback;online-shopping,2% cashback;Free first year,https://tcb.example,\n\
Travel Elite,Techcombank,Lounge access,0.5,no,26,200000000,7 ngày,travel-benefits,,https://tcb.example/travel,false\n\
Fuel Saver,BIDV,,abc,,,,,fuel-savings,,,\n"
        );

        let snapshot = CatalogImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(snapshot.banks.len(), 2);
        assert_eq!(snapshot.banks[0].name, "Techcombank");
        assert_eq!(snapshot.banks[0].id, BankId("bank-techcombank".to_string()));
        assert_eq!(snapshot.banks[1].name, "BIDV");

        let plus = &snapshot.cards[0];
        assert_eq!(plus.id, CardId("cashback-plus".to_string()));
        assert_eq!(plus.cashback_percent, 2.0);
        assert!(plus.no_annual_fee);
        assert_eq!(plus.max_limit_vnd, 50_000_000);
        assert_eq!(plus.tags, vec!["high-cashback", "online-shopping"]);
        assert_eq!(plus.highlight_benefits.len(), 2);
        assert!(plus.is_visible);

        let travel = &snapshot.cards[1];
        assert!(!travel.is_visible);
        assert!(!travel.no_annual_fee);

        let fuel = &snapshot.cards[2];
        assert_eq!(fuel.cashback_percent, 0.0);
        assert_eq!(fuel.interest_rate_percent, 0.0);
        assert_eq!(fuel.bank_id, BankId("bank-bidv".to_string()));
    }

    #[test]
    fn duplicate_names_keep_first_row() {
        let csv = format!(
            "{HEADER}\
Cashback Plus,Techcombank,first,2,yes,18,0,,,,,\n\
Cashback  plus,VPBank,second,1,no,20,0,,,,,\n"
        );

        let snapshot = CatalogImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(snapshot.cards.len(), 1);
        assert_eq!(snapshot.cards[0].short_description, "first");
        assert_eq!(snapshot.banks.len(), 1);
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = CatalogImporter::from_path("./does-not-exist.csv").expect_err("io error");
        assert!(matches!(error, CatalogImportError::Io(_)));
    }
}
