use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for issuing banks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankId(pub String);

/// Identifier wrapper for catalog cards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    pub id: BankId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Catalog entry as stored by the backend. Numeric columns are coerced on read:
/// missing, null, or unparseable values become zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub bank_id: BankId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<Bank>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub detailed_benefits: String,
    #[serde(default)]
    pub highlight_benefits: Vec<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cashback_percent: f64,
    #[serde(default)]
    pub no_annual_fee: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub interest_rate_percent: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub max_limit_vnd: u64,
    #[serde(default)]
    pub approval_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub affiliate_url: String,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl CreditCard {
    pub fn bank_name(&self) -> Option<&str> {
        self.bank.as_ref().map(|bank| bank.name.as_str())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

/// Admin form payload for a new card. The bank is referenced by display name and
/// created on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDraft {
    pub name: String,
    pub bank_name: String,
    pub short_description: String,
    #[serde(default)]
    pub detailed_benefits: String,
    #[serde(default)]
    pub highlight_benefits: Vec<String>,
    #[serde(default)]
    pub cashback_percent: f64,
    #[serde(default = "default_true")]
    pub no_annual_fee: bool,
    #[serde(default)]
    pub interest_rate_percent: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub max_limit_vnd: u64,
    #[serde(default)]
    pub approval_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub affiliate_url: String,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub image_url: String,
}

fn default_true() -> bool {
    true
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_cards: usize,
    pub visible_cards: usize,
}

/// Parses a free-form numeric cell. Anything that is not a finite, non-negative
/// number reads as zero.
pub fn coerce_number(raw: &str) -> f64 {
    let cleaned = raw.trim().trim_end_matches('%').replace(',', ".");
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let number = match value {
        Some(serde_json::Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(text)) => coerce_number(&text),
        _ => 0.0,
    };

    if number.is_finite() && number >= 0.0 {
        Ok(number)
    } else {
        Ok(0.0)
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let amount = match value {
        Some(serde_json::Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().map(|value| value.max(0.0) as u64))
            .unwrap_or(0),
        Some(serde_json::Value::String(text)) => parse_amount(&text),
        _ => 0,
    };
    Ok(amount)
}

/// Amounts are often typed with thousands separators ("50.000.000" or "50,000,000").
pub fn parse_amount(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card_json(cashback: serde_json::Value, limit: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "c-1",
            "name": "Cashback Plus",
            "bank_id": "b-1",
            "cashback_percent": cashback,
            "interest_rate_percent": null,
            "max_limit_vnd": limit,
            "is_visible": true
        })
    }

    #[test]
    fn numeric_columns_accept_numbers_and_strings() {
        let card: CreditCard =
            serde_json::from_value(card_json(json!("1.5%"), json!("50.000.000"))).unwrap();
        assert_eq!(card.cashback_percent, 1.5);
        assert_eq!(card.interest_rate_percent, 0.0);
        assert_eq!(card.max_limit_vnd, 50_000_000);

        let card: CreditCard = serde_json::from_value(card_json(json!(2), json!(1e6))).unwrap();
        assert_eq!(card.cashback_percent, 2.0);
        assert_eq!(card.max_limit_vnd, 1_000_000);
    }

    #[test]
    fn malformed_numbers_read_as_zero() {
        let card: CreditCard =
            serde_json::from_value(card_json(json!("lots"), json!({ "nested": 1 }))).unwrap();
        assert_eq!(card.cashback_percent, 0.0);
        assert_eq!(card.max_limit_vnd, 0);

        let card: CreditCard = serde_json::from_value(card_json(json!(-4.0), json!(-1))).unwrap();
        assert_eq!(card.cashback_percent, 0.0);
        assert_eq!(card.max_limit_vnd, 0);
    }

    #[test]
    fn missing_optional_columns_use_defaults() {
        let card: CreditCard = serde_json::from_value(json!({
            "id": "c-2",
            "name": "Bare",
            "bank_id": "b-1"
        }))
        .unwrap();
        assert!(card.tags.is_empty());
        assert!(!card.is_visible);
        assert!(card.bank_name().is_none());
    }

    #[test]
    fn coerce_number_handles_decimal_commas() {
        assert_eq!(coerce_number(" 1,5 "), 1.5);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number(""), 0.0);
    }
}
