use chrono::{TimeZone, Utc};

use super::domain::{Bank, BankId, CardDraft, CardId, CreditCard};

pub(crate) fn bank(id: &str, name: &str) -> Bank {
    let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Bank {
        id: BankId(id.to_string()),
        name: name.to_string(),
        code: String::new(),
        logo_url: String::new(),
        website_url: String::new(),
        created_at: stamp,
        updated_at: stamp,
    }
}

/// Visible card that earns no points: no tags, no fee waiver, low cashback, high
/// interest, slow approval.
pub(crate) fn card(id: &str, name: &str) -> CreditCard {
    let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    CreditCard {
        id: CardId(id.to_string()),
        name: name.to_string(),
        slug: id.to_string(),
        bank_id: BankId("bank-test".to_string()),
        bank: None,
        image_url: String::new(),
        logo_url: String::new(),
        short_description: String::new(),
        detailed_benefits: String::new(),
        highlight_benefits: Vec::new(),
        cashback_percent: 0.0,
        no_annual_fee: false,
        interest_rate_percent: 30.0,
        max_limit_vnd: 0,
        approval_time: "7 ngày".to_string(),
        tags: Vec::new(),
        affiliate_url: String::new(),
        is_visible: true,
        created_at: stamp,
        updated_at: stamp,
    }
}

pub(crate) fn draft(name: &str, bank_name: &str) -> CardDraft {
    CardDraft {
        name: name.to_string(),
        bank_name: bank_name.to_string(),
        short_description: "Everyday cashback card".to_string(),
        detailed_benefits: String::new(),
        highlight_benefits: vec!["2% cashback online".to_string()],
        cashback_percent: 2.0,
        no_annual_fee: true,
        interest_rate_percent: 18.0,
        max_limit_vnd: 80_000_000,
        approval_time: "1-2 ngày".to_string(),
        tags: vec!["high-cashback".to_string()],
        affiliate_url: "https://bank.example/apply".to_string(),
        is_visible: true,
        logo_url: "https://cdn.example/logo.png".to_string(),
        image_url: "https://cdn.example/card.png".to_string(),
    }
}
