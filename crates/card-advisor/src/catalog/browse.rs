use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{BankId, CreditCard};

/// Ordering options offered on the catalog page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Catalog order as returned by the store.
    #[default]
    Popular,
    Cashback,
    Interest,
    Limit,
    Name,
}

/// Search, issuer filter, and ordering for the browse page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub bank_id: Option<BankId>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl BrowseQuery {
    fn matches(&self, card: &CreditCard) -> bool {
        if let Some(bank_id) = &self.bank_id {
            if &card.bank_id != bank_id {
                return false;
            }
        }

        let Some(term) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
        else {
            return true;
        };

        let term = term.to_lowercase();
        card.name.to_lowercase().contains(&term)
            || card.short_description.to_lowercase().contains(&term)
            || card.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
    }

    /// Filters then sorts. Every sort is stable so equal keys keep catalog order.
    pub fn apply(&self, cards: Vec<CreditCard>) -> Vec<CreditCard> {
        let mut filtered: Vec<CreditCard> =
            cards.into_iter().filter(|card| self.matches(card)).collect();

        match self.sort {
            SortOrder::Popular => {}
            SortOrder::Cashback => filtered.sort_by(|a, b| {
                b.cashback_percent
                    .partial_cmp(&a.cashback_percent)
                    .unwrap_or(Ordering::Equal)
            }),
            SortOrder::Interest => filtered.sort_by(|a, b| {
                a.interest_rate_percent
                    .partial_cmp(&b.interest_rate_percent)
                    .unwrap_or(Ordering::Equal)
            }),
            SortOrder::Limit => filtered.sort_by(|a, b| b.max_limit_vnd.cmp(&a.max_limit_vnd)),
            SortOrder::Name => {
                filtered.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
        }

        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::card;

    fn sample() -> Vec<CreditCard> {
        let mut alpha = card("a", "Zeta Travel");
        alpha.bank_id = BankId("vcb".to_string());
        alpha.cashback_percent = 1.0;
        alpha.interest_rate_percent = 18.0;
        alpha.max_limit_vnd = 200_000_000;
        alpha.tags = vec!["travel-benefits".to_string()];

        let mut beta = card("b", "alpha Cashback");
        beta.bank_id = BankId("tcb".to_string());
        beta.cashback_percent = 2.0;
        beta.interest_rate_percent = 28.0;
        beta.max_limit_vnd = 50_000_000;
        beta.short_description = "Great for groceries".to_string();

        let mut gamma = card("c", "Mid Fuel");
        gamma.bank_id = BankId("vcb".to_string());
        gamma.cashback_percent = 2.0;
        gamma.interest_rate_percent = 15.0;
        gamma.max_limit_vnd = 100_000_000;
        gamma.tags = vec!["fuel-savings".to_string()];

        vec![alpha, beta, gamma]
    }

    fn ids(cards: &[CreditCard]) -> Vec<&str> {
        cards.iter().map(|card| card.id.0.as_str()).collect()
    }

    #[test]
    fn default_query_keeps_catalog_order() {
        let result = BrowseQuery::default().apply(sample());
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn search_covers_name_description_and_tags() {
        let mut query = BrowseQuery {
            search: Some("TRAVEL".to_string()),
            ..BrowseQuery::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec!["a"]);

        query.search = Some("groceries".to_string());
        assert_eq!(ids(&query.apply(sample())), vec!["b"]);

        query.search = Some("fuel-sav".to_string());
        assert_eq!(ids(&query.apply(sample())), vec!["c"]);

        query.search = Some("   ".to_string());
        assert_eq!(query.apply(sample()).len(), 3);
    }

    #[test]
    fn bank_filter_combines_with_sort() {
        let query = BrowseQuery {
            search: None,
            bank_id: Some(BankId("vcb".to_string())),
            sort: SortOrder::Interest,
        };
        assert_eq!(ids(&query.apply(sample())), vec!["c", "a"]);
    }

    #[test]
    fn sorts_are_stable_and_directional() {
        let by = |sort| BrowseQuery {
            sort,
            ..BrowseQuery::default()
        };
        assert_eq!(ids(&by(SortOrder::Cashback).apply(sample())), vec!["b", "c", "a"]);
        assert_eq!(ids(&by(SortOrder::Limit).apply(sample())), vec!["a", "c", "b"]);
        assert_eq!(ids(&by(SortOrder::Name).apply(sample())), vec!["b", "c", "a"]);
    }
}
