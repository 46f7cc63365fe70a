use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::domain::CardDraft;

pub const MAX_CASHBACK_PERCENT: f64 = 100.0;
pub const MAX_INTEREST_PERCENT: f64 = 36.0;
pub const MAX_HIGHLIGHT_BENEFITS: usize = 5;

/// Field-keyed validation failures for the admin card form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.0.insert(field, message.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

impl std::error::Error for ValidationErrors {}

impl CardDraft {
    /// Collects every form problem at once rather than stopping at the first.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require("name", &self.name, "card name is required");
        errors.require("bank_name", &self.bank_name, "bank name is required");
        errors.require(
            "short_description",
            &self.short_description,
            "short description is required",
        );
        errors.require("affiliate_url", &self.affiliate_url, "affiliate link is required");
        errors.require(
            "logo_url",
            &self.logo_url,
            "bank logo is required (upload or link)",
        );
        errors.require(
            "image_url",
            &self.image_url,
            "card image is required (upload or link)",
        );

        if !(0.0..=MAX_CASHBACK_PERCENT).contains(&self.cashback_percent) {
            errors.0.insert(
                "cashback_percent",
                format!("cashback must be between 0 and {MAX_CASHBACK_PERCENT}%"),
            );
        }
        if !(0.0..=MAX_INTEREST_PERCENT).contains(&self.interest_rate_percent) {
            errors.0.insert(
                "interest_rate_percent",
                format!("interest rate must be between 0 and {MAX_INTEREST_PERCENT}%"),
            );
        }
        let benefits = self
            .highlight_benefits
            .iter()
            .filter(|benefit| !benefit.trim().is_empty())
            .count();
        if benefits == 0 {
            errors.0.insert(
                "highlight_benefits",
                "add at least one highlight benefit".to_string(),
            );
        } else if benefits > MAX_HIGHLIGHT_BENEFITS {
            errors.0.insert(
                "highlight_benefits",
                format!("list at most {MAX_HIGHLIGHT_BENEFITS} highlight benefits"),
            );
        }
        if self.tags.is_empty() {
            errors
                .0
                .insert("tags", "select at least one need or criterion tag".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::draft;

    #[test]
    fn complete_draft_passes() {
        assert!(draft("Cashback Plus", "Techcombank").validate().is_ok());
    }

    #[test]
    fn every_missing_field_is_reported() {
        let mut subject = draft("", " ");
        subject.short_description.clear();
        subject.affiliate_url.clear();
        subject.logo_url.clear();
        subject.image_url.clear();
        subject.highlight_benefits = vec!["  ".to_string()];
        subject.tags.clear();

        let errors = subject.validate().expect_err("draft is incomplete");
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                "affiliate_url",
                "bank_name",
                "highlight_benefits",
                "image_url",
                "logo_url",
                "name",
                "short_description",
                "tags"
            ]
        );
    }

    #[test]
    fn rates_outside_bounds_are_rejected() {
        let mut subject = draft("Cashback Plus", "Techcombank");
        subject.cashback_percent = 120.0;
        subject.interest_rate_percent = 36.5;

        let errors = subject.validate().expect_err("rates out of range");
        assert!(errors.get("cashback_percent").is_some());
        assert!(errors.get("interest_rate_percent").is_some());
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn boundary_rates_are_allowed() {
        let mut subject = draft("Cashback Plus", "Techcombank");
        subject.cashback_percent = 100.0;
        subject.interest_rate_percent = 36.0;
        assert!(subject.validate().is_ok());
    }

    #[test]
    fn benefits_are_capped_at_five() {
        let mut subject = draft("Cashback Plus", "Techcombank");
        subject.highlight_benefits = (1..=5).map(|n| format!("perk {n}")).collect();
        subject.highlight_benefits.push("   ".to_string());
        assert!(subject.validate().is_ok());

        subject.highlight_benefits.push("perk 6".to_string());
        let errors = subject.validate().expect_err("too many benefits");
        assert_eq!(
            errors.get("highlight_benefits"),
            Some("list at most 5 highlight benefits")
        );
    }
}
