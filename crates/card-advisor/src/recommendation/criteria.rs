use serde::{Deserialize, Serialize};

use crate::catalog::CreditCard;

/// Upper bound on how many criteria a shopper may select at once.
pub const MAX_SELECTED_CRITERIA: usize = 3;

/// Fixed, user-facing preference categories offered on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criterion {
    HighCashback,
    NoAnnualFee,
    TravelBenefits,
    DiningRewards,
    OnlineShopping,
    FuelSavings,
    #[serde(rename = "installment-0")]
    ZeroInterestInstallment,
    PremiumService,
}

impl Criterion {
    pub const ALL: [Criterion; 8] = [
        Criterion::HighCashback,
        Criterion::NoAnnualFee,
        Criterion::TravelBenefits,
        Criterion::DiningRewards,
        Criterion::OnlineShopping,
        Criterion::FuelSavings,
        Criterion::ZeroInterestInstallment,
        Criterion::PremiumService,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Criterion::HighCashback => "high-cashback",
            Criterion::NoAnnualFee => "no-annual-fee",
            Criterion::TravelBenefits => "travel-benefits",
            Criterion::DiningRewards => "dining-rewards",
            Criterion::OnlineShopping => "online-shopping",
            Criterion::FuelSavings => "fuel-savings",
            Criterion::ZeroInterestInstallment => "installment-0",
            Criterion::PremiumService => "premium-service",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|criterion| criterion.slug().eq_ignore_ascii_case(needle))
    }

    /// Card tags that satisfy this criterion. The catalog vocabulary is richer than
    /// the criteria list, so one criterion may accept several tags.
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            Criterion::HighCashback => &["high-cashback", "rewards-points"],
            Criterion::NoAnnualFee => &["no-annual-fee"],
            Criterion::TravelBenefits => &["travel-benefits"],
            Criterion::DiningRewards => &["dining-rewards"],
            Criterion::OnlineShopping => &["online-shopping"],
            Criterion::FuelSavings => &["fuel-savings"],
            Criterion::ZeroInterestInstallment => &["installment-0"],
            Criterion::PremiumService => &["premium-service"],
        }
    }

    /// True when the card carries any tag this criterion accepts.
    pub fn matches(self, card: &CreditCard) -> bool {
        self.tags().iter().any(|tag| card.has_tag(tag))
    }

    /// Phrase used inside recommendation reasons.
    pub fn phrase(self) -> &'static str {
        match self {
            Criterion::HighCashback => "high cashback",
            Criterion::NoAnnualFee => "no annual fee",
            Criterion::TravelBenefits => "travel benefits",
            Criterion::DiningRewards => "dining rewards",
            Criterion::OnlineShopping => "online shopping",
            Criterion::FuelSavings => "fuel savings",
            Criterion::ZeroInterestInstallment => "0% installment plans",
            Criterion::PremiumService => "premium service",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::HighCashback => "High cashback",
            Criterion::NoAnnualFee => "No annual fee",
            Criterion::TravelBenefits => "Travel benefits",
            Criterion::DiningRewards => "Dining rewards",
            Criterion::OnlineShopping => "Online shopping",
            Criterion::FuelSavings => "Fuel savings",
            Criterion::ZeroInterestInstallment => "0% installments",
            Criterion::PremiumService => "Premium service",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Criterion::HighCashback => "Cards returning 1.5% or more on spend",
            Criterion::NoAnnualFee => "No yearly maintenance fee",
            Criterion::TravelBenefits => "Miles, airport lounges, travel insurance",
            Criterion::DiningRewards => "Extra cashback at restaurants and food delivery",
            Criterion::OnlineShopping => "Special offers for online purchases",
            Criterion::FuelSavings => "Higher cashback at fuel stations",
            Criterion::ZeroInterestInstallment => "Large purchases split without interest",
            Criterion::PremiumService => "Concierge, golf, spa and VIP services",
        }
    }
}

/// Ordered selection of up to three distinct criteria. Order follows the
/// shopper's clicks and only matters for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Criterion>", from = "Vec<Criterion>")]
pub struct PreferenceSet {
    criteria: Vec<Criterion>,
}

impl PreferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from raw identifiers, dropping unknown values, duplicates, and
    /// anything past the selection limit.
    pub fn from_slugs<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let criteria = raw
            .into_iter()
            .filter_map(|slug| Criterion::from_slug(slug.as_ref()));
        Self::from_iter(criteria)
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.criteria.len() >= MAX_SELECTED_CRITERIA
    }

    pub fn contains(&self, criterion: Criterion) -> bool {
        self.criteria.contains(&criterion)
    }

    /// Home page selection rule: deselect when present, append while below the
    /// limit, otherwise leave the selection untouched. Returns whether it changed.
    pub fn toggle(&mut self, criterion: Criterion) -> bool {
        if let Some(position) = self.criteria.iter().position(|c| *c == criterion) {
            self.criteria.remove(position);
            true
        } else if !self.is_full() {
            self.criteria.push(criterion);
            true
        } else {
            false
        }
    }

    pub fn slugs(&self) -> Vec<&'static str> {
        self.criteria.iter().map(|criterion| criterion.slug()).collect()
    }
}

impl FromIterator<Criterion> for PreferenceSet {
    fn from_iter<T: IntoIterator<Item = Criterion>>(iter: T) -> Self {
        let mut criteria = Vec::with_capacity(MAX_SELECTED_CRITERIA);
        for criterion in iter {
            if criteria.len() == MAX_SELECTED_CRITERIA {
                break;
            }
            if !criteria.contains(&criterion) {
                criteria.push(criterion);
            }
        }
        Self { criteria }
    }
}

impl From<Vec<Criterion>> for PreferenceSet {
    fn from(value: Vec<Criterion>) -> Self {
        value.into_iter().collect()
    }
}

impl From<PreferenceSet> for Vec<Criterion> {
    fn from(value: PreferenceSet) -> Self {
        value.criteria
    }
}
