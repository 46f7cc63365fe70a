//! Rule-based ranking of catalog cards against a shopper's stated preferences.
//!
//! Everything here is pure and synchronous: callers fetch the catalog first and the
//! recommender only reads it. Scores are raw point totals, not percentages.

mod config;
mod criteria;
mod rating;
mod reason;
mod scoring;

pub use config::ScoringWeights;
pub use criteria::{Criterion, PreferenceSet, MAX_SELECTED_CRITERIA};
pub use rating::{rate_card, MAX_RATING, MIN_RATING};
pub use reason::{reason_text, GENERIC_REASON, POPULAR_FALLBACK_REASON};
pub use scoring::{score_card, MatchBreakdown, ScoreComponent, ScoreFactor};

use serde::Serialize;

use crate::catalog::CreditCard;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Card annotated with its fit and quality for one recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCard {
    #[serde(flatten)]
    pub card: CreditCard,
    pub match_score: u32,
    pub matched_criteria: Vec<Criterion>,
    pub rating: f64,
    pub reason_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ScoreComponent>,
}

/// Which path produced a recommendation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Scored,
    PopularFallback,
    /// Catalog could not be read; no cards are offered.
    CatalogUnavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub source: RecommendationSource,
    pub criteria: Vec<Criterion>,
    pub cards: Vec<ScoredCard>,
}

/// Stateless ranker; safe to share across requests.
#[derive(Debug, Clone)]
pub struct Recommender {
    weights: ScoringWeights,
    limit: usize,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(ScoringWeights::default(), DEFAULT_SUGGESTION_LIMIT)
    }
}

impl Recommender {
    pub fn new(weights: ScoringWeights, limit: usize) -> Self {
        Self {
            weights,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Ranks visible cards. An empty preference set takes the unscored path and
    /// returns the first cards in catalog order.
    pub fn recommend(&self, preferences: &PreferenceSet, catalog: &[CreditCard]) -> Recommendations {
        if preferences.is_empty() {
            return Recommendations {
                source: RecommendationSource::PopularFallback,
                criteria: Vec::new(),
                cards: self.popular(catalog),
            };
        }

        let mut scored: Vec<ScoredCard> = catalog
            .iter()
            .filter(|card| card.is_visible)
            .map(|card| self.score(card, preferences))
            .collect();
        // stable: equal scores keep catalog order
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        scored.truncate(self.limit);

        Recommendations {
            source: RecommendationSource::Scored,
            criteria: preferences.criteria().to_vec(),
            cards: scored,
        }
    }

    /// Scores a single card without ranking it.
    pub fn score(&self, card: &CreditCard, preferences: &PreferenceSet) -> ScoredCard {
        let breakdown = score_card(card, preferences, &self.weights);
        ScoredCard {
            card: card.clone(),
            match_score: breakdown.total,
            reason_text: reason_text(&breakdown.matched_criteria),
            matched_criteria: breakdown.matched_criteria,
            rating: rate_card(card),
            components: breakdown.components,
        }
    }

    /// Empty answer for when the catalog cannot be read. The selection is echoed
    /// back so the page keeps its chips.
    pub fn unavailable(&self, preferences: &PreferenceSet) -> Recommendations {
        Recommendations {
            source: RecommendationSource::CatalogUnavailable,
            criteria: preferences.criteria().to_vec(),
            cards: Vec::new(),
        }
    }

    /// Unscored path: the leading visible cards with a generic justification.
    pub fn popular(&self, catalog: &[CreditCard]) -> Vec<ScoredCard> {
        catalog
            .iter()
            .filter(|card| card.is_visible)
            .take(self.limit)
            .map(popular_card)
            .collect()
    }
}

fn popular_card(card: &CreditCard) -> ScoredCard {
    ScoredCard {
        card: card.clone(),
        match_score: 0,
        matched_criteria: Vec::new(),
        rating: rate_card(card),
        reason_text: POPULAR_FALLBACK_REASON.to_string(),
        components: Vec::new(),
    }
}
