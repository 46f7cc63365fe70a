use serde::{Deserialize, Serialize};

use super::config::ScoringWeights;
use super::criteria::{Criterion, PreferenceSet};
use crate::catalog::CreditCard;

/// What earned a card its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "criterion")]
pub enum ScoreFactor {
    CriterionMatch(Criterion),
    AnnualFeeWaived,
    Cashback,
    LowInterest,
    FastApproval,
}

/// Discrete contribution to a match score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: u32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub total: u32,
    pub matched_criteria: Vec<Criterion>,
    pub components: Vec<ScoreComponent>,
}

/// Approval descriptor speed bucket shared by scoring and rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApprovalSpeed {
    Fast,
    Moderate,
    Standard,
}

pub(crate) fn approval_speed(approval_time: &str) -> ApprovalSpeed {
    let text = approval_time.to_lowercase();
    let has_range = |from: char, to: char| {
        ['-', '\u{2013}']
            .iter()
            .any(|dash| text.contains(&format!("{from}{dash}{to}")))
    };

    if text.contains("fast") || text.contains("nhanh") || has_range('1', '2') {
        ApprovalSpeed::Fast
    } else if has_range('3', '5') {
        ApprovalSpeed::Moderate
    } else {
        ApprovalSpeed::Standard
    }
}

/// Fit between a card and a preference set. Each card is scored on its own; there
/// is no normalization across the catalog.
pub fn score_card(
    card: &CreditCard,
    preferences: &PreferenceSet,
    weights: &ScoringWeights,
) -> MatchBreakdown {
    let mut components = Vec::new();
    let mut matched_criteria = Vec::new();

    for criterion in preferences.criteria() {
        if criterion.matches(card) {
            matched_criteria.push(*criterion);
            components.push(ScoreComponent {
                factor: ScoreFactor::CriterionMatch(*criterion),
                points: weights.criterion_match,
                notes: format!("tagged for {}", criterion.phrase()),
            });
        }
    }

    if card.no_annual_fee {
        components.push(ScoreComponent {
            factor: ScoreFactor::AnnualFeeWaived,
            points: weights.annual_fee_waived,
            notes: "annual fee waived".to_string(),
        });
    }

    if card.cashback_percent >= weights.cashback_threshold_percent {
        components.push(ScoreComponent {
            factor: ScoreFactor::Cashback,
            points: weights.cashback_bonus,
            notes: format!(
                "cashback {:.1}% at or above {:.1}%",
                card.cashback_percent, weights.cashback_threshold_percent
            ),
        });
    }

    if card.interest_rate_percent <= weights.interest_ceiling_percent {
        components.push(ScoreComponent {
            factor: ScoreFactor::LowInterest,
            points: weights.interest_bonus,
            notes: format!(
                "interest {:.1}% within {:.1}%",
                card.interest_rate_percent, weights.interest_ceiling_percent
            ),
        });
    }

    if approval_speed(&card.approval_time) == ApprovalSpeed::Fast {
        components.push(ScoreComponent {
            factor: ScoreFactor::FastApproval,
            points: weights.fast_approval_bonus,
            notes: format!("fast approval ({})", card.approval_time.trim()),
        });
    }

    let total = components.iter().map(|component| component.points).sum();

    MatchBreakdown {
        total,
        matched_criteria,
        components,
    }
}
