use serde::{Deserialize, Serialize};

/// Point values and thresholds behind the match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub criterion_match: u32,
    pub annual_fee_waived: u32,
    pub cashback_bonus: u32,
    pub cashback_threshold_percent: f64,
    pub interest_bonus: u32,
    pub interest_ceiling_percent: f64,
    pub fast_approval_bonus: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            criterion_match: 10,
            annual_fee_waived: 5,
            cashback_bonus: 5,
            cashback_threshold_percent: 1.5,
            interest_bonus: 3,
            interest_ceiling_percent: 20.0,
            fast_approval_bonus: 3,
        }
    }
}
