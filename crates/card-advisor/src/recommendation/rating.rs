use super::scoring::{approval_speed, ApprovalSpeed};
use crate::catalog::CreditCard;

const TIER_ONE_ISSUERS: [&str; 2] = ["Vietcombank", "BIDV"];
const TIER_TWO_ISSUERS: [&str; 2] = ["Techcombank", "VietinBank"];

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

fn issuer_reputation(bank_name: Option<&str>) -> f64 {
    let Some(name) = bank_name else {
        return 0.6;
    };

    if TIER_ONE_ISSUERS.iter().any(|issuer| name.contains(issuer)) {
        1.0
    } else if TIER_TWO_ISSUERS.iter().any(|issuer| name.contains(issuer)) {
        0.8
    } else {
        0.6
    }
}

fn cashback_tier(percent: f64) -> f64 {
    if percent >= 2.0 {
        1.0
    } else if percent >= 1.5 {
        0.8
    } else if percent >= 1.0 {
        0.6
    } else {
        0.3
    }
}

fn interest_tier(percent: f64) -> f64 {
    if percent <= 15.0 {
        1.0
    } else if percent <= 20.0 {
        0.8
    } else if percent <= 25.0 {
        0.6
    } else {
        0.3
    }
}

/// Fee waiver and approval speed share one quarter of the rating, averaged.
fn fee_and_approval(no_annual_fee: bool, approval_time: &str) -> f64 {
    let fee = if no_annual_fee { 1.0 } else { 0.3 };
    let approval = match approval_speed(approval_time) {
        ApprovalSpeed::Fast => 1.0,
        ApprovalSpeed::Moderate => 0.7,
        ApprovalSpeed::Standard => 0.5,
    };
    (fee + approval) / 2.0
}

/// Card quality on a one-to-five scale with one decimal, independent of what the
/// shopper asked for.
pub fn rate_card(card: &CreditCard) -> f64 {
    let slots = [
        issuer_reputation(card.bank_name()),
        cashback_tier(card.cashback_percent),
        interest_tier(card.interest_rate_percent),
        fee_and_approval(card.no_annual_fee, &card.approval_time),
    ];

    let blended = slots.iter().sum::<f64>() / slots.len() as f64;
    let rounded = (blended * MAX_RATING * 10.0).round() / 10.0;
    rounded.clamp(MIN_RATING, MAX_RATING)
}
