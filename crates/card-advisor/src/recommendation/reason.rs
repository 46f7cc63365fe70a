use super::criteria::Criterion;

/// Shown when a card matched none of the shopper's criteria.
pub const GENERIC_REASON: &str = "A popular card with plenty of attractive perks";

/// Shown on the unscored path, when the shopper has not picked any criteria.
pub const POPULAR_FALLBACK_REASON: &str = "A popular choice among our shoppers";

/// Human-readable justification for a matched-criteria subset.
pub fn reason_text(matched: &[Criterion]) -> String {
    let phrases: Vec<&str> = matched.iter().map(|criterion| criterion.phrase()).collect();

    match phrases.as_slice() {
        [] => GENERIC_REASON.to_string(),
        [only] => format!("Recommended because you prioritize {only}"),
        [first, second] => format!("Recommended because you prioritize {first} and {second}"),
        [leading @ .., last] => format!(
            "Recommended because you prioritize {}, and {last}",
            leading.join(", ")
        ),
    }
}
