use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// `đ` has no canonical decomposition, so it is folded by hand.
fn fold(ch: char) -> char {
    match ch {
        'đ' => 'd',
        other => other,
    }
}

/// URL slug for a card name: accents stripped after NFD decomposition, anything outside
/// `[a-z0-9-]` dropped, whitespace and hyphen runs collapsed to one hyphen.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    let lowered = name.to_lowercase();
    let folded = lowered
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(fold);

    for ch in folded {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
        }
    }

    slug
}

/// Appends referral tracking parameters, reusing an existing query string.
pub fn affiliate_url(base_url: &str, slug: &str, utm_source: &str) -> String {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        return String::new();
    }

    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}utm_source={utm_source}&utm_medium=referral&utm_campaign={slug}")
}
