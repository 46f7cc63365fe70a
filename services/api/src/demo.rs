use crate::infra::{
    load_catalog, InMemoryAssetStore, InMemoryCatalogRepository, InMemoryConversationLog,
};
use card_advisor::catalog::{
    AssetKind, CardDraft, CatalogService, CatalogSnapshot, CreditCard,
};
use card_advisor::chat::ChatAssistant;
use card_advisor::config::CatalogConfig;
use card_advisor::error::AppError;
use card_advisor::preferences::{BookmarkStore, InMemoryKeyValueStore, PreferenceStore};
use card_advisor::recommendation::{
    Criterion, PreferenceSet, Recommendations, Recommender, ScoringWeights,
    DEFAULT_SUGGESTION_LIMIT,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Comma separated criteria, e.g. high-cashback,travel-benefits
    #[arg(long, value_delimiter = ',')]
    pub(crate) criteria: Vec<String>,
    /// Catalog CSV export to rank (defaults to the bundled sample catalog)
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Number of suggestions to print
    #[arg(long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
    pub(crate) limit: usize,
    /// Print the per-factor score breakdown for each card
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogImportArgs {
    /// Catalog CSV export to parse
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        criteria,
        catalog_csv,
        limit,
        explain,
    } = args;

    let snapshot = load_catalog(catalog_csv.as_deref())?;
    let preferences = PreferenceSet::from_slugs(&criteria);
    let recommender = Recommender::new(ScoringWeights::default(), limit);
    let recommendations = recommender.recommend(&preferences, &with_bank_names(snapshot));

    render_recommendations(&recommendations, explain);
    Ok(())
}

pub(crate) fn run_catalog_import(args: CatalogImportArgs) -> Result<(), AppError> {
    let snapshot = load_catalog(Some(args.csv.as_path()))?;
    let visible = snapshot.cards.iter().filter(|card| card.is_visible).count();

    println!("Catalog export {}", args.csv.display());
    println!(
        "- {} banks | {} cards ({} visible, {} hidden)",
        snapshot.banks.len(),
        snapshot.cards.len(),
        visible,
        snapshot.cards.len() - visible
    );
    for bank in &snapshot.banks {
        let count = snapshot
            .cards
            .iter()
            .filter(|card| card.bank_id == bank.id)
            .count();
        println!("  - {} [{}]: {} cards", bank.name, bank.id.0, count);
    }

    let untagged: Vec<&str> = snapshot
        .cards
        .iter()
        .filter(|card| card.tags.is_empty())
        .map(|card| card.name.as_str())
        .collect();
    if !untagged.is_empty() {
        println!("  Cards without tags never match a criterion: {}", untagged.join(", "));
    }

    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    println!("Card advisor demo");

    let repository = Arc::new(InMemoryCatalogRepository::default());
    let assets = Arc::new(InMemoryAssetStore::new("http://127.0.0.1:3000/assets"));
    let catalog = CatalogService::new(repository, assets, CatalogConfig::default());
    let seeded = catalog.seed(load_catalog(None)?)?;
    println!("- Seeded {} cards from the sample catalog", seeded);

    let session = Arc::new(InMemoryKeyValueStore::default());
    let preferences = PreferenceStore::new(session.clone());
    for criterion in [
        Criterion::HighCashback,
        Criterion::OnlineShopping,
        Criterion::NoAnnualFee,
        Criterion::TravelBenefits,
    ] {
        let selection = preferences.toggle(criterion)?;
        if !selection.contains(criterion) {
            println!(
                "- Selection full, '{}' ignored",
                criterion.label()
            );
        }
    }
    let selection = preferences.load().unwrap_or_default();
    println!("- Shopper selected: {}", selection.slugs().join(", "));
    for criterion in selection.criteria() {
        println!("  {}: {}", criterion.label(), criterion.description());
    }

    let recommender = Recommender::default();
    let visible = catalog.visible_cards()?;
    println!("\nTop suggestions");
    let recommendations = recommender.recommend(&selection, &visible);
    render_recommendations(&recommendations, true);

    println!("\nWithout preferences");
    render_recommendations(&recommender.recommend(&PreferenceSet::new(), &visible), false);

    let bookmarks = BookmarkStore::new(session);
    if let Some(top) = recommendations.cards.first() {
        bookmarks.toggle(&top.card.id)?;
        println!("\nBookmarked {} ({} saved)", top.card.name, bookmarks.load().len());
    }

    println!("\nAdmin catalog maintenance");
    let logo = catalog.upload_asset(AssetKind::Logo, "shinhan.png", vec![0x89, 0x50, 0x4e, 0x47])?;
    let art = catalog.upload_asset(AssetKind::Card, "shinhan-hi-point.jpg", vec![0xff, 0xd8])?;
    let draft = CardDraft {
        name: "Shinhan Hi Point".to_string(),
        bank_name: "Shinhan Bank".to_string(),
        short_description: "Points on dining and online shopping".to_string(),
        detailed_benefits: String::new(),
        highlight_benefits: vec!["3x points at restaurants".to_string()],
        cashback_percent: 1.0,
        no_annual_fee: true,
        interest_rate_percent: 21.0,
        max_limit_vnd: 60_000_000,
        approval_time: "1-2 ngày".to_string(),
        tags: vec!["dining-rewards".to_string(), "online-shopping".to_string()],
        affiliate_url: "https://shinhan.com.vn/the-tin-dung".to_string(),
        is_visible: true,
        logo_url: logo,
        image_url: art,
    };
    match catalog.create_card(draft.clone()) {
        Ok(card) => println!("- Created {} -> {}", card.slug, card.affiliate_url),
        Err(err) => println!("- Card rejected: {}", err),
    }
    if let Err(err) = catalog.create_card(draft) {
        println!("- Second submission rejected: {}", err);
    }
    let stats = catalog.stats()?;
    println!(
        "- Catalog holds {} cards, {} visible",
        stats.total_cards, stats.visible_cards
    );

    println!("\nChat assistant");
    let log = Arc::new(InMemoryConversationLog::default());
    let assistant = ChatAssistant::new(log);
    for message in ["Thẻ nào hoàn tiền tốt?", "I travel a lot", "hello"] {
        if let Some(reply) = assistant.reply(message) {
            println!("  > {}\n    {}", message, reply);
        }
    }

    Ok(())
}

/// Attaches bank records so printed cards show their issuer, which also feeds the
/// issuer tier of the rating.
fn with_bank_names(snapshot: CatalogSnapshot) -> Vec<CreditCard> {
    let CatalogSnapshot { banks, cards } = snapshot;
    cards
        .into_iter()
        .map(|mut card| {
            card.bank = banks.iter().find(|bank| bank.id == card.bank_id).cloned();
            card
        })
        .collect()
}

fn render_recommendations(recommendations: &Recommendations, explain: bool) {
    if recommendations.cards.is_empty() {
        println!("  No visible cards in the catalog");
        return;
    }

    for (rank, scored) in recommendations.cards.iter().enumerate() {
        println!(
            "  {}. {} ({}) | score {} | rating {:.1}",
            rank + 1,
            scored.card.name,
            scored.card.bank_name().unwrap_or("unknown bank"),
            scored.match_score,
            scored.rating
        );
        println!("     {}", scored.reason_text);
        if explain {
            for component in &scored.components {
                println!(
                    "     - {:?}: +{} ({})",
                    component.factor, component.points, component.notes
                );
            }
        }
    }
}
