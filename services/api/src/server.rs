use crate::cli::ServeArgs;
use crate::infra::{
    load_catalog, AppState, InMemoryAssetStore, InMemoryCatalogRepository,
    InMemoryConversationLog,
};
use crate::routes::{with_advisor_routes, AdvisorState};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use card_advisor::catalog::CatalogService;
use card_advisor::chat::ChatAssistant;
use card_advisor::config::AppConfig;
use card_advisor::error::AppError;
use card_advisor::recommendation::{Recommender, ScoringWeights};
use card_advisor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryCatalogRepository::default());
    let assets = Arc::new(InMemoryAssetStore::new(
        config.catalog.asset_base_url.clone(),
    ));
    let catalog = Arc::new(CatalogService::new(
        repository,
        assets,
        config.catalog.clone(),
    ));
    let seeded = catalog.seed(load_catalog(config.catalog.seed_csv.as_deref())?)?;

    let advisor = AdvisorState {
        catalog,
        recommender: Arc::new(Recommender::new(
            ScoringWeights::default(),
            config.recommendations.suggestion_limit,
        )),
        assistant: Arc::new(ChatAssistant::new(Arc::new(
            InMemoryConversationLog::default(),
        ))),
    };

    let app = with_advisor_routes(advisor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, seeded, "card advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
