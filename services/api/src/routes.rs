use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use card_advisor::catalog::{
    catalog_router, AssetStore, CatalogRepository, CatalogService, CatalogServiceError, CreditCard,
};
use card_advisor::chat::{ChatAssistant, ConversationLog};
use card_advisor::recommendation::{PreferenceSet, Recommendations, Recommender};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared services behind the recommendation and chat endpoints.
pub(crate) struct AdvisorState<R, S, L> {
    pub(crate) catalog: Arc<CatalogService<R, S>>,
    pub(crate) recommender: Arc<Recommender>,
    pub(crate) assistant: Arc<ChatAssistant<L>>,
}

impl<R, S, L> Clone for AdvisorState<R, S, L> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            recommender: self.recommender.clone(),
            assistant: self.assistant.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecommendationRequest {
    #[serde(default)]
    pub(crate) criteria: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    #[serde(default)]
    pub(crate) message: String,
}

pub(crate) fn with_advisor_routes<R, S, L>(state: AdvisorState<R, S, L>) -> axum::Router
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
    L: ConversationLog + 'static,
{
    catalog_router(state.catalog.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/recommendations",
            axum::routing::post(recommendations_endpoint::<R, S, L>),
        )
        .route("/api/v1/chat", axum::routing::post(chat_endpoint::<R, S, L>))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Unknown criteria are ignored and the selection is capped before scoring. A
/// catalog read failure is retried once; if it still fails the shopper gets an
/// empty `catalog_unavailable` answer instead of an error page.
pub(crate) async fn recommendations_endpoint<R, S, L>(
    Extension(state): Extension<AdvisorState<R, S, L>>,
    Json(payload): Json<RecommendationRequest>,
) -> Json<Recommendations>
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
    L: ConversationLog + 'static,
{
    let preferences = PreferenceSet::from_slugs(&payload.criteria);
    let recommendations = match visible_cards_with_retry(&state.catalog) {
        Ok(catalog) => state.recommender.recommend(&preferences, &catalog),
        Err(err) => {
            warn!(error = %err, "catalog unavailable, serving empty recommendations");
            state.recommender.unavailable(&preferences)
        }
    };

    info!(
        criteria = ?preferences.slugs(),
        source = ?recommendations.source,
        returned = recommendations.cards.len(),
        "recommendations served"
    );
    Json(recommendations)
}

fn visible_cards_with_retry<R, S>(
    catalog: &CatalogService<R, S>,
) -> Result<Vec<CreditCard>, CatalogServiceError>
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    catalog.visible_cards().or_else(|err| {
        warn!(error = %err, "catalog read failed, retrying once");
        catalog.visible_cards()
    })
}

pub(crate) async fn chat_endpoint<R, S, L>(
    Extension(state): Extension<AdvisorState<R, S, L>>,
    Json(payload): Json<ChatRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
    L: ConversationLog + 'static,
{
    match state.assistant.reply(&payload.message) {
        Some(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "message must not be empty" })),
        )
            .into_response(),
    }
}
