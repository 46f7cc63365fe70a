use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::browse::BrowseQuery;
use super::domain::{CardDraft, CardId};
use super::repository::{AssetError, AssetKind, AssetStore, CatalogRepository, RepositoryError};
use super::service::{CatalogService, CatalogServiceError};

/// Router builder exposing the public catalog and the admin CRUD endpoints.
pub fn catalog_router<R, S>(service: Arc<CatalogService<R, S>>) -> Router
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    Router::new()
        .route("/api/v1/cards", get(browse_handler::<R, S>))
        .route("/api/v1/cards/:card_id", get(card_handler::<R, S>))
        .route("/api/v1/banks", get(banks_handler::<R, S>))
        .route(
            "/api/v1/admin/cards",
            get(admin_cards_handler::<R, S>).post(create_handler::<R, S>),
        )
        .route(
            "/api/v1/admin/cards/:card_id",
            axum::routing::delete(delete_handler::<R, S>),
        )
        .route(
            "/api/v1/admin/cards/:card_id/visibility",
            post(visibility_handler::<R, S>),
        )
        .route("/api/v1/admin/stats", get(stats_handler::<R, S>))
        .route(
            "/api/v1/admin/assets/:kind/:file_name",
            post(upload_handler::<R, S>),
        )
        .with_state(service)
}

/// Optional explicit target; an empty body flips the current flag.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct VisibilityRequest {
    #[serde(default)]
    pub(crate) visible: Option<bool>,
}

pub(crate) fn error_response(error: CatalogServiceError) -> Response {
    let (status, payload) = match &error {
        CatalogServiceError::Validation(fields) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": "invalid card", "fields": fields }),
        ),
        CatalogServiceError::DuplicateSlug(_) => {
            (StatusCode::CONFLICT, json!({ "error": error.to_string() }))
        }
        CatalogServiceError::EmptySlug(_)
        | CatalogServiceError::Asset(AssetError::UnsupportedType(_))
        | CatalogServiceError::Asset(AssetError::Empty) => {
            (StatusCode::BAD_REQUEST, json!({ "error": error.to_string() }))
        }
        CatalogServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, json!({ "error": "card not found" }))
        }
        CatalogServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, json!({ "error": "record already exists" }))
        }
        CatalogServiceError::Repository(RepositoryError::Unavailable(_))
        | CatalogServiceError::Asset(AssetError::Transport(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": error.to_string() }),
        ),
    };

    (status, Json(payload)).into_response()
}

pub(crate) async fn browse_handler<R, S>(
    State(service): State<Arc<CatalogService<R, S>>>,
    Query(query): Query<BrowseQuery>,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    match service.browse(&query) {
        Ok(cards) => (StatusCode::OK, Json(json!({ "count": cards.len(), "cards": cards })))
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn card_handler<R, S>(
    State(service): State<Arc<CatalogService<R, S>>>,
    Path(card_id): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    match service.get(&CardId(card_id)) {
        Ok(card) if card.is_visible => (StatusCode::OK, Json(card)).into_response(),
        Ok(_) => error_response(RepositoryError::NotFound.into()),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn banks_handler<R, S>(
    State(service): State<Arc<CatalogService<R, S>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    match service.banks() {
        Ok(banks) => (StatusCode::OK, Json(banks)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn admin_cards_handler<R, S>(
    State(service): State<Arc<CatalogService<R, S>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    match service.all_cards() {
        Ok(cards) => (StatusCode::OK, Json(cards)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R, S>(
    State(service): State<Arc<CatalogService<R, S>>>,
    Json(draft): Json<CardDraft>,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    match service.create_card(draft) {
        Ok(card) => (StatusCode::CREATED, Json(card)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn visibility_handler<R, S>(
    State(service): State<Arc<CatalogService<R, S>>>,
    Path(card_id): Path<String>,
    body: Option<Json<VisibilityRequest>>,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    let id = CardId(card_id);
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let result = match request.visible {
        Some(visible) => service.set_visibility(&id, visible),
        None => service.toggle_visibility(&id),
    };

    match result {
        Ok(card) => (
            StatusCode::OK,
            Json(json!({ "id": card.id, "is_visible": card.is_visible })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, S>(
    State(service): State<Arc<CatalogService<R, S>>>,
    Path(card_id): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    match service.delete_card(&CardId(card_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<R, S>(
    State(service): State<Arc<CatalogService<R, S>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    match service.stats() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upload_handler<R, S>(
    State(service): State<Arc<CatalogService<R, S>>>,
    Path((kind, file_name)): Path<(AssetKind, String)>,
    bytes: Bytes,
) -> Response
where
    R: CatalogRepository + 'static,
    S: AssetStore + 'static,
{
    match service.upload_asset(kind, &file_name, bytes.to_vec()) {
        Ok(url) => (StatusCode::CREATED, Json(json!({ "url": url }))).into_response(),
        Err(error) => error_response(error),
    }
}
