use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::warn;

use super::repository::{HistoryStore, InventorySource, RepositoryError};
use super::service::{RecommendationError, RecommendationRequest, RecommendationService};

/// Router builder exposing the recommendation endpoint.
pub fn recommendation_router<I, H>(service: Arc<RecommendationService<I, H>>) -> Router
where
    I: InventorySource + 'static,
    H: HistoryStore + 'static,
{
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler::<I, H>))
        .with_state(service)
}

pub(crate) async fn recommend_handler<I, H>(
    State(service): State<Arc<RecommendationService<I, H>>>,
    axum::Json(request): axum::Json<RecommendationRequest>,
) -> Response
where
    I: InventorySource + 'static,
    H: HistoryStore + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || service.recommend(&request)).await;
    let result = match outcome {
        Ok(result) => result,
        Err(join_error) => {
            warn!(%join_error, "recommendation task failed");
            let payload = json!({
                "error": "recommendation task failed",
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    match result {
        Ok(recommendations) => (StatusCode::OK, axum::Json(recommendations)).into_response(),
        Err(RecommendationError::InvalidRequest(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(RecommendationError::Repository(RepositoryError::Unavailable(reason))) => {
            warn!(%reason, "store unavailable");
            let payload = json!({
                "error": "data store unavailable",
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
