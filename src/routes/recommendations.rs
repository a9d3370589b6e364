use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::Book,
    routes::{ApiResponse, AppState},
    services::recommendations::{self, DEFAULT_LIMIT},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Kept as a raw string: a malformed limit falls back to the default
    /// instead of rejecting the request.
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationData {
    pub recommendations: Vec<Book>,
    pub reason: &'static str,
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<ApiResponse<RecommendationData>>> {
    let limit = parse_limit(query.limit.as_deref());

    tracing::debug!(%user_id, limit, "computing recommendations");

    let result = recommendations::get_recommendations(
        state.library.as_ref(),
        state.catalog.as_ref(),
        user_id,
        limit,
    )
    .await?;

    tracing::info!(
        %user_id,
        count = result.books.len(),
        reason = result.reason,
        "recommendations computed"
    );

    Ok(ApiResponse::ok(
        result.message,
        RecommendationData {
            recommendations: result.books,
            reason: result.reason,
        },
    ))
}

/// Positive integers pass through; anything else means the default
fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_LIMIT)
}
