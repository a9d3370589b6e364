use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    middleware::{request_context, require_user},
    stores::{CatalogStore, LibraryStore},
};

pub mod recommendations;
pub mod stats;

/// Shared application state: handles to the external read-only stores
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<dyn LibraryStore>,
    pub catalog: Arc<dyn CatalogStore>,
}

impl AppState {
    pub fn new(library: Arc<dyn LibraryStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { library, catalog }
    }
}

/// Uniform response envelope: `{ success, message, data }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data,
        })
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        .fallback(route_not_found)
}

/// API routes under /api/v1; everything here needs a user context
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route("/stats", get(stats::reading_stats))
        .route("/stats/monthly", get(stats::monthly_progress))
        .route("/stats/genres", get(stats::genre_breakdown))
        .layer(axum::middleware::from_fn(require_user))
        .layer(axum::middleware::from_fn(request_context))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn route_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route not found" })),
    )
}
