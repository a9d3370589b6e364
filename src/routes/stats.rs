use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{GenreStats, MonthlyProgress, ReadingStreak, ShelfStats},
    routes::{ApiResponse, AppState},
    services::stats,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStatsData {
    pub stats: ShelfStats,
    pub reading_streak: ReadingStreak,
}

/// Handler for the reading-stats endpoint
pub async fn reading_stats(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> AppResult<Json<ApiResponse<ReadingStatsData>>> {
    let result = stats::reading_stats(state.library.as_ref(), user_id, Utc::now()).await?;

    Ok(ApiResponse::ok(
        "Reading stats retrieved successfully",
        ReadingStatsData {
            stats: result.stats,
            reading_streak: result.streak,
        },
    ))
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Malformed years fall back to the current year
    year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyProgressData {
    pub year: i32,
    pub months: Vec<MonthlyProgress>,
}

/// Handler for the monthly-progress endpoint
pub async fn monthly_progress(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(query): Query<MonthlyQuery>,
) -> AppResult<Json<ApiResponse<MonthlyProgressData>>> {
    let year = query
        .year
        .as_deref()
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or_else(|| Utc::now().year());

    let months = stats::monthly_progress(state.library.as_ref(), user_id, year).await?;

    Ok(ApiResponse::ok(
        "Monthly progress retrieved successfully",
        MonthlyProgressData { year, months },
    ))
}

#[derive(Debug, Serialize)]
pub struct GenreBreakdownData {
    pub year: i32,
    pub genres: Vec<GenreStats>,
}

/// Handler for the genre-breakdown endpoint
pub async fn genre_breakdown(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> AppResult<Json<ApiResponse<GenreBreakdownData>>> {
    let now = Utc::now();
    let genres =
        stats::genre_breakdown(state.library.as_ref(), state.catalog.as_ref(), user_id, now)
            .await?;

    Ok(ApiResponse::ok(
        "Genre breakdown retrieved successfully",
        GenreBreakdownData {
            year: now.year(),
            genres,
        },
    ))
}
