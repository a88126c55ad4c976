use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState};
use crate::models::SeriesSummary;

#[derive(Serialize)]
pub struct ToggleWatchlistResponse {
    pub series_id: i64,
    pub in_list: bool,
}

/// GET /api/watchlist
///
/// The authenticated user's watchlist, most recent first. Watchlist
/// membership is bookkeeping only and never feeds scoring.
pub async fn list_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<SeriesSummary>>>, ApiError> {
    let rows = state
        .store()
        .find_watchlisted_series_details(current.id)
        .await?;

    let items = rows.into_iter().map(SeriesSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

/// POST /api/watchlist/{series_id}
///
/// Flip watchlist membership for the given series.
pub async fn toggle_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(series_id): Path<i64>,
) -> Result<Json<ApiResponse<ToggleWatchlistResponse>>, ApiError> {
    let in_list = state
        .store()
        .toggle_watchlist(current.id, series_id)
        .await?;

    Ok(Json(ApiResponse::success(ToggleWatchlistResponse {
        series_id,
        in_list,
    })))
}
