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
pub struct ToggleFavoriteResponse {
    pub series_id: i64,
    pub favorite: bool,
}

/// GET /api/favorites
///
/// The authenticated user's favorited series, most recent first.
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<SeriesSummary>>>, ApiError> {
    let rows = state
        .store()
        .find_favorited_series_details(current.id)
        .await?;

    let items = rows.into_iter().map(SeriesSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

/// POST /api/favorites/{series_id}
///
/// Flip favorite membership for the given series. The series node is
/// created lazily if the graph has never seen it.
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(series_id): Path<i64>,
) -> Result<Json<ApiResponse<ToggleFavoriteResponse>>, ApiError> {
    let favorite = state
        .store()
        .toggle_like_series(current.id, series_id)
        .await?;

    Ok(Json(ApiResponse::success(ToggleFavoriteResponse {
        series_id,
        favorite,
    })))
}
