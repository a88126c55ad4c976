use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState};
use crate::models::CatalogGenre;

#[derive(Deserialize)]
pub struct SetGenresRequest {
    pub genres: Vec<String>,
}

#[derive(Serialize)]
pub struct UserGenresResponse {
    pub genres: Vec<String>,
}

/// GET /api/genres
///
/// The catalog's genre dictionary, for onboarding pickers.
pub async fn list_catalog_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CatalogGenre>>>, ApiError> {
    let genres = state.shared.catalog.list_genres().await?;
    Ok(Json(ApiResponse::success(genres)))
}

/// GET /api/user/genres
///
/// The authenticated user's liked genres, in onboarding order.
pub async fn get_user_genres(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserGenresResponse>>, ApiError> {
    let genres = state.store().find_liked_genres(current.id).await?;
    Ok(Json(ApiResponse::success(UserGenresResponse { genres })))
}

/// POST /api/user/genres
///
/// Declare liked genres. Additive: repeating a genre is a no-op and
/// existing likes stay in place.
pub async fn set_user_genres(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<SetGenresRequest>,
) -> Result<Json<ApiResponse<UserGenresResponse>>, ApiError> {
    if payload.genres.iter().all(|g| g.trim().is_empty()) {
        return Err(ApiError::validation("At least one genre is required"));
    }

    state
        .store()
        .set_liked_genres(current.id, &payload.genres)
        .await?;

    let genres = state.store().find_liked_genres(current.id).await?;
    Ok(Json(ApiResponse::success(UserGenresResponse { genres })))
}
