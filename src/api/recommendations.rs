use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, RecommendationsDto};

/// GET /api/recommendations
///
/// The personalized home feed for the authenticated user: graph-derived
/// "for you" and "similar tastes" sets plus per-genre catalog sections.
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<RecommendationsDto>>, ApiError> {
    let recommendations = state
        .shared
        .recommendation_service
        .recommendations_for(current.id)
        .await?;

    Ok(Json(ApiResponse::success(recommendations)))
}
