use axum::{Extension, Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState};
use crate::models::SeriesSummary;

#[derive(Serialize)]
pub struct TrackViewResponse {
    pub series_id: i64,
    pub tracked: bool,
}

/// One row of the viewing history.
#[derive(Serialize)]
pub struct ViewedSeriesDto {
    #[serde(flatten)]
    pub series: SeriesSummary,
    pub view_count: i64,
    pub first_viewed_at: String,
    pub last_viewed_at: String,
}

/// POST /api/views
///
/// Record one view of a series. The caller sends the series attributes
/// it is displaying, so the graph node is refreshed in the same write
/// and the VIEWED counter never points at an empty stub.
pub async fn track_view(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(series): Json<SeriesSummary>,
) -> Result<Json<ApiResponse<TrackViewResponse>>, ApiError> {
    if series.name.trim().is_empty() {
        return Err(ApiError::validation("Series name is required"));
    }

    state.store().upsert_series(&series).await?;
    if !series.genres.is_empty() {
        state
            .store()
            .upsert_genre_edges(series.id, &series.genres)
            .await?;
    }
    state.store().record_view(current.id, series.id).await?;

    Ok(Json(ApiResponse::success(TrackViewResponse {
        series_id: series.id,
        tracked: true,
    })))
}

/// GET /api/views
///
/// Viewing history with counters, most recently viewed first.
pub async fn list_views(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<ViewedSeriesDto>>>, ApiError> {
    let rows = state.store().find_viewed_series_details(current.id).await?;

    let items = rows
        .into_iter()
        .map(|(view, series)| {
            let series = series.map_or_else(
                || SeriesSummary {
                    id: view.series_id,
                    name: String::new(),
                    poster_path: None,
                    first_air_date: None,
                    overview: None,
                    popularity: 0.0,
                    vote_average: 0.0,
                    genre_ids: Vec::new(),
                    genres: Vec::new(),
                },
                SeriesSummary::from,
            );
            ViewedSeriesDto {
                series,
                view_count: view.view_count,
                first_viewed_at: view.first_viewed_at,
                last_viewed_at: view.last_viewed_at,
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(items)))
}
