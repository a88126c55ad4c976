use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::{ListKind, SearchPage, SeriesSummary};

#[derive(Deserialize)]
pub struct ListQuery {
    /// Catalog listing: popular (default), top_rated, airing_today,
    /// on_the_air.
    pub kind: Option<String>,
    /// Optional re-ordering of the returned page. Only "oldest" is
    /// recognized; anything else keeps the catalog's ordering.
    pub sort: Option<String>,
    pub page: Option<u32>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
    /// Optional free-text genre filter, applied to the result page.
    pub genre: Option<String>,
    pub page: Option<u32>,
}

/// GET /api/series
///
/// Browse one of the catalog's standing listings.
pub async fn list_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<SearchPage>>, ApiError> {
    let kind = ListKind::parse(query.kind.as_deref().unwrap_or("popular"));
    let page = query.page.unwrap_or(1).max(1);

    let mut listing = state.shared.catalog.list_series(kind, page).await?;

    // The catalog has no server-side "oldest first" ordering, so the
    // returned page is re-sorted locally.
    if query.sort.as_deref() == Some("oldest") {
        listing
            .results
            .sort_by(|a, b| a.first_air_date.cmp(&b.first_air_date));
    }

    Ok(Json(ApiResponse::success(listing)))
}

/// GET /api/series/{id}
///
/// Series detail, fetched live from the catalog. The fetched attributes
/// and genre edges are written through to the graph so later scoring
/// queries see them.
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<SeriesSummary>>, ApiError> {
    let series = state
        .shared
        .catalog
        .fetch_series_by_id(id)
        .await?
        .ok_or_else(|| ApiError::series_not_found(id))?;

    state.store().upsert_series(&series).await?;
    if !series.genres.is_empty() {
        state
            .store()
            .upsert_genre_edges(series.id, &series.genres)
            .await?;
    }

    Ok(Json(ApiResponse::success(series)))
}

/// GET /api/search?q=...&genre=...&page=...
///
/// Free-text catalog search. When a genre filter is given and resolves
/// against the catalog's dictionary, the result page is narrowed to
/// series tagged with that genre; an unresolvable filter is ignored.
pub async fn search_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchPage>>, ApiError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }

    let page = query.page.unwrap_or(1).max(1);
    let mut results = state.shared.catalog.search_series(q, page).await?;

    if let Some(genre) = query.genre.as_deref()
        && let Some(genre_id) = state.shared.genre_resolver.resolve(genre).await
    {
        results
            .results
            .retain(|series| series.genre_ids.contains(&genre_id));
    }

    Ok(Json(ApiResponse::success(results)))
}
