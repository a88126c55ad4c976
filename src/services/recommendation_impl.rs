//! Graph-backed implementation of [`RecommendationService`].
//!
//! Combines the two scored graph traversals with catalog lookups:
//! content candidates ("for you"), collaborative candidates ("similar
//! tastes"), a cold-start catalog fallback when the graph is sparse,
//! per-genre catalog sections, and poster completion for stale graph
//! rows. The three graph queries are independent and issued
//! concurrently; catalog fan-out uses `join_all`.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::api::types::{GenreSectionDto, RecommendationsDto, ScoredSeriesDto};
use crate::config::RecommendationConfig;
use crate::db::{ScoredSeriesRow, Store};
use crate::models::SeriesSummary;
use crate::services::catalog::CatalogProvider;
use crate::services::genre_resolver::GenreResolver;
use crate::services::recommendation::{GraphQuery, RecommendationError, RecommendationService};

/// Scoring law for content candidates: distinct matched genres dominate,
/// catalog popularity breaks near-ties.
fn content_score(matched_genres: i64, popularity: f64) -> f64 {
    matched_genres as f64 * 3.0 + popularity / 100.0
}

/// Order score descending, tie-break by name ascending, cap the result.
fn rank(mut items: Vec<ScoredSeriesDto>, cap: usize) -> Vec<ScoredSeriesDto> {
    items.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.series.name.cmp(&b.series.name))
    });
    items.truncate(cap);
    items
}

fn row_to_scored(row: ScoredSeriesRow, score: f64) -> ScoredSeriesDto {
    ScoredSeriesDto {
        series: SeriesSummary {
            id: row.id,
            name: row.name,
            poster_path: row.poster_path,
            first_air_date: row.first_air_date,
            overview: row.overview,
            popularity: row.popularity,
            vote_average: row.vote_average,
            genre_ids: Vec::new(),
            genres: Vec::new(),
        },
        score,
    }
}

pub struct GraphRecommendationService {
    store: Store,
    catalog: Arc<dyn CatalogProvider>,
    resolver: Arc<GenreResolver>,
    limits: RecommendationConfig,
}

impl GraphRecommendationService {
    #[must_use]
    pub fn new(
        store: Store,
        catalog: Arc<dyn CatalogProvider>,
        resolver: Arc<GenreResolver>,
        limits: RecommendationConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            resolver,
            limits,
        }
    }

    /// Catalog substitute for an empty graph-derived "for you" set.
    /// Items keep the catalog's own popularity ordering; ids the user
    /// already interacted with are still excluded so the exclusion
    /// invariant holds for every returned item.
    async fn cold_start_for_you(&self, user_id: i32, liked_genres: &[String]) -> Vec<ScoredSeriesDto> {
        let mut excluded: HashSet<i64> = HashSet::new();
        match self.store.find_favorited_series(user_id).await {
            Ok(ids) => excluded.extend(ids),
            Err(e) => warn!("Cold-start exclusion lookup (favorites) failed: {e}"),
        }
        match self.store.find_viewed_series(user_id).await {
            Ok(rows) => excluded.extend(rows.into_iter().map(|(id, _)| id)),
            Err(e) => warn!("Cold-start exclusion lookup (views) failed: {e}"),
        }

        let fetches = liked_genres.iter().map(|genre| async move {
            let Some(genre_id) = self.resolver.resolve(genre).await else {
                debug!("Cold-start: genre '{genre}' did not resolve");
                return Vec::new();
            };
            match self.catalog.discover_by_genre(genre_id, 1).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("Cold-start discover for '{genre}' failed: {e}");
                    Vec::new()
                }
            }
        });

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for batch in join_all(fetches).await {
            for series in batch {
                if excluded.contains(&series.id) || !seen.insert(series.id) {
                    continue;
                }
                let score = series.popularity / 100.0;
                out.push(ScoredSeriesDto { series, score });
                if out.len() >= self.limits.for_you_limit {
                    break;
                }
            }
            if out.len() >= self.limits.for_you_limit {
                break;
            }
        }

        metrics::counter!("recommendations_cold_start_total").increment(1);
        out
    }

    /// Graph rows can predate a full attribute upsert (a favorite of a
    /// never-fetched series has no poster). Re-fetch those from the
    /// catalog so every returned item is displayable; an unreachable
    /// catalog leaves the item as-is.
    async fn complete_posters(&self, items: &mut [ScoredSeriesDto]) {
        let missing: Vec<(usize, i64)> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.series.has_poster())
            .map(|(idx, item)| (idx, item.series.id))
            .collect();

        if missing.is_empty() {
            return;
        }

        let catalog = &self.catalog;
        let fetched = join_all(missing.into_iter().map(|(idx, id)| async move {
            (idx, catalog.fetch_series_by_id(id).await)
        }))
        .await;

        for (idx, result) in fetched {
            match result {
                Ok(Some(fresh)) => items[idx].series = fresh,
                Ok(None) => {}
                Err(e) => warn!("Poster completion for series failed: {e}"),
            }
        }
    }

    async fn genre_section(&self, genre: &str) -> GenreSectionDto {
        let title = GenreResolver::section_title(genre);

        // Unresolved genres keep their (empty) section so the user's
        // declared taste stays visible in the output.
        let Some(genre_id) = self.resolver.resolve(genre).await else {
            return GenreSectionDto {
                genre: genre.to_string(),
                title,
                items: Vec::new(),
            };
        };

        let items = match self.catalog.discover_by_genre(genre_id, 1).await {
            Ok(mut items) => {
                items.truncate(self.limits.genre_section_size);
                items
            }
            Err(e) => {
                warn!("Genre section fetch for '{genre}' failed: {e}");
                Vec::new()
            }
        };

        GenreSectionDto {
            genre: genre.to_string(),
            title,
            items,
        }
    }
}

#[async_trait::async_trait]
impl RecommendationService for GraphRecommendationService {
    async fn recommendations_for(
        &self,
        user_id: i32,
    ) -> Result<RecommendationsDto, RecommendationError> {
        let start = std::time::Instant::now();

        // Independent graph queries, no data dependency between them.
        let (content, collaborative, liked_genres) = tokio::join!(
            self.store.find_series_by_liked_genres(user_id),
            self.store.find_series_liked_by_taste_neighbors(user_id),
            self.store.find_liked_genres(user_id),
        );

        let content = content
            .map_err(|e| RecommendationError::query_failed(GraphQuery::ContentRecs, e))?;
        let collaborative = collaborative
            .map_err(|e| RecommendationError::query_failed(GraphQuery::CollaborativeRecs, e))?;
        let liked_genres = liked_genres
            .map_err(|e| RecommendationError::query_failed(GraphQuery::GenreList, e))?;

        let mut for_you = rank(
            content
                .into_iter()
                .map(|row| {
                    let score = content_score(row.score, row.popularity);
                    row_to_scored(row, score)
                })
                .collect(),
            self.limits.for_you_limit,
        );

        // Neighbor-weight sums are already the final collaborative score.
        let mut similar_tastes = rank(
            collaborative
                .into_iter()
                .map(|row| {
                    let score = row.score as f64;
                    row_to_scored(row, score)
                })
                .collect(),
            self.limits.similar_limit,
        );

        if for_you.is_empty() && !liked_genres.is_empty() {
            debug!("Empty graph-derived set for user {user_id}, using catalog fallback");
            for_you = self.cold_start_for_you(user_id, &liked_genres).await;
        } else {
            self.complete_posters(&mut for_you).await;
        }
        self.complete_posters(&mut similar_tastes).await;

        let sections = join_all(
            liked_genres
                .iter()
                .take(self.limits.genre_section_count)
                .map(|genre| self.genre_section(genre)),
        )
        .await;

        metrics::histogram!("recommendation_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        Ok(RecommendationsDto {
            for_you,
            similar_tastes,
            per_genre_sections: sections,
            user_genres: liked_genres,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(name: &str, score: f64) -> ScoredSeriesDto {
        ScoredSeriesDto {
            series: SeriesSummary {
                id: i64::from(name.as_bytes()[0]),
                name: name.to_string(),
                poster_path: None,
                first_air_date: None,
                overview: None,
                popularity: 0.0,
                vote_average: 0.0,
                genre_ids: Vec::new(),
                genres: Vec::new(),
            },
            score,
        }
    }

    #[test]
    fn rank_orders_by_score_then_name() {
        let ranked = rank(
            vec![scored("Borgen", 1.0), scored("Arcane", 1.0), scored("Dark", 5.0)],
            10,
        );
        let names: Vec<&str> = ranked.iter().map(|s| s.series.name.as_str()).collect();
        assert_eq!(names, vec!["Dark", "Arcane", "Borgen"]);
    }

    #[test]
    fn rank_caps_length() {
        let items = (0..20).map(|i| scored(&format!("S{i:02}"), f64::from(i))).collect();
        assert_eq!(rank(items, 12).len(), 12);
    }

    #[test]
    fn content_score_weighs_genre_matches_over_popularity() {
        // Two matched genres beat one matched genre regardless of a
        // large popularity gap (popularity contributes at most ~1-2).
        assert!(content_score(2, 0.0) > content_score(1, 150.0));
        assert!(content_score(1, 80.0) > content_score(1, 10.0));
    }
}
