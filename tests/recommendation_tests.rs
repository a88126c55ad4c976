use std::collections::HashMap;
use std::sync::Arc;

use bingerr::config::RecommendationConfig;
use bingerr::db::Store;
use bingerr::models::{CatalogGenre, ListKind, SearchPage, SeriesSummary};
use bingerr::services::catalog::{CatalogError, CatalogProvider};
use bingerr::services::{GenreResolver, GraphRecommendationService, RecommendationService};

struct FakeCatalog {
    genres: Vec<CatalogGenre>,
    discover: HashMap<i64, Vec<SeriesSummary>>,
    details: HashMap<i64, SeriesSummary>,
}

impl FakeCatalog {
    fn new(genres: Vec<(i64, &str)>) -> Self {
        Self {
            genres: genres
                .into_iter()
                .map(|(id, name)| CatalogGenre {
                    id,
                    name: name.to_string(),
                })
                .collect(),
            discover: HashMap::new(),
            details: HashMap::new(),
        }
    }

    fn with_discover(mut self, genre_id: i64, items: Vec<SeriesSummary>) -> Self {
        self.discover.insert(genre_id, items);
        self
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn list_genres(&self) -> Result<Vec<CatalogGenre>, CatalogError> {
        Ok(self.genres.clone())
    }

    async fn discover_by_genre(
        &self,
        genre_id: i64,
        _page: u32,
    ) -> Result<Vec<SeriesSummary>, CatalogError> {
        Ok(self.discover.get(&genre_id).cloned().unwrap_or_default())
    }

    async fn fetch_series_by_id(
        &self,
        series_id: i64,
    ) -> Result<Option<SeriesSummary>, CatalogError> {
        Ok(self.details.get(&series_id).cloned())
    }

    async fn search_series(&self, _query: &str, _page: u32) -> Result<SearchPage, CatalogError> {
        Ok(SearchPage::default())
    }

    async fn list_series(&self, _kind: ListKind, _page: u32) -> Result<SearchPage, CatalogError> {
        Ok(SearchPage::default())
    }
}

fn series(id: i64, name: &str, popularity: f64) -> SeriesSummary {
    SeriesSummary {
        id,
        name: name.to_string(),
        poster_path: Some(format!("/poster-{id}.jpg")),
        first_air_date: Some("2020-01-01".to_string()),
        overview: Some("An overview".to_string()),
        popularity,
        vote_average: 7.5,
        genre_ids: Vec::new(),
        genres: Vec::new(),
    }
}

async fn fresh_store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("store")
}

async fn create_user(store: &Store, name: &str) -> i32 {
    store
        .create_user(name, "longenough")
        .await
        .expect("create user")
        .expect("username free")
        .id
}

fn engine(store: Store, catalog: FakeCatalog) -> GraphRecommendationService {
    let catalog: Arc<dyn CatalogProvider> = Arc::new(catalog);
    let resolver = Arc::new(GenreResolver::new(catalog.clone()));
    GraphRecommendationService::new(store, catalog, resolver, RecommendationConfig::default())
}

async fn seed_series(store: &Store, summary: &SeriesSummary, genres: &[&str]) {
    store.upsert_series(summary).await.expect("upsert series");
    let names: Vec<String> = genres.iter().map(ToString::to_string).collect();
    store
        .upsert_genre_edges(summary.id, &names)
        .await
        .expect("genre edges");
}

#[tokio::test]
async fn content_candidates_exclude_favorited_and_viewed() {
    let store = fresh_store().await;
    let user_id = create_user(&store, "alice").await;

    store
        .set_liked_genres(user_id, &["Drama".to_string()])
        .await
        .unwrap();

    seed_series(&store, &series(1, "Favorited", 50.0), &["Drama"]).await;
    seed_series(&store, &series(2, "Viewed", 50.0), &["Drama"]).await;
    seed_series(&store, &series(3, "Fresh", 50.0), &["Drama"]).await;

    store.toggle_like_series(user_id, 1).await.unwrap();
    store.record_view(user_id, 2).await.unwrap();

    let engine = engine(store, FakeCatalog::new(vec![(18, "Drama")]));
    let result = engine.recommendations_for(user_id).await.unwrap();

    let ids: Vec<i64> = result.for_you.iter().map(|s| s.series.id).collect();
    assert_eq!(ids, vec![3]);
    assert_eq!(result.user_genres, vec!["Drama"]);
}

#[tokio::test]
async fn two_genre_matches_beat_popularity() {
    let store = fresh_store().await;
    let user_id = create_user(&store, "bob").await;

    store
        .set_liked_genres(user_id, &["Drama".to_string(), "Comedy".to_string()])
        .await
        .unwrap();

    // One matched genre with high popularity, two matches with little.
    seed_series(&store, &series(1, "Blockbuster", 150.0), &["Drama"]).await;
    seed_series(&store, &series(2, "Double Match", 10.0), &["Drama", "Comedy"]).await;

    let engine = engine(store, FakeCatalog::new(vec![(18, "Drama"), (35, "Comedy")]));
    let result = engine.recommendations_for(user_id).await.unwrap();

    let names: Vec<&str> = result
        .for_you
        .iter()
        .map(|s| s.series.name.as_str())
        .collect();
    assert_eq!(names, vec!["Double Match", "Blockbuster"]);
    assert!(result.for_you[0].score > result.for_you[1].score);
}

#[tokio::test]
async fn collaborative_scores_sum_neighbor_overlap() {
    let store = fresh_store().await;
    let me = create_user(&store, "me").await;
    let close = create_user(&store, "close-neighbor").await;
    let distant = create_user(&store, "distant-neighbor").await;

    let drama_comedy = vec!["Drama".to_string(), "Comedy".to_string()];
    store.set_liked_genres(me, &drama_comedy).await.unwrap();
    store.set_liked_genres(close, &drama_comedy).await.unwrap();
    store
        .set_liked_genres(distant, &["Drama".to_string()])
        .await
        .unwrap();

    seed_series(&store, &series(5, "Close Pick", 10.0), &[]).await;
    seed_series(&store, &series(6, "Distant Pick", 10.0), &[]).await;
    seed_series(&store, &series(7, "My Own Favorite", 10.0), &[]).await;

    store.toggle_like_series(close, 5).await.unwrap();
    store.toggle_like_series(distant, 6).await.unwrap();
    store.toggle_like_series(me, 7).await.unwrap();

    let engine = engine(store, FakeCatalog::new(vec![(18, "Drama"), (35, "Comedy")]));
    let result = engine.recommendations_for(me).await.unwrap();

    let scored: Vec<(i64, f64)> = result
        .similar_tastes
        .iter()
        .map(|s| (s.series.id, s.score))
        .collect();

    // Two shared genres outrank one; own favorites never appear.
    assert_eq!(scored, vec![(5, 2.0), (6, 1.0)]);
}

#[tokio::test]
async fn cold_start_falls_back_to_catalog() {
    let store = fresh_store().await;
    let user_id = create_user(&store, "newcomer").await;

    store
        .set_liked_genres(user_id, &["Drama".to_string()])
        .await
        .unwrap();

    // Favorite something so the exclusion also applies to the fallback.
    store.toggle_like_series(user_id, 100).await.unwrap();

    let catalog = FakeCatalog::new(vec![(18, "Drama")]).with_discover(
        18,
        vec![
            series(100, "Already Favorited", 300.0),
            series(101, "Catalog Pick", 200.0),
            series(102, "Another Pick", 100.0),
        ],
    );

    let engine = engine(store, catalog);
    let result = engine.recommendations_for(user_id).await.unwrap();

    let ids: Vec<i64> = result.for_you.iter().map(|s| s.series.id).collect();
    assert_eq!(ids, vec![101, 102]);
    assert!((result.for_you[0].score - 2.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn cold_start_dedups_across_genres() {
    let store = fresh_store().await;
    let user_id = create_user(&store, "overlap").await;

    store
        .set_liked_genres(user_id, &["Drama".to_string(), "Comedy".to_string()])
        .await
        .unwrap();

    let shared = series(200, "In Both Listings", 150.0);
    let catalog = FakeCatalog::new(vec![(18, "Drama"), (35, "Comedy")])
        .with_discover(18, vec![shared.clone(), series(201, "Drama Only", 90.0)])
        .with_discover(35, vec![shared, series(202, "Comedy Only", 80.0)]);

    let engine = engine(store, catalog);
    let result = engine.recommendations_for(user_id).await.unwrap();

    let dupes = result
        .for_you
        .iter()
        .filter(|s| s.series.id == 200)
        .count();
    assert_eq!(dupes, 1);
}

#[tokio::test]
async fn cold_start_skips_unresolved_genres() {
    let store = fresh_store().await;
    let user_id = create_user(&store, "mixed-tastes").await;

    store
        .set_liked_genres(user_id, &["Drama".to_string(), "Telenovela".to_string()])
        .await
        .unwrap();

    let catalog = FakeCatalog::new(vec![(18, "Drama")])
        .with_discover(18, vec![series(300, "Resolved Pick", 120.0)]);

    let engine = engine(store, catalog);
    let result = engine.recommendations_for(user_id).await.unwrap();

    // Only the resolvable genre contributes fallback items.
    let ids: Vec<i64> = result.for_you.iter().map(|s| s.series.id).collect();
    assert_eq!(ids, vec![300]);
}

#[tokio::test]
async fn genre_sections_are_capped_and_titled() {
    let store = fresh_store().await;
    let user_id = create_user(&store, "many-genres").await;

    let liked: Vec<String> = ["Drama", "Comedy", "Crime", "Animation", "Documentary"]
        .iter()
        .map(ToString::to_string)
        .collect();
    store.set_liked_genres(user_id, &liked).await.unwrap();

    let drama_page: Vec<SeriesSummary> = (0..15)
        .map(|i| series(1000 + i, &format!("Drama {i}"), 50.0))
        .collect();

    let catalog = FakeCatalog::new(vec![
        (18, "Drama"),
        (35, "Comedy"),
        (80, "Crime"),
        (16, "Animation"),
        (99, "Documentary"),
    ])
    .with_discover(18, drama_page);

    let engine = engine(store, catalog);
    let result = engine.recommendations_for(user_id).await.unwrap();

    // Only the first four liked genres get a section, each capped.
    assert_eq!(result.per_genre_sections.len(), 4);
    assert_eq!(result.per_genre_sections[0].genre, "Drama");
    assert_eq!(
        result.per_genre_sections[0].title,
        "Dramas worth your evenings"
    );
    assert_eq!(result.per_genre_sections[0].items.len(), 10);
    assert!(result
        .per_genre_sections
        .iter()
        .all(|s| s.items.len() <= 10));
}

#[tokio::test]
async fn unresolved_genre_keeps_empty_section() {
    let store = fresh_store().await;
    let user_id = create_user(&store, "niche").await;

    store
        .set_liked_genres(user_id, &["Telenovela".to_string()])
        .await
        .unwrap();

    let engine = engine(store, FakeCatalog::new(vec![(18, "Drama")]));
    let result = engine.recommendations_for(user_id).await.unwrap();

    assert_eq!(result.per_genre_sections.len(), 1);
    assert_eq!(result.per_genre_sections[0].genre, "Telenovela");
    assert_eq!(result.per_genre_sections[0].title, "Top Telenovela picks");
    assert!(result.per_genre_sections[0].items.is_empty());
}

#[tokio::test]
async fn repeated_views_increment_without_moving_first_seen() {
    let store = fresh_store().await;
    let user_id = create_user(&store, "rewatcher").await;

    seed_series(&store, &series(9, "Rewatched", 10.0), &["Drama"]).await;

    store.record_view(user_id, 9).await.unwrap();
    let first = store.get_view(user_id, 9).await.unwrap().unwrap();
    assert_eq!(first.view_count, 1);

    store.record_view(user_id, 9).await.unwrap();
    let second = store.get_view(user_id, 9).await.unwrap().unwrap();
    assert_eq!(second.view_count, 2);
    assert_eq!(second.first_viewed_at, first.first_viewed_at);
    assert!(second.last_viewed_at >= first.last_viewed_at);
}

#[tokio::test]
async fn favorite_toggle_flips_membership() {
    let store = fresh_store().await;
    let user_id = create_user(&store, "toggler").await;

    assert!(store.toggle_like_series(user_id, 77).await.unwrap());
    assert_eq!(store.find_favorited_series(user_id).await.unwrap(), vec![77]);

    assert!(!store.toggle_like_series(user_id, 77).await.unwrap());
    assert!(store.find_favorited_series(user_id).await.unwrap().is_empty());
}
