use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::recommendations::ScoredSeriesRow;
pub use repositories::user::User;

use crate::models::SeriesSummary;

/// The interaction graph store: users, series, genres and the edges
/// between them, backed by SQLite. The recommendation engine only sees
/// the query-shaped surface below, so the backing schema can change
/// without touching scoring.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn series_repo(&self) -> repositories::series::SeriesRepository {
        repositories::series::SeriesRepository::new(self.conn.clone())
    }

    fn interaction_repo(&self) -> repositories::interactions::InteractionRepository {
        repositories::interactions::InteractionRepository::new(self.conn.clone())
    }

    fn recommendation_repo(&self) -> repositories::recommendations::RecommendationRepository {
        repositories::recommendations::RecommendationRepository::new(self.conn.clone())
    }

    // ----- users -----

    pub async fn create_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().create(username, password).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    // ----- series nodes -----

    pub async fn upsert_series(&self, summary: &SeriesSummary) -> Result<()> {
        self.series_repo().upsert(summary).await
    }

    pub async fn upsert_genre_edges(&self, series_id: i64, genres: &[String]) -> Result<()> {
        self.series_repo()
            .upsert_genre_edges(series_id, genres)
            .await
    }

    pub async fn get_series(&self, series_id: i64) -> Result<Option<crate::entities::series::Model>> {
        self.series_repo().get(series_id).await
    }

    pub async fn series_genre_names(&self, series_id: i64) -> Result<Vec<String>> {
        self.series_repo().genre_names(series_id).await
    }

    // ----- interaction edges -----

    pub async fn toggle_like_series(&self, user_id: i32, series_id: i64) -> Result<bool> {
        // Lazy node creation: favoriting something we have never seen
        // still produces a well-formed edge.
        self.series_repo().ensure_exists(series_id).await?;
        self.interaction_repo()
            .toggle_favorite(user_id, series_id)
            .await
    }

    pub async fn toggle_watchlist(&self, user_id: i32, series_id: i64) -> Result<bool> {
        self.series_repo().ensure_exists(series_id).await?;
        self.interaction_repo()
            .toggle_watchlist(user_id, series_id)
            .await
    }

    pub async fn record_view(&self, user_id: i32, series_id: i64) -> Result<()> {
        self.interaction_repo().record_view(user_id, series_id).await
    }

    pub async fn get_view(
        &self,
        user_id: i32,
        series_id: i64,
    ) -> Result<Option<crate::entities::views::Model>> {
        self.interaction_repo().get_view(user_id, series_id).await
    }

    pub async fn set_liked_genres(&self, user_id: i32, genres: &[String]) -> Result<()> {
        self.interaction_repo()
            .set_liked_genres(user_id, genres)
            .await
    }

    // ----- graph queries -----

    pub async fn find_liked_genres(&self, user_id: i32) -> Result<Vec<String>> {
        self.interaction_repo().liked_genres(user_id).await
    }

    pub async fn find_favorited_series(&self, user_id: i32) -> Result<Vec<i64>> {
        self.interaction_repo().favorited_series(user_id).await
    }

    pub async fn find_watchlisted_series(&self, user_id: i32) -> Result<Vec<i64>> {
        self.interaction_repo().watchlisted_series(user_id).await
    }

    pub async fn find_viewed_series(&self, user_id: i32) -> Result<Vec<(i64, String)>> {
        self.interaction_repo().viewed_series(user_id).await
    }

    pub async fn find_favorited_series_details(
        &self,
        user_id: i32,
    ) -> Result<Vec<crate::entities::series::Model>> {
        self.interaction_repo()
            .favorited_series_details(user_id)
            .await
    }

    pub async fn find_watchlisted_series_details(
        &self,
        user_id: i32,
    ) -> Result<Vec<crate::entities::series::Model>> {
        self.interaction_repo()
            .watchlisted_series_details(user_id)
            .await
    }

    pub async fn find_viewed_series_details(
        &self,
        user_id: i32,
    ) -> Result<
        Vec<(
            crate::entities::views::Model,
            Option<crate::entities::series::Model>,
        )>,
    > {
        self.interaction_repo().viewed_series_details(user_id).await
    }

    pub async fn find_series_by_liked_genres(&self, user_id: i32) -> Result<Vec<ScoredSeriesRow>> {
        self.recommendation_repo()
            .series_by_liked_genres(user_id)
            .await
    }

    pub async fn find_series_liked_by_taste_neighbors(
        &self,
        user_id: i32,
    ) -> Result<Vec<ScoredSeriesRow>> {
        self.recommendation_repo()
            .series_liked_by_taste_neighbors(user_id)
            .await
    }
}
