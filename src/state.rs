use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{CatalogProvider, GenreResolver, GraphRecommendationService, RecommendationService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Bingerr/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub catalog: Arc<dyn CatalogProvider>,

    pub genre_resolver: Arc<GenreResolver>,

    pub recommendation_service: Arc<dyn RecommendationService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client =
            build_shared_http_client(config.tmdb.request_timeout_seconds.into())?;

        let tmdb = TmdbClient::with_shared_client(http_client, &config.tmdb);
        let catalog: Arc<dyn CatalogProvider> = Arc::new(tmdb);

        let genre_resolver = Arc::new(GenreResolver::new(catalog.clone()));

        let recommendation_service = Arc::new(GraphRecommendationService::new(
            store.clone(),
            catalog.clone(),
            genre_resolver.clone(),
            config.recommendations.clone(),
        )) as Arc<dyn RecommendationService>;

        let config_arc = Arc::new(RwLock::new(config));

        Ok(Self {
            config: config_arc,
            store,
            catalog,
            genre_resolver,
            recommendation_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
