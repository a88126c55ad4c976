use reqwest::Client;
use serde::Deserialize;

use crate::config::TmdbConfig;
use crate::models::{CatalogGenre, ListKind, SearchPage, SeriesSummary};
use crate::services::catalog::{CatalogError, CatalogProvider};

#[derive(Debug, Deserialize)]
struct TmdbSeries {
    id: i64,
    #[serde(default)]
    name: String,
    poster_path: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    #[serde(default)]
    popularity: f64,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct TmdbSeriesDetail {
    id: i64,
    #[serde(default)]
    name: String,
    poster_path: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    #[serde(default)]
    popularity: f64,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    results: Vec<TmdbSeries>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

impl From<TmdbSeries> for SeriesSummary {
    fn from(s: TmdbSeries) -> Self {
        Self {
            id: s.id,
            name: s.name,
            poster_path: s.poster_path,
            first_air_date: s.first_air_date,
            overview: s.overview,
            popularity: s.popularity,
            vote_average: s.vote_average,
            genre_ids: s.genre_ids,
            genres: Vec::new(),
        }
    }
}

impl From<TmdbSeriesDetail> for SeriesSummary {
    fn from(s: TmdbSeriesDetail) -> Self {
        Self {
            id: s.id,
            name: s.name,
            poster_path: s.poster_path,
            first_air_date: s.first_air_date,
            overview: s.overview,
            popularity: s.popularity,
            vote_average: s.vote_average,
            genre_ids: s.genres.iter().map(|g| g.id).collect(),
            genres: s.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

impl From<PageResponse> for SearchPage {
    fn from(p: PageResponse) -> Self {
        Self {
            results: p.results.into_iter().map(SeriesSummary::from).collect(),
            page: p.page.max(1),
            total_pages: p.total_pages.max(1),
            total_results: p.total_results,
        }
    }
}

/// TMDB TV API client. All calls go through the shared reqwest client
/// (connection pooling, bounded timeouts).
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
        }
    }

    fn api_key(&self) -> Result<&str, CatalogError> {
        self.api_key.as_deref().ok_or(CatalogError::MissingApiKey)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, CatalogError> {
        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api { status, body });
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    async fn list_genres(&self) -> Result<Vec<CatalogGenre>, CatalogError> {
        let url = format!(
            "{}/genre/tv/list?api_key={}&language=en-US",
            self.base_url,
            self.api_key()?
        );

        let response: GenreListResponse = self
            .get_json(&url)
            .await?
            .ok_or_else(|| CatalogError::Transport("Genre list endpoint missing".to_string()))?;

        Ok(response
            .genres
            .into_iter()
            .map(|g| CatalogGenre {
                id: g.id,
                name: g.name,
            })
            .collect())
    }

    async fn discover_by_genre(
        &self,
        genre_id: i64,
        page: u32,
    ) -> Result<Vec<SeriesSummary>, CatalogError> {
        let url = format!(
            "{}/discover/tv?api_key={}&with_genres={}&language=en-US&page={}",
            self.base_url,
            self.api_key()?,
            genre_id,
            page.max(1)
        );

        let response: Option<PageResponse> = self.get_json(&url).await?;

        Ok(response
            .map(|p| SearchPage::from(p).results)
            .unwrap_or_default())
    }

    async fn fetch_series_by_id(
        &self,
        series_id: i64,
    ) -> Result<Option<SeriesSummary>, CatalogError> {
        let url = format!(
            "{}/tv/{}?api_key={}&language=en-US",
            self.base_url,
            series_id,
            self.api_key()?
        );

        let detail: Option<TmdbSeriesDetail> = self.get_json(&url).await?;
        Ok(detail.map(SeriesSummary::from))
    }

    async fn search_series(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError> {
        if query.trim().is_empty() {
            return Ok(SearchPage::default());
        }

        let url = format!(
            "{}/search/tv?api_key={}&query={}&page={}&language=en-US",
            self.base_url,
            self.api_key()?,
            urlencoding::encode(query),
            page.max(1)
        );

        let response: Option<PageResponse> = self.get_json(&url).await?;
        Ok(response.map(SearchPage::from).unwrap_or_default())
    }

    async fn list_series(&self, kind: ListKind, page: u32) -> Result<SearchPage, CatalogError> {
        let url = format!(
            "{}/tv/{}?api_key={}&language=en-US&page={}",
            self.base_url,
            kind.as_path(),
            self.api_key()?,
            page.max(1)
        );

        let response: Option<PageResponse> = self.get_json(&url).await?;
        Ok(response.map(SearchPage::from).unwrap_or_default())
    }
}
