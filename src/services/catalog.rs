//! Catalog provider seam.
//!
//! The recommendation engine and the browse/search handlers talk to the
//! external series catalog through this trait, so tests can substitute
//! a fixed in-memory catalog for the real HTTP client.

use thiserror::Error;

use crate::models::{CatalogGenre, ListKind, SearchPage, SeriesSummary};

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The provider is configured without credentials. Treated like an
    /// unreachable catalog: enrichment paths degrade to empty.
    #[error("Catalog API key is not configured")]
    MissingApiKey,

    #[error("Catalog request failed: {0}")]
    Transport(String),

    #[error("Catalog responded with {status}: {body}")]
    Api { status: u16, body: String },
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Read-only metadata source for series and genre listings, keyed by
/// the provider's stable series id.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// The provider's genre dictionary (id + display name).
    async fn list_genres(&self) -> Result<Vec<CatalogGenre>, CatalogError>;

    /// Series for a genre id, in the provider's own popularity ordering.
    async fn discover_by_genre(
        &self,
        genre_id: i64,
        page: u32,
    ) -> Result<Vec<SeriesSummary>, CatalogError>;

    /// Full summary for one series; `None` when the provider does not
    /// know the id.
    async fn fetch_series_by_id(
        &self,
        series_id: i64,
    ) -> Result<Option<SeriesSummary>, CatalogError>;

    /// Free-text series search.
    async fn search_series(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError>;

    /// Browse listings (popular, top rated, airing today, on the air).
    async fn list_series(&self, kind: ListKind, page: u32) -> Result<SearchPage, CatalogError>;
}
