//! Free-text genre resolution against the catalog's genre dictionary.
//!
//! User taste profiles store genre labels as typed during onboarding;
//! the catalog keys its discover endpoint by numeric genre id. This
//! resolver bridges the two, tolerant of case, punctuation and partial
//! matches. Resolution fails softly: an unresolvable label degrades to
//! an empty result set, never an error.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::warn;

use crate::models::CatalogGenre;
use crate::services::catalog::CatalogProvider;

/// Lowercase and strip everything that is not an ASCII letter, so
/// "Sci-Fi & Fantasy" and "scifi fantasy" compare equal.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub struct GenreResolver {
    catalog: Arc<dyn CatalogProvider>,
    /// Populated once per process from the catalog; no expiry. A failed
    /// fetch leaves the cell unset so a later request retries.
    cache: OnceCell<Vec<CatalogGenre>>,
}

impl GenreResolver {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            catalog,
            cache: OnceCell::new(),
        }
    }

    async fn genres(&self) -> Option<&[CatalogGenre]> {
        let result = self
            .cache
            .get_or_try_init(|| self.catalog.list_genres())
            .await;

        match result {
            Ok(genres) => Some(genres.as_slice()),
            Err(e) => {
                warn!("Genre dictionary unavailable: {e}");
                None
            }
        }
    }

    /// Map a free-text genre label to the catalog's genre id.
    ///
    /// Matching order, first hit wins:
    /// 1. exact case-insensitive match
    /// 2. normalized match (letters only)
    /// 3. normalized substring match, either direction
    /// 4. "sci" synonym: a query containing "sci" matches the catalog
    ///    entry whose normalized name contains "scifi" or
    ///    "sciencefiction" (covers "Sci-Fi & Fantasy")
    pub async fn resolve(&self, name: &str) -> Option<i64> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let genres = self.genres().await?;

        if let Some(g) = genres.iter().find(|g| g.name.eq_ignore_ascii_case(name)) {
            return Some(g.id);
        }

        let query = normalize(name);
        if query.is_empty() {
            return None;
        }

        if let Some(g) = genres.iter().find(|g| normalize(&g.name) == query) {
            return Some(g.id);
        }

        if let Some(g) = genres.iter().find(|g| {
            let key = normalize(&g.name);
            !key.is_empty() && (key.contains(&query) || query.contains(&key))
        }) {
            return Some(g.id);
        }

        if query.contains("sci") {
            if let Some(g) = genres.iter().find(|g| {
                let key = normalize(&g.name);
                key.contains("scifi") || key.contains("sciencefiction")
            }) {
                return Some(g.id);
            }
        }

        None
    }

    /// Human-friendly heading for a per-genre section. Falls back to a
    /// generic title when no custom label exists for the genre.
    #[must_use]
    pub fn section_title(genre: &str) -> String {
        let label = match normalize(genre).as_str() {
            "drama" => Some("Dramas worth your evenings"),
            "comedy" => Some("Comedies to binge"),
            "actionadventure" | "action" => Some("Action & adventure essentials"),
            "scififantasy" | "sciencefiction" | "scifi" => Some("Sci-fi & fantasy worlds"),
            "crime" => Some("Crime stories that grip"),
            "animation" => Some("Animated favorites"),
            "documentary" => Some("Documentaries that stick"),
            _ => None,
        };

        label.map_or_else(|| format!("Top {genre} picks"), ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListKind, SearchPage, SeriesSummary};
    use crate::services::catalog::CatalogError;

    struct FixedCatalog {
        genres: Vec<CatalogGenre>,
    }

    #[async_trait::async_trait]
    impl CatalogProvider for FixedCatalog {
        async fn list_genres(&self) -> Result<Vec<CatalogGenre>, CatalogError> {
            Ok(self.genres.clone())
        }

        async fn discover_by_genre(
            &self,
            _genre_id: i64,
            _page: u32,
        ) -> Result<Vec<SeriesSummary>, CatalogError> {
            Ok(Vec::new())
        }

        async fn fetch_series_by_id(
            &self,
            _series_id: i64,
        ) -> Result<Option<SeriesSummary>, CatalogError> {
            Ok(None)
        }

        async fn search_series(
            &self,
            _query: &str,
            _page: u32,
        ) -> Result<SearchPage, CatalogError> {
            Ok(SearchPage::default())
        }

        async fn list_series(
            &self,
            _kind: ListKind,
            _page: u32,
        ) -> Result<SearchPage, CatalogError> {
            Ok(SearchPage::default())
        }
    }

    fn resolver() -> GenreResolver {
        GenreResolver::new(Arc::new(FixedCatalog {
            genres: vec![
                CatalogGenre {
                    id: 18,
                    name: "Drama".to_string(),
                },
                CatalogGenre {
                    id: 10765,
                    name: "Sci-Fi & Fantasy".to_string(),
                },
                CatalogGenre {
                    id: 10759,
                    name: "Action & Adventure".to_string(),
                },
            ],
        }))
    }

    #[tokio::test]
    async fn exact_match_ignores_case() {
        let r = resolver();
        assert_eq!(r.resolve("drama").await, Some(18));
        assert_eq!(r.resolve("DRAMA").await, Some(18));
    }

    #[tokio::test]
    async fn normalized_match_strips_punctuation() {
        let r = resolver();
        assert_eq!(r.resolve("action & adventure").await, Some(10759));
        assert_eq!(r.resolve("ActionAdventure").await, Some(10759));
    }

    #[tokio::test]
    async fn sci_variants_agree() {
        let r = resolver();
        let expected = r.resolve("Sci-Fi & Fantasy").await;
        assert_eq!(expected, Some(10765));
        assert_eq!(r.resolve("sci-fi").await, expected);
        assert_eq!(r.resolve("Sci-Fi").await, expected);
        assert_eq!(r.resolve("SCI FI").await, expected);
        assert_eq!(r.resolve("science fiction").await, expected);
    }

    #[tokio::test]
    async fn unresolved_returns_none() {
        let r = resolver();
        assert_eq!(r.resolve("Telenovela").await, None);
        assert_eq!(r.resolve("").await, None);
        assert_eq!(r.resolve("&&&").await, None);
    }

    #[test]
    fn section_title_falls_back() {
        assert_eq!(
            GenreResolver::section_title("Drama"),
            "Dramas worth your evenings"
        );
        assert_eq!(
            GenreResolver::section_title("Telenovela"),
            "Top Telenovela picks"
        );
    }
}
