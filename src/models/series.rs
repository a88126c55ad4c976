use serde::{Deserialize, Serialize};

/// A displayable series, as returned by the catalog provider or read
/// back from the interaction graph. Field names follow the provider's
/// wire format so the frontend can render either origin unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub id: i64,

    pub name: String,

    pub poster_path: Option<String>,

    pub first_air_date: Option<String>,

    pub overview: Option<String>,

    #[serde(default)]
    pub popularity: f64,

    #[serde(default)]
    pub vote_average: f64,

    /// Catalog genre ids, when the provider supplies them (list/search
    /// responses). Empty for graph-origin rows.
    #[serde(default)]
    pub genre_ids: Vec<i64>,

    /// Genre display names, when known (detail responses, graph rows).
    #[serde(default)]
    pub genres: Vec<String>,
}

impl SeriesSummary {
    /// Whether the item can be rendered without a metadata refresh.
    #[must_use]
    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// One entry of the catalog's genre dictionary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogGenre {
    pub id: i64,
    pub name: String,
}

/// A page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchPage {
    pub results: Vec<SeriesSummary>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Browse listings exposed by the catalog provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Popular,
    TopRated,
    AiringToday,
    OnTheAir,
}

impl ListKind {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "top_rated" => Self::TopRated,
            "airing_today" => Self::AiringToday,
            "on_the_air" => Self::OnTheAir,
            _ => Self::Popular,
        }
    }

    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
            Self::AiringToday => "airing_today",
            Self::OnTheAir => "on_the_air",
        }
    }
}
