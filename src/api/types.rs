use serde::Serialize;

use crate::models::SeriesSummary;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A recommended series plus its explainable relevance score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredSeriesDto {
    #[serde(flatten)]
    pub series: SeriesSummary,
    pub score: f64,
}

/// One per-genre catalog section.
#[derive(Debug, Clone, Serialize)]
pub struct GenreSectionDto {
    pub genre: String,
    pub title: String,
    pub items: Vec<SeriesSummary>,
}

/// The complete recommendation response. Every field defaults to an
/// empty collection, never absent, so callers only ever check emptiness.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsDto {
    pub for_you: Vec<ScoredSeriesDto>,
    pub similar_tastes: Vec<ScoredSeriesDto>,
    pub per_genre_sections: Vec<GenreSectionDto>,
    pub user_genres: Vec<String>,
}
