//! Domain seam for the recommendation engine.
//!
//! Handlers depend on this trait rather than on the concrete engine so
//! the scoring pipeline can be exercised in isolation and swapped in
//! tests.

use std::fmt;

use thiserror::Error;

use crate::api::types::RecommendationsDto;

/// The three independent graph queries a recommendation computation
/// issues. Failures are tagged with the query that failed so callers
/// can decide how to degrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphQuery {
    ContentRecs,
    CollaborativeRecs,
    GenreList,
}

impl fmt::Display for GraphQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ContentRecs => "content-recs",
            Self::CollaborativeRecs => "collaborative-recs",
            Self::GenreList => "genre-list",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RecommendationError {
    /// A graph query failed. Fails the whole computation; partial-data
    /// conditions (empty results, unreachable catalog) never surface
    /// through this type.
    #[error("Graph query '{query}' failed: {message}")]
    QueryFailed { query: GraphQuery, message: String },
}

impl RecommendationError {
    pub fn query_failed(query: GraphQuery, err: impl fmt::Display) -> Self {
        Self::QueryFailed {
            query,
            message: err.to_string(),
        }
    }
}

/// Produces the ranked, deduplicated recommendation sets for a user.
///
/// Stateless per request: each invocation is a pure function of the
/// user id, the current graph state and the current catalog state.
#[async_trait::async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommendations_for(
        &self,
        user_id: i32,
    ) -> Result<RecommendationsDto, RecommendationError>;
}
