use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};

/// A candidate series pulled out of the interaction graph together with
/// its aggregate relevance signal. `score` is the raw graph aggregate
/// (matched-genre count or neighbor-weight sum); the engine applies the
/// scoring law on top.
#[derive(Debug, Clone, FromQueryResult)]
pub struct ScoredSeriesRow {
    pub id: i64,
    pub name: String,
    pub poster_path: Option<String>,
    pub first_air_date: Option<String>,
    pub overview: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
    pub score: i64,
}

/// The graph traversals backing the recommendation engine. These are
/// aggregate pattern-matching queries, expressed as SQL over the edge
/// tables; each returns (series, aggregate-score) pairs.
pub struct RecommendationRepository {
    conn: DatabaseConnection,
}

/// Series sharing at least one genre with the user's liked genres,
/// scored by the count of distinct matched genres. Series the user has
/// already favorited or viewed are excluded.
const CONTENT_CANDIDATES_SQL: &str = r"
SELECT s.id, s.name, s.poster_path, s.first_air_date, s.overview,
       s.popularity, s.vote_average,
       COUNT(DISTINCT sg.genre_id) AS score
FROM user_genres ug
JOIN series_genres sg ON sg.genre_id = ug.genre_id
JOIN series s ON s.id = sg.series_id
WHERE ug.user_id = ?
  AND s.id NOT IN (SELECT series_id FROM favorites WHERE user_id = ?)
  AND s.id NOT IN (SELECT series_id FROM views WHERE user_id = ?)
GROUP BY s.id
ORDER BY score DESC, s.name ASC
";

/// Series favorited by taste neighbors (users sharing at least one
/// liked genre), scored by the sum of each neighbor's shared-genre
/// count. Series the user already favorited are excluded.
const COLLABORATIVE_CANDIDATES_SQL: &str = r"
SELECT s.id, s.name, s.poster_path, s.first_air_date, s.overview,
       s.popularity, s.vote_average,
       SUM(nb.shared_genres) AS score
FROM (
    SELECT theirs.user_id AS neighbor_id,
           COUNT(DISTINCT theirs.genre_id) AS shared_genres
    FROM user_genres mine
    JOIN user_genres theirs ON theirs.genre_id = mine.genre_id
    WHERE mine.user_id = ? AND theirs.user_id <> ?
    GROUP BY theirs.user_id
) nb
JOIN favorites f ON f.user_id = nb.neighbor_id
JOIN series s ON s.id = f.series_id
WHERE s.id NOT IN (SELECT series_id FROM favorites WHERE user_id = ?)
GROUP BY s.id
ORDER BY score DESC, s.name ASC
";

impl RecommendationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Content-based candidates: series connected to the user's liked
    /// genres via HAS_GENRE, with the matched-genre count as score.
    pub async fn series_by_liked_genres(&self, user_id: i32) -> Result<Vec<ScoredSeriesRow>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Sqlite,
            CONTENT_CANDIDATES_SQL,
            [user_id.into(), user_id.into(), user_id.into()],
        );

        ScoredSeriesRow::find_by_statement(stmt)
            .all(&self.conn)
            .await
            .context("Content candidates query failed")
    }

    /// Collaborative candidates: series favorited by users with
    /// overlapping taste, with the summed neighbor weight as score.
    pub async fn series_liked_by_taste_neighbors(
        &self,
        user_id: i32,
    ) -> Result<Vec<ScoredSeriesRow>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Sqlite,
            COLLABORATIVE_CANDIDATES_SQL,
            [user_id.into(), user_id.into(), user_id.into()],
        );

        ScoredSeriesRow::find_by_statement(stmt)
            .all(&self.conn)
            .await
            .context("Collaborative candidates query failed")
    }
}
