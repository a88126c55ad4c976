use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use tracing::debug;

use crate::entities::{genres, series, series_genres};
use crate::models::SeriesSummary;

pub struct SeriesRepository {
    conn: DatabaseConnection,
}

impl SeriesRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert or refresh a series node. Attributes are last-write-wins;
    /// genre edges are handled separately and only ever grow.
    pub async fn upsert(&self, summary: &SeriesSummary) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = series::ActiveModel {
            id: Set(summary.id),
            name: Set(summary.name.clone()),
            poster_path: Set(summary.poster_path.clone()),
            first_air_date: Set(summary.first_air_date.clone()),
            overview: Set(summary.overview.clone()),
            popularity: Set(summary.popularity),
            vote_average: Set(summary.vote_average),
            updated_at: Set(now),
        };

        series::Entity::insert(active)
            .on_conflict(
                OnConflict::column(series::Column::Id)
                    .update_columns([
                        series::Column::Name,
                        series::Column::PosterPath,
                        series::Column::FirstAirDate,
                        series::Column::Overview,
                        series::Column::Popularity,
                        series::Column::VoteAverage,
                        series::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        debug!("Upserted series {} ({})", summary.id, summary.name);
        Ok(())
    }

    /// Create a bare series node if none exists yet. Used by the
    /// favorite/watchlist toggles so an edge never dangles; attributes
    /// get filled by a later upsert or by metadata completion.
    pub async fn ensure_exists(&self, series_id: i64) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = series::ActiveModel {
            id: Set(series_id),
            name: Set(String::new()),
            poster_path: Set(None),
            first_air_date: Set(None),
            overview: Set(None),
            popularity: Set(0.0),
            vote_average: Set(0.0),
            updated_at: Set(now),
        };

        let insert = series::Entity::insert(active)
            .on_conflict(
                OnConflict::column(series::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Attach genre names to a series. Edges are insert-or-ignore: the
    /// genre set of a series is the union of everything ever supplied.
    pub async fn upsert_genre_edges(&self, series_id: i64, genre_names: &[String]) -> Result<()> {
        for name in genre_names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                continue;
            }

            let genre_id = super::ensure_genre(&self.conn, trimmed).await?;

            let edge = series_genres::ActiveModel {
                series_id: Set(series_id),
                genre_id: Set(genre_id),
            };

            let insert = series_genres::Entity::insert(edge)
                .on_conflict(
                    OnConflict::columns([
                        series_genres::Column::SeriesId,
                        series_genres::Column::GenreId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec(&self.conn)
                .await;

            match insert {
                Ok(_) | Err(DbErr::RecordNotInserted) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    pub async fn get(&self, series_id: i64) -> Result<Option<series::Model>> {
        Ok(series::Entity::find_by_id(series_id).one(&self.conn).await?)
    }

    /// Genre display names attached to a series, sorted for stable output.
    pub async fn genre_names(&self, series_id: i64) -> Result<Vec<String>> {
        let rows = genres::Entity::find()
            .inner_join(series_genres::Entity)
            .filter(series_genres::Column::SeriesId.eq(series_id))
            .order_by_asc(genres::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(|g| g.name).collect())
    }
}
