use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, sea_query::OnConflict,
};
use tracing::debug;

use crate::entities::{favorites, genres, series, user_genres, views, watchlist};

/// Read/write access to the user-side edges of the interaction graph:
/// LIKES (genres), LIKES_SERIES (favorites), watchlist membership and
/// VIEWED counters. All writes are idempotent upserts keyed by natural
/// identity, so concurrent duplicates converge to the same state.
pub struct InteractionRepository {
    conn: DatabaseConnection,
}

impl InteractionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Flip favorite membership for a (user, series) pair.
    /// Returns the new membership state.
    pub async fn toggle_favorite(&self, user_id: i32, series_id: i64) -> Result<bool> {
        let existing = favorites::Entity::find_by_id((user_id, series_id))
            .one(&self.conn)
            .await?;

        if let Some(edge) = existing {
            edge.delete(&self.conn).await?;
            debug!("Removed favorite: user={user_id} series={series_id}");
            return Ok(false);
        }

        let edge = favorites::ActiveModel {
            user_id: Set(user_id),
            series_id: Set(series_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        let insert = favorites::Entity::insert(edge)
            .on_conflict(
                OnConflict::columns([favorites::Column::UserId, favorites::Column::SeriesId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => {
                debug!("Added favorite: user={user_id} series={series_id}");
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Flip watchlist membership for a (user, series) pair.
    /// Returns the new membership state.
    pub async fn toggle_watchlist(&self, user_id: i32, series_id: i64) -> Result<bool> {
        let existing = watchlist::Entity::find_by_id((user_id, series_id))
            .one(&self.conn)
            .await?;

        if let Some(edge) = existing {
            edge.delete(&self.conn).await?;
            return Ok(false);
        }

        let edge = watchlist::ActiveModel {
            user_id: Set(user_id),
            series_id: Set(series_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        let insert = watchlist::Entity::insert(edge)
            .on_conflict(
                OnConflict::columns([watchlist::Column::UserId, watchlist::Column::SeriesId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// Favorited series ids, most recent first.
    pub async fn favorited_series(&self, user_id: i32) -> Result<Vec<i64>> {
        let rows = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_desc(favorites::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(|r| r.series_id).collect())
    }

    /// Favorited series rows with full attributes, most recent first.
    /// Bare stub rows (favorited before any metadata fetch) still come
    /// back, with whatever attributes they have.
    pub async fn favorited_series_details(&self, user_id: i32) -> Result<Vec<series::Model>> {
        let rows = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_desc(favorites::Column::CreatedAt)
            .find_also_related(series::Entity)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().filter_map(|(_, s)| s).collect())
    }

    /// Watchlisted series rows with full attributes, most recent first.
    pub async fn watchlisted_series_details(&self, user_id: i32) -> Result<Vec<series::Model>> {
        let rows = watchlist::Entity::find()
            .filter(watchlist::Column::UserId.eq(user_id))
            .order_by_desc(watchlist::Column::CreatedAt)
            .find_also_related(series::Entity)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().filter_map(|(_, s)| s).collect())
    }

    /// Watchlisted series ids, most recent first.
    pub async fn watchlisted_series(&self, user_id: i32) -> Result<Vec<i64>> {
        let rows = watchlist::Entity::find()
            .filter(watchlist::Column::UserId.eq(user_id))
            .order_by_desc(watchlist::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(|r| r.series_id).collect())
    }

    /// Record one view of a series. On first view both timestamps are
    /// set and the count starts at 1; afterwards the count increments
    /// and only `last_viewed_at` advances.
    pub async fn record_view(&self, user_id: i32, series_id: i64) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let existing = views::Entity::find_by_id((user_id, series_id))
            .one(&self.conn)
            .await?;

        if let Some(view) = existing {
            let count = view.view_count;
            let mut active: views::ActiveModel = view.into();
            active.view_count = Set(count + 1);
            active.last_viewed_at = Set(now);
            active.update(&self.conn).await?;
            return Ok(());
        }

        let active = views::ActiveModel {
            user_id: Set(user_id),
            series_id: Set(series_id),
            view_count: Set(1),
            first_viewed_at: Set(now.clone()),
            last_viewed_at: Set(now),
        };
        active.insert(&self.conn).await?;

        Ok(())
    }

    pub async fn get_view(&self, user_id: i32, series_id: i64) -> Result<Option<views::Model>> {
        Ok(views::Entity::find_by_id((user_id, series_id))
            .one(&self.conn)
            .await?)
    }

    /// Viewed series with display names, most recently viewed first.
    pub async fn viewed_series(&self, user_id: i32) -> Result<Vec<(i64, String)>> {
        let rows = views::Entity::find()
            .filter(views::Column::UserId.eq(user_id))
            .order_by_desc(views::Column::LastViewedAt)
            .find_also_related(crate::entities::series::Entity)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(view, series)| {
                (
                    view.series_id,
                    series.map(|s| s.name).unwrap_or_default(),
                )
            })
            .collect())
    }

    /// View counters joined with their series rows, most recently
    /// viewed first.
    pub async fn viewed_series_details(
        &self,
        user_id: i32,
    ) -> Result<Vec<(views::Model, Option<series::Model>)>> {
        Ok(views::Entity::find()
            .filter(views::Column::UserId.eq(user_id))
            .order_by_desc(views::Column::LastViewedAt)
            .find_also_related(series::Entity)
            .all(&self.conn)
            .await?)
    }

    /// Upsert LIKES edges for each genre name. Additive: declaring a
    /// taste twice is a no-op, and existing likes are never removed here.
    pub async fn set_liked_genres(&self, user_id: i32, genre_names: &[String]) -> Result<()> {
        for name in genre_names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                continue;
            }

            let genre_id = super::ensure_genre(&self.conn, trimmed).await?;

            let edge = user_genres::ActiveModel {
                user_id: Set(user_id),
                genre_id: Set(genre_id),
                created_at: Set(chrono::Utc::now().to_rfc3339()),
                ..Default::default()
            };

            let insert = user_genres::Entity::insert(edge)
                .on_conflict(
                    OnConflict::columns([
                        user_genres::Column::UserId,
                        user_genres::Column::GenreId,
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

    /// The user's liked genre names, in onboarding order.
    pub async fn liked_genres(&self, user_id: i32) -> Result<Vec<String>> {
        let rows = user_genres::Entity::find()
            .filter(user_genres::Column::UserId.eq(user_id))
            .order_by_asc(user_genres::Column::Id)
            .find_also_related(genres::Entity)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, genre)| genre.map(|g| g.name))
            .collect())
    }
}
