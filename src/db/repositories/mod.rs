pub mod interactions;
pub mod recommendations;
pub mod series;
pub mod user;

use anyhow::Result;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::genres;

/// Find or create a genre node by display name. Lookup is
/// case-insensitive so "drama" and "Drama" converge to one row; the
/// stored display name is whichever spelling arrived first.
pub(crate) async fn ensure_genre(conn: &DatabaseConnection, name: &str) -> Result<i32> {
    let existing = genres::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((
                genres::Entity,
                genres::Column::Name,
            ))))
            .eq(name.to_lowercase()),
        )
        .one(conn)
        .await?;

    if let Some(genre) = existing {
        return Ok(genre.id);
    }

    let active = genres::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };

    match active.insert(conn).await {
        Ok(model) => Ok(model.id),
        // Lost a create race; the winner's row is what we want anyway.
        Err(_) => {
            let genre = genres::Entity::find()
                .filter(genres::Column::Name.eq(name))
                .one(conn)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Genre upsert race left no row for '{name}'"))?;
            Ok(genre.id)
        }
    }
}
