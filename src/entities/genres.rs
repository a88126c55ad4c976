use sea_orm::entity::prelude::*;

/// A genre node. Display name is stored as first seen; lookups match
/// case-insensitively so "drama" and "Drama" converge to one row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_genres::Entity")]
    UserGenres,
    #[sea_orm(has_many = "super::series_genres::Entity")]
    SeriesGenres,
}

impl Related<super::user_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGenres.def()
    }
}

impl Related<super::series_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeriesGenres.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
