use sea_orm::entity::prelude::*;

/// A series node. The primary key is the catalog provider's stable id,
/// so rows are created lazily on first reference and refreshed
/// last-write-wins on every upsert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "series")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    pub name: String,

    pub poster_path: Option<String>,

    pub first_air_date: Option<String>,

    pub overview: Option<String>,

    pub popularity: f64,

    pub vote_average: f64,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::series_genres::Entity")]
    SeriesGenres,
    #[sea_orm(has_many = "super::favorites::Entity")]
    Favorites,
    #[sea_orm(has_many = "super::views::Entity")]
    Views,
}

impl Related<super::series_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeriesGenres.def()
    }
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl Related<super::views::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Views.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::SeriesSummary {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            poster_path: model.poster_path,
            first_air_date: model.first_air_date,
            overview: model.overview,
            popularity: model.popularity,
            vote_average: model.vote_average,
            genre_ids: Vec::new(),
            genres: Vec::new(),
        }
    }
}
