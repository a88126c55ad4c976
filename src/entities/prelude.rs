pub use super::favorites::Entity as Favorites;
pub use super::genres::Entity as Genres;
pub use super::series::Entity as Series;
pub use super::series_genres::Entity as SeriesGenres;
pub use super::user_genres::Entity as UserGenres;
pub use super::users::Entity as Users;
pub use super::views::Entity as Views;
pub use super::watchlist::Entity as Watchlist;
