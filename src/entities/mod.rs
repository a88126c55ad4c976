pub mod prelude;

pub mod favorites;
pub mod genres;
pub mod series;
pub mod series_genres;
pub mod user_genres;
pub mod users;
pub mod views;
pub mod watchlist;
