pub mod series;

pub use series::{CatalogGenre, ListKind, SearchPage, SeriesSummary};
