pub mod catalog;
pub use catalog::{CatalogError, CatalogProvider};

pub mod genre_resolver;
pub use genre_resolver::GenreResolver;

pub mod recommendation;
pub use recommendation::{GraphQuery, RecommendationError, RecommendationService};

pub mod recommendation_impl;
pub use recommendation_impl::GraphRecommendationService;
