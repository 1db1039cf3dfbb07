mod models;
mod schema;
mod store;
mod validation;

pub use models::*;
pub use schema::CATALOG_SCHEMA;
pub use store::{SqliteCatalogStore, TrackFilter, DEFAULT_READ_POOL_SIZE};
pub use validation::{
    validate_album, validate_artist, validate_genre, validate_track, validate_track_genre,
    ValidationError, ValidationResult,
};
