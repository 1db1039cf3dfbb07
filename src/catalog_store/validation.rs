//! Write-time validation for catalog entities.
//!
//! The engine enforces keys and references; declared string lengths it does
//! not (SQLite ignores VARCHAR bounds), so those are checked here before a
//! row is handed to the database.

use super::models::{Album, Artist, Genre, Track, TrackGenre};
use thiserror::Error;

pub const MAX_ARTIST_NAME: usize = 60;
pub const MAX_ALBUM_TITLE: usize = 100;
pub const MAX_TRACK_TITLE: usize = 150;
pub const MAX_GENRE_TITLE: usize = 55;
pub const GENRE_COLOR_LEN: usize = 7;

/// Errors raised before a row reaches the engine.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required but was empty")]
    EmptyField { field: &'static str },

    #[error("Field '{field}' exceeds {max} characters (got {len})")]
    Overlong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("Field '{field}' must be non-negative, got {value}")]
    NegativeValue { field: &'static str, value: i64 },

    #[error("genre_color must be a 7-character code like #29A329, got '{value}'")]
    BadColorCode { value: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_len(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::Overlong { field, max, len });
    }
    Ok(())
}

fn check_counter(field: &'static str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::NegativeValue { field, value });
    }
    Ok(())
}

pub fn validate_artist(artist: &Artist) -> ValidationResult<()> {
    check_len("name", &artist.name, MAX_ARTIST_NAME)?;
    check_counter("favorites", artist.favorites)?;
    Ok(())
}

pub fn validate_album(album: &Album) -> ValidationResult<()> {
    check_len("title", &album.title, MAX_ALBUM_TITLE)?;
    check_counter("favorites", album.favorites)?;
    check_counter("listens", album.listens)?;
    check_counter("num_tracks", album.num_tracks)?;
    Ok(())
}

pub fn validate_track(track: &Track) -> ValidationResult<()> {
    check_len("title", &track.title, MAX_TRACK_TITLE)?;
    check_counter("duration", track.duration)?;
    check_counter("favorites", track.favorites)?;
    check_counter("listens", track.listens)?;
    Ok(())
}

pub fn validate_genre(genre: &Genre) -> ValidationResult<()> {
    check_len("title", &genre.title, MAX_GENRE_TITLE)?;
    check_counter("num_tracks", genre.num_tracks)?;
    if genre.genre_color.chars().count() != GENRE_COLOR_LEN
        || !genre.genre_color.starts_with('#')
    {
        return Err(ValidationError::BadColorCode {
            value: genre.genre_color.clone(),
        });
    }
    Ok(())
}

/// Link rows carry nothing to check beyond their references, which the engine
/// resolves itself.
pub fn validate_track_genre(_link: &TrackGenre) -> ValidationResult<()> {
    Ok(())
}
