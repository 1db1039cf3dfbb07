//! Typed models for the catalog relations.
//!
//! Fields mirror the declared columns one to one. Audio-feature scores are
//! single precision, matching the FLOAT columns they come from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Explicit-lyrics flag. The source data is tri-state: alongside plain yes/no
/// there are tracks whose rating was never resolved, stored as -1.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Explicit {
    No,
    Yes,
    Ambiguous,
}

impl Explicit {
    /// Convert from the integer flag stored in the database
    pub fn from_flag(flag: i64) -> Self {
        match flag {
            1 => Explicit::Yes,
            0 => Explicit::No,
            _ => Explicit::Ambiguous,
        }
    }

    /// Convert to the integer flag stored in the database
    pub fn to_flag(&self) -> i64 {
        match self {
            Explicit::Yes => 1,
            Explicit::No => 0,
            Explicit::Ambiguous => -1,
        }
    }
}

/// Artist entity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub favorites: i64,
    pub name: String,
}

/// Album entity. `num_tracks` is a cached count maintained by external
/// aggregation, not derived on read.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub artist_id: i64,
    pub favorites: i64,
    pub listens: i64,
    pub num_tracks: i64,
    pub release_date: Option<NaiveDate>,
    pub title: String,
}

/// Track entity. `album_id` is optional: loose singles exist in the archive.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub artist_id: i64,
    pub album_id: Option<i64>,
    pub acousticness: f32,
    pub danceability: f32,
    pub energy: f32,
    pub instrumentalness: f32,
    pub liveness: f32,
    pub speechiness: f32,
    /// Beats per minute, not normalized like the other scores.
    pub tempo: f32,
    pub valence: f32,
    /// Seconds.
    pub duration: i64,
    pub explicit: Explicit,
    pub favorites: i64,
    pub listens: i64,
    pub title: String,
}

/// Genre entity. `genre_color` is a 7-character `#rrggbb` code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub num_tracks: i64,
    pub title: String,
    pub genre_color: String,
}

/// A single track <-> genre link. The schema allows duplicate pairs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackGenre {
    pub track_id: i64,
    pub genre_id: i64,
}

// =============================================================================
// Composite Read Types
// =============================================================================

/// Album joined with its owning artist's name, for catalog browsing.
#[derive(Clone, Debug, Serialize)]
pub struct AlbumListing {
    pub album: Album,
    pub artist_name: String,
}

/// Artist with album count and most-favorited album title.
#[derive(Clone, Debug, Serialize)]
pub struct ArtistOverview {
    pub artist: Artist,
    pub album_count: i64,
    pub top_album: Option<String>,
}

/// Track joined with artist name, optional album title, and genre titles.
#[derive(Clone, Debug, Serialize)]
pub struct TrackListing {
    pub track: Track,
    pub artist_name: String,
    pub album_title: Option<String>,
    pub genres: Vec<String>,
}

/// An album's full track list with the owning artist.
#[derive(Clone, Debug, Serialize)]
pub struct AlbumDiscography {
    pub album: Album,
    pub artist: Artist,
    pub tracks: Vec<DiscographyTrack>,
}

/// One track within a discography, with its genre titles.
#[derive(Clone, Debug, Serialize)]
pub struct DiscographyTrack {
    pub track: Track,
    pub genres: Vec<String>,
}

/// Per (album, genre) audio-feature profile: scores averaged over the album's
/// tracks, duration summed. Input to similar-album ranking.
#[derive(Clone, Debug, Serialize)]
pub struct GenreAlbumProfile {
    pub album_id: i64,
    pub album_title: String,
    pub artist_name: String,
    pub genre_id: i64,
    pub genre_title: String,
    pub valence: f32,
    pub danceability: f32,
    pub energy: f32,
    pub acousticness: f32,
    pub instrumentalness: f32,
    pub speechiness: f32,
    pub liveness: f32,
    pub tempo: f32,
    pub duration: i64,
}
