//! Shared fixture catalog for integration tests: two artists, four albums,
//! seven tracks across three genres, with the usual archive quirks included
//! (a loose single, a track without genres, an album without a release date,
//! an album without tracks).

// Not every test binary uses every fixture constant
#![allow(dead_code)]

use acoustic_catalog::catalog_store::{Album, Artist, Explicit, Genre, Track, TrackGenre};
use acoustic_catalog::SqliteCatalogStore;
use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;

pub const ARTIST_AWOL: i64 = 1;
pub const ARTIST_VILE: i64 = 10;

pub const ALBUM_WAY_OF_LIFE: i64 = 1;
pub const ALBUM_HITMAKER: i64 = 100;
pub const ALBUM_NIRIS: i64 = 200; // no release date
pub const ALBUM_EMPTY: i64 = 300; // no tracks

pub const TRACK_FOOD: i64 = 2;
pub const TRACK_ELECTRIC: i64 = 3;
pub const TRACK_THIS_WORLD: i64 = 5;
pub const TRACK_FREEWAY: i64 = 20; // loose single, no album
pub const TRACK_SKETCH: i64 = 21; // no genre links
pub const TRACK_STREET_MUSIC: i64 = 134;
pub const TRACK_NY: i64 = 201;

pub const GENRE_POP: i64 = 10;
pub const GENRE_ROCK: i64 = 12;
pub const GENRE_HIP_HOP: i64 = 21;

#[allow(clippy::too_many_arguments)]
fn track(
    id: i64,
    artist_id: i64,
    album_id: Option<i64>,
    title: &str,
    listens: i64,
    duration: i64,
    explicit: Explicit,
    features: [f32; 8], // valence, danceability, energy, acousticness, instrumentalness, speechiness, liveness, tempo
) -> Track {
    Track {
        id,
        artist_id,
        album_id,
        valence: features[0],
        danceability: features[1],
        energy: features[2],
        acousticness: features[3],
        instrumentalness: features[4],
        speechiness: features[5],
        liveness: features[6],
        tempo: features[7],
        duration,
        explicit,
        favorites: 0,
        listens,
        title: title.to_string(),
    }
}

/// Creates a temporary catalog database populated with the fixture data.
pub fn create_test_catalog() -> Result<(TempDir, SqliteCatalogStore)> {
    let dir = TempDir::new()?;
    let store = SqliteCatalogStore::new(dir.path().join("catalog.db"), 2)?;

    store.insert_artist(&Artist {
        id: ARTIST_AWOL,
        favorites: 9,
        name: "AWOL".to_string(),
    })?;
    store.insert_artist(&Artist {
        id: ARTIST_VILE,
        favorites: 35,
        name: "Kurt Vile".to_string(),
    })?;

    store.insert_genre(&Genre {
        id: GENRE_POP,
        num_tracks: 0,
        title: "Pop".to_string(),
        genre_color: "#2980B9".to_string(),
    })?;
    store.insert_genre(&Genre {
        id: GENRE_ROCK,
        num_tracks: 0,
        title: "Rock".to_string(),
        genre_color: "#C0392B".to_string(),
    })?;
    store.insert_genre(&Genre {
        id: GENRE_HIP_HOP,
        num_tracks: 0,
        title: "Hip-Hop".to_string(),
        genre_color: "#3B0B17".to_string(),
    })?;

    store.insert_album(&Album {
        id: ALBUM_WAY_OF_LIFE,
        artist_id: ARTIST_AWOL,
        favorites: 4,
        listens: 6073,
        num_tracks: 0,
        release_date: NaiveDate::from_ymd_opt(2009, 1, 5),
        title: "AWOL - A Way Of Life".to_string(),
    })?;
    store.insert_album(&Album {
        id: ALBUM_HITMAKER,
        artist_id: ARTIST_VILE,
        favorites: 15,
        listens: 47632,
        num_tracks: 0,
        release_date: NaiveDate::from_ymd_opt(2008, 10, 7),
        title: "Constant Hitmaker".to_string(),
    })?;
    store.insert_album(&Album {
        id: ALBUM_NIRIS,
        artist_id: ARTIST_VILE,
        favorites: 1,
        listens: 312,
        num_tracks: 0,
        release_date: None,
        title: "Niris".to_string(),
    })?;
    store.insert_album(&Album {
        id: ALBUM_EMPTY,
        artist_id: ARTIST_AWOL,
        favorites: 0,
        listens: 0,
        num_tracks: 0,
        release_date: NaiveDate::from_ymd_opt(2010, 3, 1),
        title: "Empty Sessions".to_string(),
    })?;

    store.insert_track(&track(
        TRACK_FOOD,
        ARTIST_AWOL,
        Some(ALBUM_WAY_OF_LIFE),
        "Food",
        1293,
        168,
        Explicit::No,
        [0.58, 0.67, 0.72, 0.42, 0.01, 0.16, 0.10, 165.9],
    ))?;
    store.insert_track(&track(
        TRACK_ELECTRIC,
        ARTIST_AWOL,
        Some(ALBUM_WAY_OF_LIFE),
        "Electric Ave",
        514,
        237,
        Explicit::No,
        [0.27, 0.59, 0.88, 0.07, 0.50, 0.25, 0.07, 126.2],
    ))?;
    store.insert_track(&track(
        TRACK_THIS_WORLD,
        ARTIST_AWOL,
        Some(ALBUM_WAY_OF_LIFE),
        "This World",
        1151,
        206,
        Explicit::Ambiguous,
        [0.12, 0.44, 0.62, 0.05, 0.91, 0.07, 0.37, 90.2],
    ))?;
    store.insert_track(&track(
        TRACK_SKETCH,
        ARTIST_AWOL,
        Some(ALBUM_WAY_OF_LIFE),
        "Untitled Sketch",
        44,
        95,
        Explicit::No,
        [0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 120.0],
    ))?;
    store.insert_track(&track(
        TRACK_STREET_MUSIC,
        ARTIST_VILE,
        Some(ALBUM_HITMAKER),
        "Street Music",
        9043,
        194,
        Explicit::Yes,
        [0.94, 0.77, 0.60, 0.18, 0.06, 0.09, 0.27, 111.6],
    ))?;
    store.insert_track(&track(
        TRACK_FREEWAY,
        ARTIST_VILE,
        None,
        "Freeway",
        7202,
        131,
        Explicit::No,
        [0.62, 0.52, 0.46, 0.66, 0.11, 0.04, 0.12, 100.0],
    ))?;
    store.insert_track(&track(
        TRACK_NY,
        ARTIST_VILE,
        Some(ALBUM_NIRIS),
        "Ny",
        300,
        300,
        Explicit::No,
        [0.33, 0.41, 0.38, 0.71, 0.22, 0.05, 0.19, 84.5],
    ))?;

    for (track_id, genre_id) in [
        (TRACK_FOOD, GENRE_HIP_HOP),
        (TRACK_ELECTRIC, GENRE_HIP_HOP),
        (TRACK_THIS_WORLD, GENRE_HIP_HOP),
        (TRACK_THIS_WORLD, GENRE_POP),
        (TRACK_STREET_MUSIC, GENRE_POP),
        (TRACK_FREEWAY, GENRE_ROCK),
        (TRACK_NY, GENRE_ROCK),
    ] {
        store.link_track_genre(&TrackGenre { track_id, genre_id })?;
    }

    store.refresh_cached_counts()?;

    Ok((dir, store))
}
