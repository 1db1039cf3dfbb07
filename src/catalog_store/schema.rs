//! Relation declarations for the FMA music-metadata catalog.
//!
//! Five relations: Artists, Albums, Tracks, Genres and the Track_Genres
//! association. Declaration order is parent before child, so that every
//! foreign key resolves to an already-created table. Identifiers are assigned by the
//! data source, never generated here.

use crate::sqlite_column;
use crate::sqlite_persistence::{CatalogSchema, Column, ForeignKey, SqlType, Table};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "Artists",
    foreign_column: "id",
};

const ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "Albums",
    foreign_column: "id",
};

const TRACK_FK: ForeignKey = ForeignKey {
    foreign_table: "Tracks",
    foreign_column: "id",
};

const GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "Genres",
    foreign_column: "id",
};

/// Artists table - performer identity and popularity counter
const ARTISTS_TABLE: Table = Table {
    name: "Artists",
    columns: &[
        sqlite_column!("id", SqlType::Integer, is_primary_key = true),
        sqlite_column!("favorites", SqlType::Integer),
        sqlite_column!("name", SqlType::VarChar(60)),
    ],
};

/// Albums table - owned by exactly one artist
const ALBUMS_TABLE: Table = Table {
    name: "Albums",
    columns: &[
        sqlite_column!("id", SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "artist_id",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("favorites", SqlType::Integer),
        sqlite_column!("listens", SqlType::Integer),
        sqlite_column!("num_tracks", SqlType::Integer), // cached count, refreshed externally
        sqlite_column!("release_date", SqlType::Date),
        sqlite_column!("title", SqlType::VarChar(100)),
    ],
};

/// Tracks table - audio-feature scores plus counters. album_id is nullable:
/// a track may exist without an album. Nothing ties a track's artist_id to
/// its album's artist_id; that gap is deliberate and must stay observable.
const TRACKS_TABLE: Table = Table {
    name: "Tracks",
    columns: &[
        sqlite_column!("id", SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "artist_id",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("album_id", SqlType::Integer, foreign_key = Some(&ALBUM_FK)),
        sqlite_column!("acousticness", SqlType::Float),
        sqlite_column!("danceability", SqlType::Float),
        sqlite_column!("energy", SqlType::Float),
        sqlite_column!("instrumentalness", SqlType::Float),
        sqlite_column!("liveness", SqlType::Float),
        sqlite_column!("speechiness", SqlType::Float),
        sqlite_column!("tempo", SqlType::Float),
        sqlite_column!("valence", SqlType::Float),
        sqlite_column!("duration", SqlType::Integer),
        sqlite_column!("explicit", SqlType::Integer), // 0=no, 1=yes, -1=ambiguous
        sqlite_column!("favorites", SqlType::Integer),
        sqlite_column!("listens", SqlType::Integer),
        sqlite_column!("title", SqlType::VarChar(150)),
    ],
};

/// Genres table
const GENRES_TABLE: Table = Table {
    name: "Genres",
    columns: &[
        sqlite_column!("id", SqlType::Integer, is_primary_key = true),
        sqlite_column!("num_tracks", SqlType::Integer), // cached count, refreshed externally
        sqlite_column!("title", SqlType::VarChar(55)),
        sqlite_column!("genre_color", SqlType::Char(7)),
    ],
};

/// Track <-> Genre association. No uniqueness constraint is declared on the
/// pair: duplicate links are representable.
const TRACK_GENRES_TABLE: Table = Table {
    name: "Track_Genres",
    columns: &[
        sqlite_column!(
            "track_id",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&TRACK_FK)
        ),
        sqlite_column!(
            "genre_id",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&GENRE_FK)
        ),
    ],
};

/// FMA catalog schema, in load-bearing creation order.
pub const CATALOG_SCHEMA: CatalogSchema = CatalogSchema {
    tables: &[
        ARTISTS_TABLE,
        ALBUMS_TABLE,
        TRACKS_TABLE,
        GENRES_TABLE,
        TRACK_GENRES_TABLE,
    ],
};
