//! SQLite-backed store for the FMA music-metadata catalog.
//!
//! Opens (or creates) the catalog database, enforces the declared schema, and
//! exposes the typed reads and writes the catalog supports. Referential
//! integrity is the engine's job; declared string lengths and counter signs
//! are checked here before rows are handed over.

use super::models::*;
use super::schema::CATALOG_SCHEMA;
use super::validation::{
    validate_album, validate_artist, validate_genre, validate_track, validate_track_genre,
};
use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

pub const DEFAULT_READ_POOL_SIZE: usize = 4;

const TRACK_COLUMNS: &str = "T.id, T.artist_id, T.album_id, T.acousticness, T.danceability, \
     T.energy, T.instrumentalness, T.liveness, T.speechiness, T.tempo, T.valence, \
     T.duration, T.explicit, T.favorites, T.listens, T.title";

/// Range filters over the track catalog, mirroring the browse surface of the
/// original archive: one closed interval per audio feature plus duration, and
/// the set of accepted explicit flags. The default matches everything.
#[derive(Clone, Debug)]
pub struct TrackFilter {
    pub valence: (f32, f32),
    pub energy: (f32, f32),
    pub danceability: (f32, f32),
    pub acousticness: (f32, f32),
    pub instrumentalness: (f32, f32),
    pub speechiness: (f32, f32),
    pub liveness: (f32, f32),
    pub tempo: (f32, f32),
    pub duration_secs: (i64, i64),
    pub explicit: Vec<Explicit>,
}

impl Default for TrackFilter {
    fn default() -> Self {
        TrackFilter {
            valence: (0.0, 1.0),
            energy: (0.0, 1.0),
            danceability: (0.0, 1.0),
            acousticness: (0.0, 1.0),
            instrumentalness: (0.0, 1.0),
            speechiness: (0.0, 1.0),
            liveness: (0.0, 1.0),
            tempo: (0.0, f32::MAX),
            duration_secs: (0, i64::MAX),
            explicit: vec![Explicit::No, Explicit::Yes, Explicit::Ambiguous],
        }
    }
}

/// SQLite-backed catalog store.
#[derive(Clone, Debug)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

impl SqliteCatalogStore {
    /// Open a catalog database, creating the schema on a fresh file and
    /// validating it on an existing one.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of connections for concurrent read operations (default: 4)
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open catalog database")?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        // Per-connection in SQLite, so every connection turns it on
        write_conn.pragma_update(None, "foreign_keys", "ON")?;

        let table_count: i64 = write_conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |r| r.get(0),
            )
            .unwrap_or(0);

        if table_count == 0 {
            info!("Creating catalog schema at {:?}", db_path_ref);
            CATALOG_SCHEMA.create(&write_conn)?;
        } else {
            #[cfg(not(feature = "no_checks"))]
            CATALOG_SCHEMA
                .validate(&write_conn)
                .context("Existing catalog database does not match the declared schema")?;
        }

        let artist_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM Artists", [], |r| r.get(0))
            .unwrap_or(0);
        let album_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM Albums", [], |r| r.get(0))
            .unwrap_or(0);
        let track_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM Tracks", [], |r| r.get(0))
            .unwrap_or(0);

        info!(
            "Opened FMA catalog: {} artists, {} albums, {} tracks",
            artist_count, album_count, track_count
        );

        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.pragma_update(None, "journal_mode", "WAL")?;
            read_conn.pragma_update(None, "foreign_keys", "ON")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// List the relations present in the database, in creation order. After
    /// schema creation this is exactly
    /// `Artists, Albums, Tracks, Genres, Track_Genres`.
    pub fn list_relations(&self) -> Result<Vec<String>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        )?;
        let names = stmt
            .query_map([], |r| r.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn count_table(&self, table: &str) -> usize {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
            r.get::<_, i64>(0)
        })
        .map(|n| n as usize)
        .unwrap_or(0)
    }

    pub fn get_artists_count(&self) -> usize {
        self.count_table("Artists")
    }

    pub fn get_albums_count(&self) -> usize {
        self.count_table("Albums")
    }

    pub fn get_tracks_count(&self) -> usize {
        self.count_table("Tracks")
    }

    pub fn get_genres_count(&self) -> usize {
        self.count_table("Genres")
    }

    pub fn get_track_genre_links_count(&self) -> usize {
        self.count_table("Track_Genres")
    }

    // =========================================================================
    // Row Parsers
    // =========================================================================

    fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
        Ok(Artist {
            id: row.get(0)?,
            favorites: row.get(1)?,
            name: row.get(2)?,
        })
    }

    fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
        Ok(Album {
            id: row.get(0)?,
            artist_id: row.get(1)?,
            favorites: row.get(2)?,
            listens: row.get(3)?,
            num_tracks: row.get(4)?,
            release_date: row.get(5)?,
            title: row.get(6)?,
        })
    }

    fn parse_track_row(row: &rusqlite::Row) -> rusqlite::Result<Track> {
        Ok(Track {
            id: row.get(0)?,
            artist_id: row.get(1)?,
            album_id: row.get(2)?,
            acousticness: row.get(3)?,
            danceability: row.get(4)?,
            energy: row.get(5)?,
            instrumentalness: row.get(6)?,
            liveness: row.get(7)?,
            speechiness: row.get(8)?,
            tempo: row.get(9)?,
            valence: row.get(10)?,
            duration: row.get(11)?,
            explicit: Explicit::from_flag(row.get(12)?),
            favorites: row.get(13)?,
            listens: row.get(14)?,
            title: row.get(15)?,
        })
    }

    fn parse_genre_row(row: &rusqlite::Row) -> rusqlite::Result<Genre> {
        Ok(Genre {
            id: row.get(0)?,
            num_tracks: row.get(1)?,
            title: row.get(2)?,
            genre_color: row.get(3)?,
        })
    }

    /// Genre titles linked to a track. Duplicate links, which the schema
    /// permits, show up as duplicate titles.
    fn get_track_genres(conn: &Connection, track_id: i64) -> Result<Vec<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT G.title FROM Track_Genres TG
             INNER JOIN Genres G ON TG.genre_id = G.id
             WHERE TG.track_id = ?1",
        )?;
        let genres = stmt
            .query_map(params![track_id], |r| r.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(genres)
    }

    // =========================================================================
    // Entity Retrieval
    // =========================================================================

    pub fn get_artist(&self, id: i64) -> Result<Option<Artist>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        match conn.query_row(
            "SELECT id, favorites, name FROM Artists WHERE id = ?1",
            params![id],
            Self::parse_artist_row,
        ) {
            Ok(artist) => Ok(Some(artist)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_album(&self, id: i64) -> Result<Option<Album>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        match conn.query_row(
            "SELECT id, artist_id, favorites, listens, num_tracks, release_date, title
             FROM Albums WHERE id = ?1",
            params![id],
            Self::parse_album_row,
        ) {
            Ok(album) => Ok(Some(album)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_track(&self, id: i64) -> Result<Option<Track>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM Tracks T WHERE T.id = ?1",
            TRACK_COLUMNS
        );
        match conn.query_row(&sql, params![id], Self::parse_track_row) {
            Ok(track) => Ok(Some(track)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_genre(&self, id: i64) -> Result<Option<Genre>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        match conn.query_row(
            "SELECT id, num_tracks, title, genre_color FROM Genres WHERE id = ?1",
            params![id],
            Self::parse_genre_row,
        ) {
            Ok(genre) => Ok(Some(genre)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn artist_exists(&self, id: i64) -> Result<bool> {
        Ok(self.get_artist(id)?.is_some())
    }

    pub fn album_exists(&self, id: i64) -> Result<bool> {
        Ok(self.get_album(id)?.is_some())
    }

    pub fn track_exists(&self, id: i64) -> Result<bool> {
        Ok(self.get_track(id)?.is_some())
    }

    pub fn genre_exists(&self, id: i64) -> Result<bool> {
        Ok(self.get_genre(id)?.is_some())
    }

    // =========================================================================
    // Typed Insert Operations
    // =========================================================================

    pub fn insert_artist(&self, artist: &Artist) -> Result<()> {
        validate_artist(artist)?;
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO Artists (id, favorites, name) VALUES (?1, ?2, ?3)",
            params![artist.id, artist.favorites, artist.name],
        )
        .with_context(|| format!("Failed to insert artist {}", artist.id))?;
        Ok(())
    }

    pub fn insert_album(&self, album: &Album) -> Result<()> {
        validate_album(album)?;
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO Albums (id, artist_id, favorites, listens, num_tracks, release_date, title)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                album.id,
                album.artist_id,
                album.favorites,
                album.listens,
                album.num_tracks,
                album.release_date,
                album.title
            ],
        )
        .with_context(|| format!("Failed to insert album {}", album.id))?;
        Ok(())
    }

    pub fn insert_track(&self, track: &Track) -> Result<()> {
        validate_track(track)?;
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO Tracks (id, artist_id, album_id, acousticness, danceability, energy,
                instrumentalness, liveness, speechiness, tempo, valence, duration, explicit,
                favorites, listens, title)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                track.id,
                track.artist_id,
                track.album_id,
                track.acousticness,
                track.danceability,
                track.energy,
                track.instrumentalness,
                track.liveness,
                track.speechiness,
                track.tempo,
                track.valence,
                track.duration,
                track.explicit.to_flag(),
                track.favorites,
                track.listens,
                track.title
            ],
        )
        .with_context(|| format!("Failed to insert track {}", track.id))?;
        Ok(())
    }

    pub fn insert_genre(&self, genre: &Genre) -> Result<()> {
        validate_genre(genre)?;
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO Genres (id, num_tracks, title, genre_color) VALUES (?1, ?2, ?3, ?4)",
            params![genre.id, genre.num_tracks, genre.title, genre.genre_color],
        )
        .with_context(|| format!("Failed to insert genre {}", genre.id))?;
        Ok(())
    }

    pub fn link_track_genre(&self, link: &TrackGenre) -> Result<()> {
        validate_track_genre(link)?;
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO Track_Genres (track_id, genre_id) VALUES (?1, ?2)",
            params![link.track_id, link.genre_id],
        )
        .with_context(|| {
            format!(
                "Failed to link track {} to genre {}",
                link.track_id, link.genre_id
            )
        })?;
        Ok(())
    }

    // =========================================================================
    // Cached Counters
    // =========================================================================

    /// Recompute the `num_tracks` caches on Albums and Genres from live rows.
    /// This is the hook for the external aggregation that owns those columns.
    pub fn refresh_cached_counts(&self) -> Result<()> {
        let conn = self.write_conn.lock().unwrap();
        let albums = conn.execute(
            "UPDATE Albums SET num_tracks =
                (SELECT COUNT(*) FROM Tracks WHERE Tracks.album_id = Albums.id)",
            [],
        )?;
        let genres = conn.execute(
            "UPDATE Genres SET num_tracks =
                (SELECT COUNT(*) FROM Track_Genres WHERE Track_Genres.genre_id = Genres.id)",
            [],
        )?;
        info!(
            "Refreshed cached track counts for {} albums and {} genres",
            albums, genres
        );
        Ok(())
    }

    // =========================================================================
    // Browse Queries
    // =========================================================================

    /// One random track with its artist name, album title, and genres.
    pub fn random_track(&self) -> Result<Option<TrackListing>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        let sql = format!(
            "SELECT {}, AR.name, AB.title
             FROM Tracks T
                 INNER JOIN Artists AR ON T.artist_id = AR.id
                 LEFT JOIN Albums AB ON T.album_id = AB.id
             ORDER BY RANDOM()
             LIMIT 1",
            TRACK_COLUMNS
        );
        let listing = match conn.query_row(&sql, [], |row| {
            Ok((Self::parse_track_row(row)?, row.get(16)?, row.get(17)?))
        }) {
            Ok((track, artist_name, album_title)) => {
                let genres = Self::get_track_genres(&conn, track.id)?;
                Some(TrackListing {
                    track,
                    artist_name,
                    album_title,
                    genres,
                })
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };
        Ok(listing)
    }

    /// Albums with their artist name. Albums without tracks or without a
    /// release date are not part of the browsable catalog.
    pub fn browse_albums(&self) -> Result<Vec<AlbumListing>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT Ab.id, Ab.artist_id, Ab.favorites, Ab.listens, Ab.num_tracks,
                    Ab.release_date, Ab.title, Ar.name
             FROM Albums Ab
                 INNER JOIN Artists Ar ON Ab.artist_id = Ar.id
             WHERE Ab.num_tracks <> 0 AND Ab.release_date IS NOT NULL
             ORDER BY Ab.id",
        )?;
        let listings = stmt
            .query_map([], |row| {
                Ok(AlbumListing {
                    album: Self::parse_album_row(row)?,
                    artist_name: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(listings)
    }

    /// Artists with a browsable album, their album count, and their
    /// most-favorited album.
    pub fn artist_overview(&self) -> Result<Vec<ArtistOverview>> {
        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT Ar.id, Ar.favorites, Ar.name, COUNT(Ab.id)
             FROM Artists Ar
                 INNER JOIN Albums Ab ON Ab.artist_id = Ar.id
             WHERE Ab.num_tracks <> 0 AND Ab.release_date IS NOT NULL
             GROUP BY Ar.id, Ar.favorites, Ar.name
             ORDER BY Ar.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((Self::parse_artist_row(row)?, row.get::<_, i64>(3)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut top_stmt = conn.prepare_cached(
            "SELECT title FROM Albums
             WHERE artist_id = ?1 AND num_tracks <> 0 AND release_date IS NOT NULL
             ORDER BY favorites DESC
             LIMIT 1",
        )?;
        let mut overviews = Vec::with_capacity(rows.len());
        for (artist, album_count) in rows {
            let top_album = match top_stmt.query_row(params![artist.id], |r| r.get(0)) {
                Ok(title) => Some(title),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            };
            overviews.push(ArtistOverview {
                artist,
                album_count,
                top_album,
            });
        }
        Ok(overviews)
    }

    /// Tracks matching the filter, joined with artist, album, and genres,
    /// ordered by listens descending. Tracks with no genre link never appear,
    /// mirroring the original browse surface.
    pub fn browse_tracks(&self, filter: &TrackFilter) -> Result<Vec<TrackListing>> {
        if filter.explicit.is_empty() {
            return Ok(Vec::new());
        }

        let explicit_placeholders = (0..filter.explicit.len())
            .map(|i| format!("?{}", 19 + i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {}, AR.name, AB.title
             FROM Tracks T
                 INNER JOIN Artists AR ON T.artist_id = AR.id
                 LEFT JOIN Albums AB ON T.album_id = AB.id
             WHERE EXISTS (SELECT 1 FROM Track_Genres TG WHERE TG.track_id = T.id)
               AND T.valence BETWEEN ?1 AND ?2
               AND T.energy BETWEEN ?3 AND ?4
               AND T.danceability BETWEEN ?5 AND ?6
               AND T.acousticness BETWEEN ?7 AND ?8
               AND T.instrumentalness BETWEEN ?9 AND ?10
               AND T.speechiness BETWEEN ?11 AND ?12
               AND T.liveness BETWEEN ?13 AND ?14
               AND T.tempo BETWEEN ?15 AND ?16
               AND T.duration BETWEEN ?17 AND ?18
               AND T.explicit IN ({})
             ORDER BY T.listens DESC",
            TRACK_COLUMNS, explicit_placeholders
        );

        let mut query_params: Vec<Value> = vec![
            (filter.valence.0 as f64).into(),
            (filter.valence.1 as f64).into(),
            (filter.energy.0 as f64).into(),
            (filter.energy.1 as f64).into(),
            (filter.danceability.0 as f64).into(),
            (filter.danceability.1 as f64).into(),
            (filter.acousticness.0 as f64).into(),
            (filter.acousticness.1 as f64).into(),
            (filter.instrumentalness.0 as f64).into(),
            (filter.instrumentalness.1 as f64).into(),
            (filter.speechiness.0 as f64).into(),
            (filter.speechiness.1 as f64).into(),
            (filter.liveness.0 as f64).into(),
            (filter.liveness.1 as f64).into(),
            (filter.tempo.0 as f64).into(),
            (filter.tempo.1 as f64).into(),
            filter.duration_secs.0.into(),
            filter.duration_secs.1.into(),
        ];
        for flag in &filter.explicit {
            query_params.push(flag.to_flag().into());
        }

        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(query_params), |row| {
                Ok((Self::parse_track_row(row)?, row.get(16)?, row.get(17)?))
            })?
            .collect::<Result<Vec<(Track, String, Option<String>)>, _>>()?;

        let mut listings = Vec::with_capacity(rows.len());
        for (track, artist_name, album_title) in rows {
            let genres = Self::get_track_genres(&conn, track.id)?;
            listings.push(TrackListing {
                track,
                artist_name,
                album_title,
                genres,
            });
        }
        Ok(listings)
    }

    /// An album's full track list with the owning artist, or None if the
    /// album does not exist.
    pub fn album_discography(&self, album_id: i64) -> Result<Option<AlbumDiscography>> {
        let album = match self.get_album(album_id)? {
            Some(album) => album,
            None => return Ok(None),
        };
        let artist = self
            .get_artist(album.artist_id)?
            .with_context(|| format!("Album {} references missing artist", album_id))?;

        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM Tracks T WHERE T.album_id = ?1 ORDER BY T.id",
            TRACK_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let album_tracks = stmt
            .query_map(params![album_id], Self::parse_track_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut tracks = Vec::with_capacity(album_tracks.len());
        for track in album_tracks {
            let genres = Self::get_track_genres(&conn, track.id)?;
            tracks.push(DiscographyTrack { track, genres });
        }

        Ok(Some(AlbumDiscography {
            album,
            artist,
            tracks,
        }))
    }

    /// Audio-feature profiles of browsable albums carrying any of the given
    /// genres, one row per (album, genre), with the given album excluded.
    /// Feature scores are averaged over the album's tracks, duration summed.
    pub fn genre_album_profiles(
        &self,
        genre_ids: &[i64],
        excluded_album_id: i64,
    ) -> Result<Vec<GenreAlbumProfile>> {
        if genre_ids.is_empty() {
            return Ok(Vec::new());
        }

        let genre_placeholders = (0..genre_ids.len())
            .map(|i| format!("?{}", 2 + i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT Ab.id, Ab.title, Ar.name, G.id, G.title,
                    AVG(T.valence), AVG(T.danceability), AVG(T.energy), AVG(T.acousticness),
                    AVG(T.instrumentalness), AVG(T.speechiness), AVG(T.liveness),
                    AVG(T.tempo), SUM(T.duration)
             FROM Albums Ab
                 INNER JOIN Tracks T ON Ab.id = T.album_id
                 INNER JOIN Artists Ar ON Ab.artist_id = Ar.id
                 INNER JOIN Track_Genres TG ON TG.track_id = T.id
                 INNER JOIN Genres G ON TG.genre_id = G.id
             WHERE Ab.num_tracks <> 0 AND Ab.release_date IS NOT NULL
               AND Ab.id <> ?1 AND G.id IN ({})
             GROUP BY Ab.id, Ab.title, Ar.name, G.id, G.title
             ORDER BY G.id, Ab.id",
            genre_placeholders
        );

        let mut query_params: Vec<Value> = vec![excluded_album_id.into()];
        for genre_id in genre_ids {
            query_params.push((*genre_id).into());
        }

        let conn = self.get_read_conn();
        let conn = conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let profiles = stmt
            .query_map(params_from_iter(query_params), |row| {
                Ok(GenreAlbumProfile {
                    album_id: row.get(0)?,
                    album_title: row.get(1)?,
                    artist_name: row.get(2)?,
                    genre_id: row.get(3)?,
                    genre_title: row.get(4)?,
                    valence: row.get::<_, f64>(5)? as f32,
                    danceability: row.get::<_, f64>(6)? as f32,
                    energy: row.get::<_, f64>(7)? as f32,
                    acousticness: row.get::<_, f64>(8)? as f32,
                    instrumentalness: row.get::<_, f64>(9)? as f32,
                    speechiness: row.get::<_, f64>(10)? as f32,
                    liveness: row.get::<_, f64>(11)? as f32,
                    tempo: row.get::<_, f64>(12)? as f32,
                    duration: row.get(13)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }
}
