//! Referential-integrity behavior of the catalog schema: what the engine
//! must reject, and what it must deliberately let through.

mod common;

use acoustic_catalog::catalog_store::{
    Album, Artist, Explicit, Track, TrackGenre, ValidationError, CATALOG_SCHEMA,
};
use acoustic_catalog::SqliteCatalogStore;
use common::*;
use rusqlite::Connection;
use tempfile::TempDir;

fn plain_track(id: i64, artist_id: i64, album_id: Option<i64>, title: &str) -> Track {
    Track {
        id,
        artist_id,
        album_id,
        acousticness: 0.5,
        danceability: 0.5,
        energy: 0.5,
        instrumentalness: 0.5,
        liveness: 0.5,
        speechiness: 0.5,
        tempo: 120.0,
        valence: 0.5,
        duration: 180,
        explicit: Explicit::No,
        favorites: 0,
        listens: 0,
        title: title.to_string(),
    }
}

#[test]
fn relation_listing_is_exactly_the_five_catalog_tables() {
    let (_dir, store) = create_test_catalog().unwrap();
    assert_eq!(
        store.list_relations().unwrap(),
        vec!["Artists", "Albums", "Tracks", "Genres", "Track_Genres"]
    );
}

#[test]
fn album_insert_with_missing_artist_is_a_foreign_key_violation() {
    let (_dir, store) = create_test_catalog().unwrap();
    let result = store.insert_album(&Album {
        id: 999,
        artist_id: 12345,
        favorites: 0,
        listens: 0,
        num_tracks: 0,
        release_date: None,
        title: "Orphan".to_string(),
    });
    assert!(result.is_err());
    assert!(!store.album_exists(999).unwrap());
}

#[test]
fn track_insert_with_missing_references_fails_but_null_album_is_fine() {
    let (_dir, store) = create_test_catalog().unwrap();

    assert!(store
        .insert_track(&plain_track(900, 12345, None, "No Artist"))
        .is_err());
    assert!(store
        .insert_track(&plain_track(901, ARTIST_AWOL, Some(12345), "No Album"))
        .is_err());

    store
        .insert_track(&plain_track(902, ARTIST_AWOL, None, "Loose Single"))
        .unwrap();
    assert!(store.track_exists(902).unwrap());
}

#[test]
fn track_may_sit_on_an_album_owned_by_another_artist() {
    // The schema declares no cross-consistency between Track.artist_id and
    // the album's artist_id, so this must go through.
    let (_dir, store) = create_test_catalog().unwrap();
    store
        .insert_track(&plain_track(
            903,
            ARTIST_VILE,
            Some(ALBUM_WAY_OF_LIFE),
            "Guest Spot",
        ))
        .unwrap();

    let track = store.get_track(903).unwrap().unwrap();
    let album = store.get_album(ALBUM_WAY_OF_LIFE).unwrap().unwrap();
    assert_ne!(track.artist_id, album.artist_id);
}

#[test]
fn dangling_genre_links_fail_and_duplicate_links_are_allowed() {
    let (_dir, store) = create_test_catalog().unwrap();

    assert!(store
        .link_track_genre(&TrackGenre {
            track_id: 99999,
            genre_id: GENRE_POP,
        })
        .is_err());
    assert!(store
        .link_track_genre(&TrackGenre {
            track_id: TRACK_FOOD,
            genre_id: 99999,
        })
        .is_err());

    let links_before = store.get_track_genre_links_count();
    store
        .link_track_genre(&TrackGenre {
            track_id: TRACK_FOOD,
            genre_id: GENRE_HIP_HOP,
        })
        .unwrap();
    assert_eq!(store.get_track_genre_links_count(), links_before + 1);
}

#[test]
fn duplicate_primary_keys_are_rejected() {
    let (_dir, store) = create_test_catalog().unwrap();
    let result = store.insert_artist(&Artist {
        id: ARTIST_AWOL,
        favorites: 0,
        name: "Impostor".to_string(),
    });
    assert!(result.is_err());
}

#[test]
fn deleting_a_referenced_artist_is_rejected_by_the_engine() {
    let (dir, store) = create_test_catalog().unwrap();
    drop(store);

    let conn = Connection::open(dir.path().join("catalog.db")).unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    let result = conn.execute("DELETE FROM Artists WHERE id = ?1", [ARTIST_AWOL]);
    assert!(result.is_err());
}

#[test]
fn creating_a_child_table_before_its_parent_fails() {
    let conn = Connection::open_in_memory().unwrap();

    // Albums is declared second; on an empty database its artist_id
    // reference cannot resolve
    let result = CATALOG_SCHEMA.tables[1].create(&conn);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("has not been created"));
}

#[test]
fn opening_a_database_with_a_drifted_schema_fails_validation() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("catalog.db");

    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute(
            "CREATE TABLE Artists (id INTEGER PRIMARY KEY, name VARCHAR(60))",
            [],
        )
        .unwrap();
    }

    let result = SqliteCatalogStore::new(&db_path, 1);
    assert!(result.is_err());
    let err_msg = format!("{:#}", result.unwrap_err());
    assert!(err_msg.contains("does not match the declared schema"));
}

#[test]
fn write_time_validation_runs_before_the_engine_sees_the_row() {
    let (_dir, store) = create_test_catalog().unwrap();

    let err = store
        .insert_artist(&Artist {
            id: 500,
            favorites: 0,
            name: "x".repeat(61),
        })
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::Overlong { max: 60, .. })
    ));

    // A validation failure never reaches the database
    assert!(!store.artist_exists(500).unwrap());
}
