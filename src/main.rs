use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod catalog_store;
use catalog_store::{SqliteCatalogStore, TrackListing};

mod config;
use config::{AppConfig, CliConfig, FileConfig};

mod sqlite_persistence;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite catalog database file. Created with the full schema
    /// if it does not exist, validated against it if it does.
    #[clap(value_parser = parse_path)]
    pub catalog_db: Option<PathBuf>,

    /// Path to a TOML config file. Values set there override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Number of read-only connections in the pool.
    #[clap(long)]
    pub read_pool_size: Option<usize>,

    /// Recompute the cached num_tracks counters on Albums and Genres.
    #[clap(long)]
    pub refresh_counts: bool,

    /// Also pick one random track and print its audio features.
    #[clap(long)]
    pub random_track: bool,

    /// Emit the report as JSON instead of plain text.
    #[clap(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CatalogReport {
    relations: Vec<String>,
    artists: usize,
    albums: usize,
    tracks: usize,
    genres: usize,
    track_genre_links: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    random_track: Option<TrackListing>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!(
        "acoustic-db {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let file_config = cli_args.config.as_deref().map(FileConfig::load).transpose()?;
    let app_config = AppConfig::resolve(
        CliConfig {
            catalog_db: cli_args.catalog_db,
            read_pool_size: cli_args.read_pool_size,
        },
        file_config,
    )?;

    info!(
        "Opening SQLite catalog database at {:?}...",
        app_config.catalog_db
    );
    let store = SqliteCatalogStore::new(&app_config.catalog_db, app_config.read_pool_size)?;

    if cli_args.refresh_counts {
        store.refresh_cached_counts()?;
    }

    let report = CatalogReport {
        relations: store.list_relations()?,
        artists: store.get_artists_count(),
        albums: store.get_albums_count(),
        tracks: store.get_tracks_count(),
        genres: store.get_genres_count(),
        track_genre_links: store.get_track_genre_links_count(),
        random_track: if cli_args.random_track {
            store.random_track()?
        } else {
            None
        },
    };

    if cli_args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Relations: {}", report.relations.join(", "));
    println!(
        "{} artists, {} albums, {} tracks, {} genres, {} track-genre links",
        report.artists, report.albums, report.tracks, report.genres, report.track_genre_links
    );
    if let Some(listing) = &report.random_track {
        let track = &listing.track;
        println!(
            "Spontaneous song selection: {} by {}",
            track.title, listing.artist_name
        );
        println!(
            "  valence {:.3}, energy {:.3}, danceability {:.3}, acousticness {:.3}, \
             instrumentalness {:.3}, speechiness {:.3}, liveness {:.3}, tempo {:.1}",
            track.valence,
            track.energy,
            track.danceability,
            track.acousticness,
            track.instrumentalness,
            track.speechiness,
            track.liveness,
            track.tempo
        );
    }

    Ok(())
}
