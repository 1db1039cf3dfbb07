//! Similar-album ranking over audio-feature profiles.
//!
//! The feature space is small and every score shares the same scale, so plain
//! cosine distance over per-genre album profiles is enough; nothing fancier
//! measurably beat it on this data.

use crate::catalog_store::{GenreAlbumProfile, Track};
use serde::Serialize;
use std::collections::HashSet;

/// Dimensions of the comparison space, in order: valence, danceability,
/// energy, acousticness, instrumentalness, speechiness, liveness. Tempo and
/// duration are dropped before comparing, as their scales would swamp the
/// normalized scores.
pub const FEATURE_DIMENSIONS: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FeatureVector(pub [f32; FEATURE_DIMENSIONS]);

impl FeatureVector {
    pub fn from_track(track: &Track) -> Self {
        FeatureVector([
            track.valence,
            track.danceability,
            track.energy,
            track.acousticness,
            track.instrumentalness,
            track.speechiness,
            track.liveness,
        ])
    }

    pub fn from_profile(profile: &GenreAlbumProfile) -> Self {
        FeatureVector([
            profile.valence,
            profile.danceability,
            profile.energy,
            profile.acousticness,
            profile.instrumentalness,
            profile.speechiness,
            profile.liveness,
        ])
    }

    /// Per-dimension mean over a set of vectors. None when the set is empty.
    pub fn mean(vectors: &[FeatureVector]) -> Option<FeatureVector> {
        if vectors.is_empty() {
            return None;
        }
        let mut sums = [0.0f32; FEATURE_DIMENSIONS];
        for vector in vectors {
            for (sum, value) in sums.iter_mut().zip(vector.0.iter()) {
                *sum += value;
            }
        }
        let count = vectors.len() as f32;
        for sum in sums.iter_mut() {
            *sum /= count;
        }
        Some(FeatureVector(sums))
    }
}

/// Cosine distance in [0, 2]. A zero-norm vector has no direction to compare,
/// so it is treated as maximally distant.
pub fn cosine_distance(a: &FeatureVector, b: &FeatureVector) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.0.iter().zip(b.0.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[derive(Clone, Debug, Serialize)]
pub struct AlbumRecommendation {
    pub album_id: i64,
    pub album_title: String,
    pub artist_name: String,
    pub genre_title: String,
    pub distance: f32,
}

/// Rank albums near `target` within each genre, keeping the `per_genre`
/// closest. An album recommended under one genre is skipped when it comes up
/// again under another.
pub fn similar_albums(
    target: &FeatureVector,
    profiles: &[GenreAlbumProfile],
    per_genre: usize,
) -> Vec<AlbumRecommendation> {
    let mut genres: Vec<i64> = Vec::new();
    for profile in profiles {
        if !genres.contains(&profile.genre_id) {
            genres.push(profile.genre_id);
        }
    }

    let mut seen_albums: HashSet<i64> = HashSet::new();
    let mut recommendations = Vec::new();
    for genre_id in genres {
        let mut ranked: Vec<(&GenreAlbumProfile, f32)> = profiles
            .iter()
            .filter(|p| p.genre_id == genre_id)
            .map(|p| (p, cosine_distance(target, &FeatureVector::from_profile(p))))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut taken = 0;
        for (profile, distance) in ranked {
            if taken == per_genre {
                break;
            }
            if !seen_albums.insert(profile.album_id) {
                continue;
            }
            recommendations.push(AlbumRecommendation {
                album_id: profile.album_id,
                album_title: profile.album_title.clone(),
                artist_name: profile.artist_name.clone(),
                genre_title: profile.genre_title.clone(),
                distance,
            });
            taken += 1;
        }
    }
    recommendations
}
