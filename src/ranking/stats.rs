use serde::Serialize;
use tracing::debug;

use super::scoring::SongScoring;
use crate::models::{Album, Singer, Song};

/// A song annotated with its total and a snapshot of its owning album
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongWithStats {
    #[serde(flatten)]
    pub song: Song,
    pub total_score: f64,
    pub album_id: String,
    pub album_name: String,
    pub album_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_cover: Option<String>,
}

impl SongWithStats {
    pub fn new(song: Song, album: &Album) -> Self {
        Self {
            total_score: SongScoring::song_total(&song.scores),
            album_id: album.id.clone(),
            album_name: album.title.clone(),
            album_year: album.year.clone(),
            album_cover: album.cover_url.clone(),
            song,
        }
    }

    pub fn id(&self) -> &str {
        &self.song.id
    }
}

/// An album with its per-dimension averages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumWithStats {
    #[serde(flatten)]
    pub album: Album,
    pub average_lyrics: f64,
    pub average_composition: f64,
    pub average_arrangement: f64,
    pub average_total: f64,
}

impl AlbumWithStats {
    pub fn new(album: Album) -> Self {
        let averages = SongScoring::averages(&album.songs);
        Self {
            album,
            average_lyrics: averages.lyrics,
            average_composition: averages.composition,
            average_arrangement: averages.arrangement,
            average_total: averages.total,
        }
    }
}

/// Derived views over one singer. Recomputed on read, never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingerStats {
    pub albums_with_stats: Vec<AlbumWithStats>,
    /// Every song across every album, in album then track order
    pub all_songs: Vec<SongWithStats>,
}

/// Project a singer into its stats views. Does not touch the input.
pub fn enrich(singer: &Singer) -> SingerStats {
    let albums_with_stats: Vec<AlbumWithStats> = singer
        .albums
        .iter()
        .cloned()
        .map(AlbumWithStats::new)
        .collect();

    let all_songs: Vec<SongWithStats> = singer
        .albums
        .iter()
        .flat_map(|album| {
            album
                .songs
                .iter()
                .map(move |song| SongWithStats::new(song.clone(), album))
        })
        .collect();

    debug!(
        singer = %singer.name,
        albums = albums_with_stats.len(),
        songs = all_songs.len(),
        "enriched singer"
    );

    SingerStats {
        albums_with_stats,
        all_songs,
    }
}

/// Memoises `enrich` on an md5 fingerprint of the serialized singer.
///
/// Any edit to the singer changes its serialization and therefore the
/// fingerprint, so a lookup after a mutation always recomputes.
#[derive(Debug, Default)]
pub struct StatsCache {
    entry: Option<(md5::Digest, SingerStats)>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(singer: &Singer) -> Option<md5::Digest> {
        serde_json::to_vec(singer).ok().map(md5::compute)
    }

    pub fn stats(&mut self, singer: &Singer) -> SingerStats {
        let Some(fingerprint) = Self::fingerprint(singer) else {
            return enrich(singer);
        };

        if let Some((cached, stats)) = &self.entry {
            if *cached == fingerprint {
                return stats.clone();
            }
        }

        let stats = enrich(singer);
        self.entry = Some((fingerprint, stats.clone()));
        stats
    }

    pub fn is_warm_for(&self, singer: &Singer) -> bool {
        match (&self.entry, Self::fingerprint(singer)) {
            (Some((cached, _)), Some(fingerprint)) => *cached == fingerprint,
            _ => false,
        }
    }
}
