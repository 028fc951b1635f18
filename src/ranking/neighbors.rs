use serde::Serialize;

use super::ordering::sort_songs;
use super::stats::SongWithStats;

pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Where the focal song sits inside an unclamped window
const FOCAL_OFFSET: usize = 2;

/// One row of a ranking neighborhood
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborEntry {
    #[serde(flatten)]
    pub song: SongWithStats,
    pub rank: usize,
    pub is_current: bool,
}

/// The songs ranked just above and below `song_id`.
///
/// Sorts the whole collection from scratch, then takes a contiguous window
/// starting two places above the focal song, clamped to the list bounds.
/// Returns an empty list when the song is unknown.
pub fn ranking_neighborhood(
    songs: &[SongWithStats],
    song_id: &str,
    window_size: usize,
) -> Vec<NeighborEntry> {
    let sorted = sort_songs(songs.to_vec());
    let Some(index) = sorted.iter().position(|s| s.id() == song_id) else {
        return Vec::new();
    };

    let window = window_size.min(sorted.len());
    let start = index
        .saturating_sub(FOCAL_OFFSET)
        .min(sorted.len() - window);

    sorted
        .into_iter()
        .enumerate()
        .skip(start)
        .take(window)
        .map(|(position, song)| NeighborEntry {
            is_current: position == index,
            rank: position + 1,
            song,
        })
        .collect()
}
