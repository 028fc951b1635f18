use serde::Serialize;

use crate::models::Singer;
use crate::ranking::{enrich, sort_songs, SongWithStats};

/// A song in the countdown, carrying its overall rank (1 = best)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationSong {
    #[serde(flatten)]
    pub song: SongWithStats,
    pub rank: usize,
}

/// Build the reveal order for a singer: worst song first, best song last.
///
/// Ranks come from the core ordering and are unaffected by the reversal.
/// A singer without songs yields an empty sequence.
pub fn build_countdown(singer: &Singer) -> Vec<PresentationSong> {
    let stats = enrich(singer);
    let mut sequence: Vec<PresentationSong> = sort_songs(stats.all_songs)
        .into_iter()
        .enumerate()
        .map(|(index, song)| PresentationSong {
            song,
            rank: index + 1,
        })
        .collect();
    sequence.reverse();
    sequence
}
