use crate::models::{Score, Song};

/// Totals closer than this are considered equal when ranking
pub const SCORE_EPSILON: f64 = 0.001;

/// Score math shared by the ranking and presentation code
pub struct SongScoring;

impl SongScoring {
    /// Arithmetic mean of the three dimensions. Not rounded.
    pub fn song_total(score: &Score) -> f64 {
        (score.lyrics + score.composition + score.arrangement) / 3.0
    }

    /// Average each dimension and the total over a set of songs.
    /// An empty set yields all zeros.
    pub fn averages(songs: &[Song]) -> ScoreAverages {
        if songs.is_empty() {
            return ScoreAverages::default();
        }

        let count = songs.len() as f64;
        let mut sums = ScoreAverages::default();
        for song in songs {
            sums.lyrics += song.scores.lyrics;
            sums.composition += song.scores.composition;
            sums.arrangement += song.scores.arrangement;
            sums.total += Self::song_total(&song.scores);
        }

        ScoreAverages {
            lyrics: sums.lyrics / count,
            composition: sums.composition / count,
            arrangement: sums.arrangement / count,
            total: sums.total / count,
        }
    }

    /// Two scores are tied when their difference is below `SCORE_EPSILON`
    pub fn is_tie(a: f64, b: f64) -> bool {
        (a - b).abs() < SCORE_EPSILON
    }
}

/// Per-dimension averages over a group of songs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAverages {
    pub lyrics: f64,
    pub composition: f64,
    pub arrangement: f64,
    pub total: f64,
}
