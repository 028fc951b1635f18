use std::cmp::Ordering;
use std::collections::HashMap;

use clap::ValueEnum;

use super::ordering::{sort_songs, stable_sort_by};
use super::scoring::SongScoring;
use super::stats::SongWithStats;

/// Column a song table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    Title,
    AlbumYear,
    Lyrics,
    Composition,
    Arrangement,
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Sort display rows by a column.
///
/// Numeric columns treat differences below `SCORE_EPSILON` as ties, the
/// total column breaks ties on composition, and every remaining tie is
/// settled by the song's overall rank. Rank is unique per song, so the
/// ascending order is always the exact reverse of the descending one.
pub fn sort_table(
    rows: Vec<SongWithStats>,
    field: SortField,
    direction: SortDirection,
) -> Vec<SongWithStats> {
    let ranks: HashMap<String, usize> = sort_songs(rows.clone())
        .iter()
        .enumerate()
        .map(|(index, song)| (song.id().to_string(), index + 1))
        .collect();
    let rank_of = |song: &SongWithStats| ranks.get(song.id()).copied().unwrap_or(usize::MAX);

    let mut rows = rows;
    stable_sort_by(&mut rows, |a, b| {
        let by_field = compare_field(a, b, field);
        if by_field != Ordering::Equal {
            return direction.apply(by_field);
        }
        // Rank 1 is the "largest" song, hence the reversed comparison
        direction.apply(rank_of(b).cmp(&rank_of(a)))
    });
    rows
}

/// Ascending comparison on one column, including its declared tie-breaks
fn compare_field(a: &SongWithStats, b: &SongWithStats, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.song.title.cmp(&b.song.title),
        SortField::AlbumYear => compare_years(&a.album_year, &b.album_year),
        SortField::Lyrics => compare_numeric(a.song.scores.lyrics, b.song.scores.lyrics),
        SortField::Composition => {
            compare_numeric(a.song.scores.composition, b.song.scores.composition)
        }
        SortField::Arrangement => {
            compare_numeric(a.song.scores.arrangement, b.song.scores.arrangement)
        }
        SortField::Total => compare_numeric(a.total_score, b.total_score).then_with(|| {
            compare_numeric(a.song.scores.composition, b.song.scores.composition)
        }),
    }
}

fn compare_numeric(a: f64, b: f64) -> Ordering {
    if SongScoring::is_tie(a, b) {
        Ordering::Equal
    } else {
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
}

/// Years are strings; compare numerically when both sides parse
fn compare_years(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => compare_numeric(a, b),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Album, Score, Song};

    fn row(id: &str, title: &str, year: &str, scores: Score) -> SongWithStats {
        let album = Album::new(format!("album-{year}"), "Album", year);
        SongWithStats::new(Song::new(id, title).with_scores(scores), &album)
    }

    fn ids(rows: &[SongWithStats]) -> Vec<&str> {
        rows.iter().map(|s| s.id()).collect()
    }

    fn sample() -> Vec<SongWithStats> {
        vec![
            row("a", "Gamma", "1999", Score::new(7.0, 8.0, 6.0)),
            row("b", "alpha", "2003", Score::new(9.0, 6.0, 9.0)),
            row("c", "Beta", "1987", Score::new(7.0, 5.0, 9.0)),
            row("d", "Delta", "1999", Score::new(2.0, 2.0, 2.0)),
        ]
    }

    #[test]
    fn test_total_descending_matches_core_order() {
        let sorted = sort_table(sample(), SortField::Total, SortDirection::Descending);
        let core = sort_songs(sample());
        assert_eq!(ids(&sorted), ids(&core));
        // a and c tie on total (7.0); a wins on composition
        assert_eq!(ids(&sorted), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_title_is_lexicographic() {
        let sorted = sort_table(sample(), SortField::Title, SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_album_year_numeric_with_rank_fallback() {
        let sorted = sort_table(sample(), SortField::AlbumYear, SortDirection::Ascending);
        // a and d share 1999; a has the better rank so it comes last ascending
        assert_eq!(ids(&sorted), vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_non_numeric_years_fall_back_to_strings() {
        assert_eq!(compare_years("1999", "2000"), Ordering::Less);
        assert_eq!(compare_years("Unknown", "1999"), Ordering::Greater);
        assert_eq!(compare_years("10", "9"), Ordering::Greater);
    }

    #[test]
    fn test_direction_toggle_reverses_fully_tied_rows() {
        let tied: Vec<SongWithStats> = (0..6)
            .map(|i| row(&format!("t{i}"), "Same", "2000", Score::new(5.0, 5.0, 5.0)))
            .collect();

        let desc = sort_table(tied.clone(), SortField::Lyrics, SortDirection::Descending);
        let mut asc = sort_table(tied, SortField::Lyrics, SortDirection::Ascending);
        asc.reverse();
        assert_eq!(ids(&desc), ids(&asc));
        assert_eq!(ids(&desc), vec!["t0", "t1", "t2", "t3", "t4", "t5"]);
    }

    #[test]
    fn test_ascending_is_reverse_of_descending_for_every_field() {
        for field in SortField::value_variants() {
            let desc = sort_table(sample(), *field, SortDirection::Descending);
            let mut asc = sort_table(sample(), *field, SortDirection::Ascending);
            asc.reverse();
            assert_eq!(ids(&desc), ids(&asc), "field {field:?}");
        }
    }
}
