use std::cmp::Ordering;

use super::scoring::SongScoring;
use super::stats::{AlbumWithStats, SongWithStats};

/// Core ranking order: total descending with epsilon ties, then composition
/// descending. Anything still tied compares `Equal`.
pub fn compare_songs(a: &SongWithStats, b: &SongWithStats) -> Ordering {
    if !SongScoring::is_tie(a.total_score, b.total_score) {
        return compare_desc(a.total_score, b.total_score);
    }
    compare_desc(a.song.scores.composition, b.song.scores.composition)
}

fn compare_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Sort songs best first. Stable: equal songs keep their encounter order.
pub fn sort_songs(mut songs: Vec<SongWithStats>) -> Vec<SongWithStats> {
    stable_sort_by(&mut songs, compare_songs);
    songs
}

/// 1-based rank of a song within the whole collection
pub fn song_rank(songs: &[SongWithStats], song_id: &str) -> Option<usize> {
    let sorted = sort_songs(songs.to_vec());
    sorted
        .iter()
        .position(|s| s.id() == song_id)
        .map(|index| index + 1)
}

/// Sort albums by average total, best first. Ties keep album order.
pub fn rank_albums(mut albums: Vec<AlbumWithStats>) -> Vec<AlbumWithStats> {
    albums.sort_by(|a, b| b.average_total.total_cmp(&a.average_total));
    albums
}

/// 1-based rank of an album by average total
pub fn album_rank(albums: &[AlbumWithStats], album_id: &str) -> Option<usize> {
    rank_albums(albums.to_vec())
        .iter()
        .position(|a| a.album.id == album_id)
        .map(|index| index + 1)
}

/// Stable merge sort that tolerates comparators which are not a strict
/// total order. Epsilon ties are not transitive and std's sort may panic
/// when it detects an inconsistent comparator.
pub(crate) fn stable_sort_by<T, F>(items: &mut Vec<T>, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return;
    }
    let taken = std::mem::take(items);
    *items = merge_sort(taken, &mut compare);
}

fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare);
    let right = merge_sort(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) == Ordering::Greater,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Album, Score, Song};

    fn scored(id: &str, total: f64, composition: f64) -> SongWithStats {
        let album = Album::new("album", "Album", "2000");
        let mut song = SongWithStats::new(
            Song::new(id, id).with_scores(Score::new(0.0, composition, 0.0)),
            &album,
        );
        song.total_score = total;
        song
    }

    fn ids(songs: &[SongWithStats]) -> Vec<&str> {
        songs.iter().map(|s| s.id()).collect()
    }

    #[test]
    fn test_sorts_by_total_descending() {
        let sorted = sort_songs(vec![
            scored("low", 3.0, 9.0),
            scored("high", 9.0, 1.0),
            scored("mid", 6.0, 5.0),
        ]);
        assert_eq!(ids(&sorted), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_epsilon_tie_falls_back_to_composition() {
        let a = scored("a", 7.0, 8.0);
        let b = scored("b", 7.0005, 5.0);
        assert_eq!(compare_songs(&a, &b), Ordering::Less);

        let sorted = sort_songs(vec![b, a]);
        assert_eq!(ids(&sorted), vec!["a", "b"]);
    }

    #[test]
    fn test_full_ties_keep_encounter_order() {
        let songs = vec![
            scored("first", 5.0, 5.0),
            scored("second", 5.0, 5.0),
            scored("better", 8.0, 1.0),
            scored("third", 5.0002, 5.0),
        ];
        let sorted = sort_songs(songs.clone());
        assert_eq!(ids(&sorted), vec!["better", "first", "second", "third"]);
        assert_eq!(sort_songs(sorted.clone()), sorted);
    }

    #[test]
    fn test_non_transitive_epsilon_chain_does_not_panic() {
        let songs: Vec<SongWithStats> = (0..200)
            .map(|i| scored(&format!("s{i}"), 5.0 + (i % 7) as f64 * 0.0006, (i % 3) as f64))
            .collect();
        let sorted = sort_songs(songs);
        assert_eq!(sorted.len(), 200);
    }

    #[test]
    fn test_song_rank() {
        let songs = vec![scored("a", 4.0, 0.0), scored("b", 8.0, 0.0), scored("c", 6.0, 0.0)];
        assert_eq!(song_rank(&songs, "b"), Some(1));
        assert_eq!(song_rank(&songs, "a"), Some(3));
        assert_eq!(song_rank(&songs, "missing"), None);
    }

    #[test]
    fn test_album_rank_is_stable_on_ties() {
        let album = |id: &str, total: f64| {
            let mut stats = AlbumWithStats::new(Album::new(id, id, "1999"));
            stats.average_total = total;
            stats
        };
        let albums = vec![album("x", 5.0), album("y", 7.0), album("z", 5.0)];

        let ranked = rank_albums(albums.clone());
        let order: Vec<&str> = ranked.iter().map(|a| a.album.id.as_str()).collect();
        assert_eq!(order, vec!["y", "x", "z"]);
        assert_eq!(album_rank(&albums, "z"), Some(3));
        assert_eq!(album_rank(&albums, "nope"), None);
    }
}
