use std::collections::HashMap;

use tracing::warn;

use super::sanitize::generate_id;
use crate::matcher::MediaKey;
use crate::models::{Album, Score, Singer, Song};

/// Look a singer up by id, or by name ignoring case
pub fn find_singer<'a>(catalog: &'a [Singer], query: &str) -> Option<&'a Singer> {
    catalog
        .iter()
        .find(|s| s.id == query)
        .or_else(|| catalog.iter().find(|s| s.name.eq_ignore_ascii_case(query)))
}

pub fn find_singer_mut<'a>(catalog: &'a mut [Singer], query: &str) -> Option<&'a mut Singer> {
    let index = catalog
        .iter()
        .position(|s| s.id == query)
        .or_else(|| catalog.iter().position(|s| s.name.eq_ignore_ascii_case(query)))?;
    catalog.get_mut(index)
}

/// Edits over a singer value. Every method consumes the singer and returns
/// the edited one; edits that name a missing album or song are no-ops.
impl Singer {
    pub fn create(name: impl Into<String>) -> Self {
        Singer {
            id: generate_id(),
            name: name.into(),
            albums: Vec::new(),
        }
    }

    pub fn add_album(mut self, title: impl Into<String>, year: impl Into<String>) -> Self {
        self.albums.push(Album::new(generate_id(), title, year));
        self
    }

    pub fn add_song(self, album_id: &str, title: impl Into<String>) -> Self {
        self.seed_songs(album_id, [title.into()])
    }

    /// Append one unscored song per title, e.g. from the song-list service
    pub fn seed_songs<I, T>(mut self, album_id: &str, titles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        if let Some(album) = self.albums.iter_mut().find(|a| a.id == album_id) {
            album
                .songs
                .extend(titles.into_iter().map(|title| Song::new(generate_id(), title)));
        }
        self
    }

    pub fn update_scores(self, song_id: &str, scores: Score) -> Self {
        self.edit_song(song_id, |song| song.scores = scores)
    }

    pub fn rename_song(self, song_id: &str, title: impl Into<String>) -> Self {
        let title = title.into();
        self.edit_song(song_id, |song| song.title = title)
    }

    pub fn set_comment(self, song_id: &str, comment: Option<String>) -> Self {
        self.edit_song(song_id, |song| song.comment = comment)
    }

    pub fn set_highlight_start(self, song_id: &str, seconds: Option<f64>) -> Self {
        self.edit_song(song_id, |song| song.highlight_start_time = seconds)
    }

    /// Move a song within its album. Indices outside the album leave the
    /// singer untouched.
    pub fn move_song(mut self, album_id: &str, from: usize, to: usize) -> Self {
        let Some(album) = self.albums.iter_mut().find(|a| a.id == album_id) else {
            return self;
        };
        if from >= album.songs.len() || to >= album.songs.len() {
            warn!(album = %album.title, from, to, len = album.songs.len(), "song move out of range");
            return self;
        }
        let song = album.songs.remove(from);
        album.songs.insert(to, song);
        self
    }

    /// Reset every score of every song to zero
    pub fn clear_scores(mut self) -> Self {
        for song in self.albums.iter_mut().flat_map(|a| a.songs.iter_mut()) {
            song.scores = Score::default();
        }
        self
    }

    /// Remove a song. Returns the media keys whose file links should be
    /// released alongside it.
    pub fn delete_song(mut self, song_id: &str) -> (Self, Vec<MediaKey>) {
        let mut released = Vec::new();
        for album in &mut self.albums {
            let before = album.songs.len();
            album.songs.retain(|s| s.id != song_id);
            if album.songs.len() != before {
                released.extend(MediaKey::all_for(song_id));
            }
        }
        (self, released)
    }

    pub fn delete_album(mut self, album_id: &str) -> (Self, Vec<MediaKey>) {
        let mut released = Vec::new();
        self.albums.retain(|album| {
            if album.id != album_id {
                return true;
            }
            released.extend(album.songs.iter().flat_map(|s| MediaKey::all_for(&s.id)));
            false
        });
        (self, released)
    }

    /// Media keys owned by every song of this singer
    pub fn media_keys(&self) -> Vec<MediaKey> {
        self.songs().flat_map(|s| MediaKey::all_for(&s.id)).collect()
    }

    /// Merge the media flags from matcher output back in, by id. Only
    /// `has_audio` and `has_lrc` are taken from `updated`, so edits made
    /// while a scan was running survive. Songs deleted meanwhile are ignored.
    pub fn apply_song_updates(mut self, updated: &[Song]) -> Self {
        let by_id: HashMap<&str, &Song> = updated.iter().map(|s| (s.id.as_str(), s)).collect();
        for song in self.albums.iter_mut().flat_map(|a| a.songs.iter_mut()) {
            let Some(update) = by_id.get(song.id.as_str()) else {
                continue;
            };
            if update.has_audio == Some(true) {
                song.has_audio = Some(true);
            }
            if update.has_lrc == Some(true) {
                song.has_lrc = Some(true);
            }
        }
        self
    }

    fn edit_song<F>(mut self, song_id: &str, edit: F) -> Self
    where
        F: FnOnce(&mut Song),
    {
        if let Some(song) = self
            .albums
            .iter_mut()
            .flat_map(|a| a.songs.iter_mut())
            .find(|s| s.id == song_id)
        {
            edit(song);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MediaType;

    fn singer() -> Singer {
        let mut first = Album::new("a1", "First", "1970");
        first.songs = vec![Song::new("s1", "One"), Song::new("s2", "Two"), Song::new("s3", "Three")];
        let mut second = Album::new("a2", "Second", "1972");
        second.songs = vec![Song::new("s4", "Four")];
        Singer {
            id: "id-1".to_string(),
            name: "The Quiet Ones".to_string(),
            albums: vec![first, second],
        }
    }

    fn titles(album: &Album) -> Vec<&str> {
        album.songs.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_find_singer_by_id_or_name() {
        let catalog = vec![singer()];
        assert!(find_singer(&catalog, "id-1").is_some());
        assert!(find_singer(&catalog, "the quiet ones").is_some());
        assert!(find_singer(&catalog, "someone else").is_none());
    }

    #[test]
    fn test_create_and_seed() {
        let singer = Singer::create("New Artist").add_album("Debut", "2024");
        let album_id = singer.albums[0].id.clone();
        let singer = singer
            .seed_songs(&album_id, ["Intro", "Single"])
            .add_song(&album_id, "Closer");

        assert_eq!(titles(&singer.albums[0]), vec!["Intro", "Single", "Closer"]);
        assert!(singer.albums[0].songs.iter().all(|s| s.scores == Score::default()));
    }

    #[test]
    fn test_song_edits() {
        let edited = singer()
            .update_scores("s2", Score::new(8.0, 7.0, 6.0))
            .rename_song("s2", "Deux")
            .set_comment("s2", Some("live favourite".to_string()))
            .set_highlight_start("s2", Some(31.0))
            .update_scores("missing", Score::new(1.0, 1.0, 1.0));

        let song = &edited.albums[0].songs[1];
        assert_eq!(song.title, "Deux");
        assert_eq!(song.scores, Score::new(8.0, 7.0, 6.0));
        assert_eq!(song.comment.as_deref(), Some("live favourite"));
        assert_eq!(song.highlight_start_time, Some(31.0));
    }

    #[test]
    fn test_move_song_within_album() {
        let moved = singer().move_song("a1", 0, 2);
        assert_eq!(titles(&moved.albums[0]), vec!["Two", "Three", "One"]);
        assert_eq!(titles(&moved.albums[1]), vec!["Four"]);
    }

    #[test]
    fn test_move_song_out_of_range_is_noop() {
        assert_eq!(singer().move_song("a1", 0, 3), singer());
        assert_eq!(singer().move_song("a2", 5, 0), singer());
    }

    #[test]
    fn test_clear_scores() {
        let cleared = singer()
            .update_scores("s1", Score::new(5.0, 5.0, 5.0))
            .update_scores("s4", Score::new(9.0, 9.0, 9.0))
            .clear_scores();
        assert!(cleared.songs().all(|s| s.scores == Score::default()));
    }

    #[test]
    fn test_delete_song_releases_media_keys() {
        let (singer, released) = singer().delete_song("s2");
        assert_eq!(titles(&singer.albums[0]), vec!["One", "Three"]);
        assert_eq!(
            released,
            vec![MediaKey::new("s2", MediaType::Audio), MediaKey::new("s2", MediaType::Lrc)]
        );

        let (_, released) = singer.delete_song("s2");
        assert!(released.is_empty());
    }

    #[test]
    fn test_delete_album_releases_all_song_keys() {
        let (singer, released) = singer().delete_album("a1");
        assert_eq!(singer.albums.len(), 1);
        assert_eq!(released.len(), 6);
        assert_eq!(singer.media_keys().len(), 2);
    }

    #[test]
    fn test_apply_song_updates() {
        let mut linked = Song::new("s3", "Three");
        linked.has_audio = Some(true);
        let updated = singer().apply_song_updates(&[linked.clone()]);

        assert_eq!(updated.albums[0].songs[2], linked);
        assert_eq!(updated.albums[0].songs[0], Song::new("s1", "One"));
    }

    #[test]
    fn test_late_scan_result_keeps_newer_edits() {
        let before_scan = singer();
        let mut scanned = before_scan.songs().cloned().collect::<Vec<_>>();
        scanned[0].has_audio = Some(true);
        scanned[1].has_lrc = Some(true);

        let edited = before_scan
            .update_scores("s1", Score::new(9.0, 9.0, 9.0))
            .rename_song("s2", "Deux")
            .delete_song("s3")
            .0;
        let merged = edited.apply_song_updates(&scanned);

        let first = &merged.albums[0].songs[0];
        assert_eq!(first.scores, Score::new(9.0, 9.0, 9.0));
        assert_eq!(first.has_audio, Some(true));

        let second = &merged.albums[0].songs[1];
        assert_eq!(second.title, "Deux");
        assert_eq!(second.has_lrc, Some(true));
        assert_eq!(merged.song_count(), 3);
    }
}
