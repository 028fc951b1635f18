use serde::{Deserialize, Serialize};

/// The three independent quality axes a song is rated on
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub lyrics: f64,
    #[serde(default)]
    pub composition: f64,
    #[serde(default)]
    pub arrangement: f64,
}

impl Score {
    pub fn new(lyrics: f64, composition: f64, arrangement: f64) -> Self {
        Self {
            lyrics,
            composition,
            arrangement,
        }
    }
}

/// A song as stored in the catalog. Owned by exactly one album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub scores: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_audio: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_lrc: Option<bool>,
    /// Seconds into the linked audio where playback should start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_start_time: Option<f64>,
}

impl Song {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            scores: Score::default(),
            comment: None,
            has_audio: None,
            has_lrc: None,
            highlight_start_time: None,
        }
    }

    pub fn with_scores(mut self, scores: Score) -> Self {
        self.scores = scores;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: String,
    /// Free-form; only parsed as a number when sorting
    pub year: String,
    /// Opaque encoded image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Track order chosen by the user, independent of rank
    #[serde(default)]
    pub songs: Vec<Song>,
}

impl Album {
    pub fn new(id: impl Into<String>, title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: year.into(),
            cover_url: None,
            songs: Vec::new(),
        }
    }
}

/// A performing artist and their discography
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Singer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub albums: Vec<Album>,
}

impl Singer {
    pub fn songs(&self) -> impl Iterator<Item = &Song> {
        self.albums.iter().flat_map(|album| album.songs.iter())
    }

    pub fn song_count(&self) -> usize {
        self.albums.iter().map(|album| album.songs.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let song = Song::new("s1", "Yesterday").with_scores(Score::new(9.0, 8.0, 7.0));
        let json = serde_json::to_value(&song).unwrap();

        assert_eq!(json["title"], "Yesterday");
        assert_eq!(json["scores"]["composition"], 8.0);
        assert!(json.get("hasAudio").is_none());
        assert!(json.get("comment").is_none());
    }

    #[test]
    fn test_camel_case_field_names() {
        let mut song = Song::new("s1", "Help!");
        song.has_lrc = Some(true);
        song.highlight_start_time = Some(42.5);
        let mut album = Album::new("a1", "Help!", "1965");
        album.cover_url = Some("data:image/png;base64,AAAA".to_string());
        album.songs.push(song);

        let json = serde_json::to_value(&album).unwrap();
        assert_eq!(json["coverUrl"], "data:image/png;base64,AAAA");
        assert_eq!(json["songs"][0]["hasLrc"], true);
        assert_eq!(json["songs"][0]["highlightStartTime"], 42.5);
    }

    #[test]
    fn test_missing_score_dimensions_default_to_zero() {
        let song: Song =
            serde_json::from_str(r#"{"id":"x","title":"X","scores":{"lyrics":5}}"#).unwrap();
        assert_eq!(song.scores, Score::new(5.0, 0.0, 0.0));
    }
}
