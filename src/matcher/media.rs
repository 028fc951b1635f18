use serde::{Deserialize, Serialize};

/// Kind of file that can be linked to a song
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Lrc,
}

impl MediaType {
    pub const AUDIO_EXTENSIONS: &'static [&'static str] =
        &["mp3", "flac", "wav", "m4a", "ogg", "aac"];
    pub const LYRIC_EXTENSIONS: &'static [&'static str] = &["lrc"];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Audio => "audio",
            MediaType::Lrc => "lrc",
        }
    }

    /// Classify a file by its extension, case-insensitively
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();

        if Self::AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaType::Audio)
        } else if Self::LYRIC_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaType::Lrc)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Store key for one song's linked file of one kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub song_id: String,
    pub media_type: MediaType,
}

impl MediaKey {
    pub fn new(song_id: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            song_id: song_id.into(),
            media_type,
        }
    }

    /// Both keys a song can own
    pub fn all_for(song_id: &str) -> [MediaKey; 2] {
        [
            MediaKey::new(song_id, MediaType::Audio),
            MediaKey::new(song_id, MediaType::Lrc),
        ]
    }
}

impl std::fmt::Display for MediaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.song_id, self.media_type)
    }
}
