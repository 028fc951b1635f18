pub mod media;
pub mod normalize;
pub mod source;
pub mod store;

pub use media::*;
pub use normalize::*;
pub use source::*;
pub use store::*;

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::models::Song;

/// Result of one matching pass
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Every input song, in input order, with matched flags merged in
    pub updated_songs: Vec<Song>,
    pub matched_audio_count: usize,
    pub matched_lrc_count: usize,
}

/// Per-file progress reported while matching
#[derive(Debug)]
pub enum ScanEvent<'a> {
    Linked {
        file: &'a CandidateFile,
        song_id: &'a str,
        media_type: MediaType,
    },
    Unmatched {
        file: &'a CandidateFile,
    },
    Failed {
        file: &'a CandidateFile,
        song_id: &'a str,
        error: &'a StoreError,
    },
}

#[derive(Debug, Default, Clone, Copy)]
struct FlagUpdate {
    has_audio: bool,
    has_lrc: bool,
}

/// Link loose audio and lyric files to songs by fuzzy title match.
///
/// Files are handled one at a time in the order `files` yields them. Files
/// with unsupported extensions are ignored. Each supported file goes to the
/// first song, in catalog order, whose normalized title appears in the
/// normalized file name, and the link is written to `store`. A failed write
/// is logged and reported, and the scan moves on; counts and flags only
/// reflect successful writes.
pub fn match_files<I, S, F>(songs: &[Song], files: I, store: &mut S, mut on_event: F) -> MatchOutcome
where
    I: IntoIterator<Item = CandidateFile>,
    S: MediaStore + ?Sized,
    F: FnMut(ScanEvent<'_>),
{
    let mut updates: HashMap<&str, FlagUpdate> = HashMap::new();
    let mut matched_audio_count = 0;
    let mut matched_lrc_count = 0;

    for file in files {
        let Some(media_type) = MediaType::from_file_name(&file.name) else {
            continue;
        };

        let normalized = normalize_file_name(&file.name);
        let Some(song) = songs
            .iter()
            .find(|song| name_matches_title(&normalized, &song.title))
        else {
            debug!(file = %file.name, "no song matches file");
            on_event(ScanEvent::Unmatched { file: &file });
            continue;
        };

        let key = MediaKey::new(song.id.as_str(), media_type);
        if let Err(error) = store.put(&key, &file) {
            warn!(file = %file.name, key = %key, error = %error, "failed to store media link");
            on_event(ScanEvent::Failed {
                file: &file,
                song_id: &song.id,
                error: &error,
            });
            continue;
        }

        debug!(file = %file.name, song = %song.title, media = %media_type, "linked file");
        let update = updates.entry(song.id.as_str()).or_default();
        match media_type {
            MediaType::Audio => {
                update.has_audio = true;
                matched_audio_count += 1;
            }
            MediaType::Lrc => {
                update.has_lrc = true;
                matched_lrc_count += 1;
            }
        }
        on_event(ScanEvent::Linked {
            file: &file,
            song_id: &song.id,
            media_type,
        });
    }

    info!(
        audio = matched_audio_count,
        lyrics = matched_lrc_count,
        songs = updates.len(),
        "media scan finished"
    );

    let updated_songs = songs
        .iter()
        .map(|song| {
            let mut song = song.clone();
            if let Some(update) = updates.get(song.id.as_str()) {
                if update.has_audio {
                    song.has_audio = Some(true);
                }
                if update.has_lrc {
                    song.has_lrc = Some(true);
                }
            }
            song
        })
        .collect();

    MatchOutcome {
        updated_songs,
        matched_audio_count,
        matched_lrc_count,
    }
}
