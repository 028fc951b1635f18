use super::countdown::PresentationSong;
use super::lyrics::LyricCue;

/// Index of the cue that should be on screen at `position` seconds: the
/// last cue whose time is not after `position`.
pub fn active_cue(cues: &[LyricCue], position: f64) -> Option<usize> {
    cues.partition_point(|cue| cue.time <= position).checked_sub(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Still on the same song
    Continue,
    /// Moved to the song at this index
    Advanced(usize),
    /// The best song finished; nothing left to reveal
    Finished,
}

/// Steps through a countdown sequence on a coarse timer.
///
/// Each song stays on screen for `slide_seconds`. When a song has linked
/// audio, `audio_position` maps the elapsed slide time onto the audio
/// timeline starting at the song's highlight offset, which is what lyric
/// cues are looked up against.
#[derive(Debug, Clone)]
pub struct CountdownPlayer {
    songs: Vec<PresentationSong>,
    slide_seconds: f64,
    index: usize,
    elapsed: f64,
    finished: bool,
}

impl CountdownPlayer {
    pub fn new(songs: Vec<PresentationSong>, slide_seconds: f64) -> Self {
        let finished = songs.is_empty();
        Self {
            songs,
            slide_seconds: slide_seconds.max(0.0),
            index: 0,
            elapsed: 0.0,
            finished,
        }
    }

    pub fn current(&self) -> Option<&PresentationSong> {
        if self.finished {
            return None;
        }
        self.songs.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn remaining_seconds(&self) -> f64 {
        (self.slide_seconds - self.elapsed).max(0.0)
    }

    /// Where in the current song's audio playback should be right now
    pub fn audio_position(&self) -> f64 {
        let start = self
            .current()
            .and_then(|p| p.song.song.highlight_start_time)
            .unwrap_or(0.0);
        start + self.elapsed
    }

    /// Advance the clock by `delta` seconds
    pub fn tick(&mut self, delta: f64) -> PlaybackEvent {
        if self.finished {
            return PlaybackEvent::Finished;
        }
        self.elapsed += delta.max(0.0);
        if self.elapsed < self.slide_seconds {
            return PlaybackEvent::Continue;
        }
        self.skip()
    }

    /// Skip to the next song regardless of the timer
    pub fn skip(&mut self) -> PlaybackEvent {
        if self.finished {
            return PlaybackEvent::Finished;
        }
        self.elapsed = 0.0;
        if self.index + 1 >= self.songs.len() {
            self.finished = true;
            return PlaybackEvent::Finished;
        }
        self.index += 1;
        PlaybackEvent::Advanced(self.index)
    }

    /// Go back one song and restart its timer. After the sequence has
    /// finished this replays the last song.
    pub fn back(&mut self) -> PlaybackEvent {
        if self.songs.is_empty() {
            return PlaybackEvent::Finished;
        }
        self.elapsed = 0.0;
        if self.finished {
            self.finished = false;
        } else {
            self.index = self.index.saturating_sub(1);
        }
        PlaybackEvent::Advanced(self.index)
    }
}
