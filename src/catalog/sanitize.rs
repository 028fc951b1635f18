use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::{Album, Score, Singer, Song};

pub const UNKNOWN_SINGER: &str = "Unknown Singer";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_SONG: &str = "Unknown Song";
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Leading float literal, the way a lenient `parseFloat` reads it
static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float regex")
});

static EMPTY_RECORD: Lazy<Map<String, Value>> = Lazy::new(Map::new);

/// Turn an untyped JSON tree into a well-formed catalog.
///
/// Never fails: anything that is not an array yields an empty catalog, and
/// every missing or mistyped field falls back to a default.
pub fn sanitize_catalog(value: &Value) -> Vec<Singer> {
    let Some(singers) = value.as_array() else {
        return Vec::new();
    };
    singers.iter().map(sanitize_singer).collect()
}

pub fn sanitize_singer(value: &Value) -> Singer {
    let record = as_record(value);
    Singer {
        id: string_field(record, "id").unwrap_or_else(generate_id),
        name: string_field(record, "name").unwrap_or_else(|| UNKNOWN_SINGER.to_string()),
        albums: array_field(record, "albums")
            .iter()
            .map(sanitize_album)
            .collect(),
    }
}

pub fn sanitize_album(value: &Value) -> Album {
    let record = as_record(value);
    let year = match record.get("year") {
        Some(Value::String(year)) => year.clone(),
        Some(Value::Number(year)) => year.to_string(),
        _ => UNKNOWN_YEAR.to_string(),
    };

    Album {
        id: string_field(record, "id").unwrap_or_else(generate_id),
        title: string_field(record, "title").unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
        year,
        cover_url: string_field(record, "coverUrl"),
        songs: array_field(record, "songs").iter().map(sanitize_song).collect(),
    }
}

pub fn sanitize_song(value: &Value) -> Song {
    let record = as_record(value);
    Song {
        id: string_field(record, "id").unwrap_or_else(generate_id),
        title: string_field(record, "title").unwrap_or_else(|| UNKNOWN_SONG.to_string()),
        scores: sanitize_scores(record),
        comment: string_field(record, "comment"),
        has_audio: record.get("hasAudio").and_then(Value::as_bool),
        has_lrc: record.get("hasLrc").and_then(Value::as_bool),
        highlight_start_time: record
            .get("highlightStartTime")
            .and_then(Value::as_f64)
            .filter(|t| t.is_finite()),
    }
}

/// Scores may live under `scores` or the legacy `score` key, with either
/// lower-case or capitalized dimension names.
fn sanitize_scores(song: &Map<String, Value>) -> Score {
    let scores = ["scores", "score"]
        .iter()
        .find_map(|key| song.get(*key).and_then(Value::as_object))
        .unwrap_or(&*EMPTY_RECORD);

    let dimension = |name: &str, legacy: &str| {
        scores
            .get(name)
            .or_else(|| scores.get(legacy))
            .map(parse_score_value)
            .unwrap_or(0.0)
    };

    Score {
        lyrics: dimension("lyrics", "Lyrics"),
        composition: dimension("composition", "Composition"),
        arrangement: dimension("arrangement", "Arrangement"),
    }
}

/// Read a dimension value as a float; anything unreadable is 0
pub fn parse_score_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => FLOAT_PREFIX
            .find(s.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok()),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Fresh random record id
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

fn as_record(value: &Value) -> &Map<String, Value> {
    value.as_object().unwrap_or(&*EMPTY_RECORD)
}

fn string_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

fn array_field<'a>(record: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
