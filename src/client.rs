use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use ureq::Agent;
use urlencoding::encode;

use crate::config::SongListConfig;

/// Client for a Gemini-style `generateContent` endpoint, used to suggest
/// the track list of an album
pub struct SongListClient {
    agent: Agent,
    config: SongListConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl SongListClient {
    pub fn new(config: SongListConfig) -> Self {
        SongListClient {
            agent: Agent::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Ask the service for an album's track titles, in track order.
    /// Best effort: any failure, or a missing API key, gives an empty list.
    pub fn suggest_titles(&self, artist: &str, album: &str) -> Vec<String> {
        if !self.is_configured() {
            debug!("no song-list API key configured");
            return Vec::new();
        }
        match self.request_titles(artist, album) {
            Ok(titles) => titles,
            Err(e) => {
                warn!(artist, album, error = %e, "song-list request failed");
                Vec::new()
            }
        }
    }

    fn request_titles(&self, artist: &str, album: &str) -> Result<Vec<String>> {
        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            encode(&self.config.model),
            encode(api_key)
        );

        let prompt = format!(
            "List the track titles of the album \"{album}\" by \"{artist}\" in track order. \
             Reply with a JSON array of strings only."
        );

        let response = self
            .agent
            .post(&url)
            .send_json(json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .map_err(|e| anyhow::anyhow!("HTTP request failed: {}", e))?;

        let parsed: GenerateResponse = response
            .into_json()
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON response: {}", e))?;

        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .unwrap_or_default();

        Ok(parse_song_list(&text))
    }
}

/// Pull a list of titles out of a model reply. Accepts a bare JSON array or
/// one wrapped in a Markdown code fence; anything else gives an empty list.
pub fn parse_song_list(reply: &str) -> Vec<String> {
    let (Some(start), Some(end)) = (reply.find('['), reply.rfind(']')) else {
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }

    serde_json::from_str::<Vec<serde_json::Value>>(&reply[start..=end])
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        assert_eq!(
            parse_song_list(r#"["Come Together", "Something"]"#),
            vec!["Come Together", "Something"]
        );
    }

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "Here you go:\n```json\n[\"Speak to Me\", \" Breathe \", 3, \"\"]\n```";
        assert_eq!(parse_song_list(reply), vec!["Speak to Me", "Breathe"]);
    }

    #[test]
    fn test_parse_garbage_is_empty() {
        assert!(parse_song_list("I don't know that album.").is_empty());
        assert!(parse_song_list("] backwards [").is_empty());
        assert!(parse_song_list("[not json]").is_empty());
    }

    #[test]
    fn test_unconfigured_client_returns_empty_without_network() {
        let client = SongListClient::new(SongListConfig::default());
        assert!(!client.is_configured());
        assert!(client.suggest_titles("Pink Floyd", "Animals").is_empty());
    }
}
