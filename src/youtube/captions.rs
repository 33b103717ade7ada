//! Parsing for the two documents the loader reads: the player response
//! embedded in the watch page, and the timed-text caption XML.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::{LoaderError, VideoMetadata};

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";

static TEXT_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<text\b[^>]*>(.*?)</text>").expect("valid regex"));
static INNER_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid regex"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub video_details: Option<VideoDetails>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
pub struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    pub tracklist: Option<Tracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracklist {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` for auto-generated tracks.
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub title: Option<String>,
    pub author: Option<String>,
    pub short_description: Option<String>,
    pub view_count: Option<String>,
    pub length_seconds: Option<String>,
    pub thumbnail: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Extracts the `ytInitialPlayerResponse` object from a watch page.
pub fn extract_player_response(html: &str, video_id: &str) -> Result<PlayerResponse, LoaderError> {
    let missing = || LoaderError::PlayerResponseMissing(video_id.to_string());

    let start = html.find(PLAYER_RESPONSE_MARKER).ok_or_else(missing)?;
    let object = html[start + PLAYER_RESPONSE_MARKER.len()..].trim_start();
    // `null` or anything else that is not an object literal means no response.
    if !object.starts_with('{') {
        return Err(missing());
    }

    // The object is followed by more script, so only the first value is read.
    let mut values = serde_json::Deserializer::from_str(object).into_iter::<PlayerResponse>();
    match values.next() {
        Some(parsed) => Ok(parsed?),
        None => Err(missing()),
    }
}

impl PlayerResponse {
    pub fn caption_tracks(&self) -> &[CaptionTrack] {
        self.captions
            .as_ref()
            .and_then(|c| c.tracklist.as_ref())
            .map(|t| t.caption_tracks.as_slice())
            .unwrap_or_default()
    }

    pub fn metadata(&self, video_id: &str) -> VideoMetadata {
        let mut metadata = VideoMetadata {
            source: video_id.to_string(),
            ..Default::default()
        };
        if let Some(details) = &self.video_details {
            metadata.title = details.title.clone();
            metadata.author = details.author.clone();
            metadata.description = details.short_description.clone();
            metadata.view_count = details.view_count.as_deref().and_then(|v| v.parse().ok());
            metadata.length_seconds = details
                .length_seconds
                .as_deref()
                .and_then(|v| v.parse().ok());
            // Thumbnails are listed smallest first.
            metadata.thumbnail_url = details
                .thumbnail
                .as_ref()
                .and_then(|t| t.thumbnails.last())
                .map(|t| t.url.clone());
        }
        metadata
    }
}

/// Picks the track for the first requested language that has one, preferring
/// manually created captions over generated ones.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let mut matching = tracks.iter().filter(|t| &t.language_code == lang);
        let first = matching.clone().find(|t| !t.is_generated());
        first.or_else(|| matching.next())
    })
}

/// Returns the text of every `<text>` element in a timed-text document.
pub fn parse_timedtext(xml: &str) -> Vec<String> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|caps| {
            // Caption text arrives entity-encoded twice.
            let once = decode_entities(&caps[1]);
            let twice = decode_entities(&once);
            let stripped = INNER_TAG.replace_all(&twice, "");
            let line = stripped.trim();
            (!line.is_empty()).then(|| line.to_string())
        })
        .collect()
}

pub fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATCH_PAGE: &str = r#"<html><script>var ytInitialPlayerResponse = {"videoDetails":{"videoId":"dQw4w9WgXcQ","title":"Mi vlog","author":"Juan","lengthSeconds":"212","viewCount":"1500","shortDescription":"desc","thumbnail":{"thumbnails":[{"url":"https://i.ytimg.com/small.jpg"},{"url":"https://i.ytimg.com/large.jpg"}]}},"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://example.test/asr-es","languageCode":"es","kind":"asr"},{"baseUrl":"https://example.test/es","languageCode":"es"},{"baseUrl":"https://example.test/en","languageCode":"en"}]}}};var meta = {};</script></html>"#;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn reads_player_response_metadata() {
        let player = extract_player_response(WATCH_PAGE, "dQw4w9WgXcQ").unwrap();
        let metadata = player.metadata("dQw4w9WgXcQ");
        assert_eq!(metadata.title.as_deref(), Some("Mi vlog"));
        assert_eq!(metadata.author.as_deref(), Some("Juan"));
        assert_eq!(metadata.view_count, Some(1500));
        assert_eq!(metadata.length_seconds, Some(212));
        assert_eq!(
            metadata.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/large.jpg")
        );
        assert_eq!(player.caption_tracks().len(), 3);
    }

    #[test]
    fn page_without_player_response_fails() {
        let err = extract_player_response("<html></html>", "dQw4w9WgXcQ").unwrap_err();
        assert!(matches!(err, LoaderError::PlayerResponseMissing(_)));
    }

    #[test]
    fn null_player_response_is_missing() {
        let page = r#"<script>var ytInitialPlayerResponse = null;</script><script>var x = {"a":1};</script>"#;
        let err = extract_player_response(page, "dQw4w9WgXcQ").unwrap_err();
        assert!(matches!(err, LoaderError::PlayerResponseMissing(_)));
    }

    #[test]
    fn prefers_manual_track_then_language_order() {
        let player = extract_player_response(WATCH_PAGE, "dQw4w9WgXcQ").unwrap();
        let tracks = player.caption_tracks();

        let es = select_track(tracks, &langs(&["es"])).unwrap();
        assert_eq!(es.base_url, "https://example.test/es");

        let en = select_track(tracks, &langs(&["fr", "en", "es"])).unwrap();
        assert_eq!(en.base_url, "https://example.test/en");

        assert!(select_track(tracks, &langs(&["de"])).is_none());
    }

    #[test]
    fn falls_back_to_generated_track() {
        let tracks = vec![CaptionTrack {
            base_url: "https://example.test/asr".into(),
            language_code: "es".into(),
            kind: Some("asr".into()),
        }];
        let track = select_track(&tracks, &langs(&["es"])).unwrap();
        assert!(track.is_generated());
    }

    #[test]
    fn parses_timedtext_and_decodes_entities() {
        let xml = r##"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.1" dur="2">hola &amp;amp; bienvenidos</text><text start="2.1" dur="1.5">it&amp;#39;s <font color="#E5E5E5">fine</font></text><text start="4" dur="1">  </text></transcript>"##;
        let lines = parse_timedtext(xml);
        assert_eq!(lines, vec!["hola & bienvenidos", "it's fine"]);
    }

    #[test]
    fn unknown_entities_are_left_alone() {
        assert_eq!(decode_entities("a &bogus; b &#241;"), "a &bogus; b ñ");
    }
}
