use async_trait::async_trait;
use log::{debug, info, warn};

use super::captions::{extract_player_response, parse_timedtext, select_track};
use super::{LoaderError, TranscriptLoader, VideoDocument, VideoMetadata, validate_video_id};

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Loads captions straight from YouTube's watch page and timed-text endpoint.
#[derive(Clone)]
pub struct YoutubeLoader {
    client: reqwest::Client,
    base_url: String,
    add_video_info: bool,
}

impl YoutubeLoader {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            add_video_info: true,
        }
    }

    /// Whether title, author and thumbnail are copied into the metadata.
    pub fn add_video_info(mut self, enabled: bool) -> Self {
        self.add_video_info = enabled;
        self
    }

    async fn get_text(&self, url: &str) -> Result<String, LoaderError> {
        let response = self
            .client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

impl Default for YoutubeLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptLoader for YoutubeLoader {
    async fn load(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<Vec<VideoDocument>, LoaderError> {
        validate_video_id(video_id)?;

        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        debug!("Fetching watch page: {watch_url}");
        let html = self.get_text(&watch_url).await?;
        let player = extract_player_response(&html, video_id)?;

        let tracks = player.caption_tracks();
        if tracks.is_empty() {
            warn!("Video {video_id} has no caption tracks");
            return Err(LoaderError::CaptionsUnavailable(video_id.to_string()));
        }

        let track = select_track(tracks, languages).ok_or_else(|| {
            LoaderError::NoTrackForLanguages {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
            }
        })?;
        debug!(
            "Selected caption track: language={}, generated={}",
            track.language_code,
            track.is_generated()
        );

        let xml = self.get_text(&track.base_url).await?;
        let lines = parse_timedtext(&xml);
        info!(
            "Loaded transcript for {video_id}: {} caption lines in '{}'",
            lines.len(),
            track.language_code
        );

        let metadata = if self.add_video_info {
            player.metadata(video_id)
        } else {
            VideoMetadata {
                source: video_id.to_string(),
                ..Default::default()
            }
        };

        Ok(vec![VideoDocument {
            page_content: lines.join(" "),
            metadata,
        }])
    }
}
