pub mod captions;
pub mod loader;

use async_trait::async_trait;

pub use loader::YoutubeLoader;

/// One loaded transcript plus whatever metadata the loader could gather.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDocument {
    pub page_content: String,
    pub metadata: VideoMetadata,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoMetadata {
    /// The video id the document was loaded from.
    pub source: String,
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub view_count: Option<u64>,
    pub length_seconds: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("invalid video id: {0}")]
    InvalidVideoId(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("no player response found on watch page for {0}")]
    PlayerResponseMissing(String),

    #[error("malformed player response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("captions are not available for {0}")]
    CaptionsUnavailable(String),

    #[error("no transcript for {video_id} in languages {languages:?}")]
    NoTrackForLanguages {
        video_id: String,
        languages: Vec<String>,
    },
}

/// Source of video transcripts, keyed by video id and language preference.
#[async_trait]
pub trait TranscriptLoader: Send + Sync {
    async fn load(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<Vec<VideoDocument>, LoaderError>;
}

pub const VIDEO_ID_LEN: usize = 11;

/// YouTube ids are 11 characters from the URL-safe base64 alphabet.
pub fn validate_video_id(video_id: &str) -> Result<(), LoaderError> {
    let valid = video_id.len() == VIDEO_ID_LEN
        && video_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(LoaderError::InvalidVideoId(video_id.to_string()))
    }
}
