use serde::{Deserialize, Serialize};

use crate::store::Transcription;

/// Body of the transcribe and delete requests.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VideoIdRequest {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub title: String,
    pub transcription: String,
    pub content_html: String,
}

impl From<Transcription> for TranscribeResponse {
    fn from(t: Transcription) -> Self {
        Self {
            title: t.title,
            transcription: t.transcription,
            content_html: t.content_html,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptionListItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "contenido_transcription")]
    pub transcription: String,
}

impl From<Transcription> for TranscriptionListItem {
    fn from(t: Transcription) -> Self {
        Self {
            id: t.id,
            title: t.title,
            transcription: t.transcription,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptionList {
    pub items: Vec<TranscriptionListItem>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
