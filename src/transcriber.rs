use std::sync::Arc;

use chrono::Local;
use log::{debug, info};

use crate::llm::{ChatCompleter, LlmError, prompts};
use crate::store::{CREATED_AT_FORMAT, Transcription};
use crate::text::{build_uri, clean_text};
use crate::youtube::{LoaderError, TranscriptLoader};

pub const UNTITLED: &str = "Sin título";

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no transcript found for {0}")]
    NoTranscript(String),

    #[error("transcript loader failed: {0}")]
    Loader(#[from] LoaderError),

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),
}

/// Turns a video id into an anonymized, HTML-rendered [`Transcription`].
#[derive(Clone)]
pub struct Transcriber {
    loader: Arc<dyn TranscriptLoader>,
    llm: Arc<dyn ChatCompleter>,
    languages: Vec<String>,
}

impl Transcriber {
    pub fn new(
        loader: Arc<dyn TranscriptLoader>,
        llm: Arc<dyn ChatCompleter>,
        languages: Vec<String>,
    ) -> Self {
        Self {
            loader,
            llm,
            languages,
        }
    }

    pub async fn transcribe(&self, video_id: &str) -> Result<Transcription, PipelineError> {
        let documents = self.loader.load(video_id, &self.languages).await?;
        let Some(first) = documents.first() else {
            return Err(PipelineError::NoTranscript(video_id.to_string()));
        };

        let text = documents
            .iter()
            .map(|d| d.page_content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let title = first.metadata.title.as_deref().unwrap_or(UNTITLED);
        let thumbnail_url = first.metadata.thumbnail_url.clone();
        debug!(
            "Video metadata: author={:?}, length={:?}s, views={:?}, description={} characters",
            first.metadata.author,
            first.metadata.length_seconds,
            first.metadata.view_count,
            first.metadata.description.as_deref().map_or(0, str::len)
        );
        info!(
            "Loaded {video_id}: {} documents, {} characters",
            documents.len(),
            text.len()
        );

        let cleaned = clean_text(&text);
        if cleaned.text.is_empty() {
            return Err(PipelineError::NoTranscript(video_id.to_string()));
        }

        let title = self
            .llm
            .complete(prompts::ANONYMIZE_TITLE, title, None)
            .await?;
        let uri = build_uri(&title);

        debug!(
            "Anonymizing transcript of {video_id} ({} characters, {} annotations dropped)",
            cleaned.text.len(),
            cleaned.annotations.len()
        );
        let transcription = self
            .llm
            .complete(
                prompts::ANONYMIZE_TRANSCRIPT,
                &cleaned.text,
                Some(prompts::ANONYMIZE_TRANSCRIPT_TEMPERATURE),
            )
            .await?;

        let html = self
            .llm
            .complete(prompts::TRANSCRIPT_TO_HTML, &transcription, None)
            .await?;

        info!("Transcription pipeline finished for {video_id}");
        Ok(Transcription {
            id: video_id.to_string(),
            title,
            transcription,
            content_html: strip_code_fence(&html).to_string(),
            thumbnail_url,
            uri,
            created_at: Local::now().format(CREATED_AT_FORMAT).to_string(),
        })
    }
}

/// Models sometimes wrap HTML in a Markdown fence despite the prompt.
fn strip_code_fence(s: &str) -> &str {
    let trimmed = s.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_suffix("```").unwrap_or(body);
    // Drop the info string (e.g. "html") on the opening line.
    match body.split_once('\n') {
        Some((info, rest)) if !info.contains('<') => rest.trim(),
        _ => body.trim(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::youtube::{VideoDocument, VideoMetadata};

    /// Returns the same canned documents for every id.
    pub struct FakeLoader {
        pub documents: Vec<VideoDocument>,
    }

    impl FakeLoader {
        pub fn with_title(title: Option<&str>, content: &str) -> Self {
            Self {
                documents: vec![VideoDocument {
                    page_content: content.to_string(),
                    metadata: VideoMetadata {
                        source: "dQw4w9WgXcQ".to_string(),
                        title: title.map(str::to_string),
                        thumbnail_url: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hq.jpg".into()),
                        ..Default::default()
                    },
                }],
            }
        }
    }

    #[async_trait]
    impl TranscriptLoader for FakeLoader {
        async fn load(
            &self,
            _video_id: &str,
            _languages: &[String],
        ) -> Result<Vec<VideoDocument>, LoaderError> {
            Ok(self.documents.clone())
        }
    }

    /// Tags each reply with the prompt it answered and records every call.
    #[derive(Default)]
    pub struct FakeLlm {
        pub calls: Mutex<Vec<(String, String, Option<f32>)>>,
    }

    #[async_trait]
    impl ChatCompleter for FakeLlm {
        async fn complete(
            &self,
            system: &str,
            user: &str,
            temperature: Option<f32>,
        ) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string(), temperature));
            let reply = if system == prompts::ANONYMIZE_TITLE {
                format!("Anon {user}")
            } else if system == prompts::ANONYMIZE_TRANSCRIPT {
                format!("anon: {user}")
            } else {
                format!("```html\n<p>{user}</p>\n```")
            };
            Ok(reply)
        }
    }

    fn transcriber(loader: FakeLoader, llm: Arc<FakeLlm>) -> Transcriber {
        Transcriber::new(Arc::new(loader), llm, vec!["es".to_string()])
    }

    #[tokio::test]
    async fn runs_the_three_completions_in_order() {
        let llm = Arc::new(FakeLlm::default());
        let loader = FakeLoader::with_title(Some("Vlog de María"), "[Música] hola   a todos");

        let result = transcriber(loader, llm.clone())
            .transcribe("dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(result.id, "dQw4w9WgXcQ");
        assert_eq!(result.title, "Anon Vlog de María");
        assert_eq!(result.uri, "anon-vlog-de-maria");
        assert_eq!(result.transcription, "anon: hola a todos");
        assert_eq!(result.content_html, "<p>anon: hola a todos</p>");
        assert_eq!(
            result.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hq.jpg")
        );
        assert_eq!(result.created_at.len(), "2024-01-01 00:00:00".len());

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].0, prompts::ANONYMIZE_TITLE);
        assert_eq!(calls[0].2, None);
        assert_eq!(calls[1].0, prompts::ANONYMIZE_TRANSCRIPT);
        assert_eq!(calls[1].2, Some(0.2));
        assert_eq!(calls[2].0, prompts::TRANSCRIPT_TO_HTML);
    }

    #[tokio::test]
    async fn missing_title_uses_fallback() {
        let llm = Arc::new(FakeLlm::default());
        let loader = FakeLoader::with_title(None, "contenido");

        let result = transcriber(loader, llm.clone())
            .transcribe("dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(result.title, "Anon Sin título");
    }

    #[tokio::test]
    async fn empty_loader_result_is_no_transcript() {
        let llm = Arc::new(FakeLlm::default());
        let loader = FakeLoader { documents: vec![] };

        let err = transcriber(loader, llm.clone())
            .transcribe("dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoTranscript(_)));
        assert!(llm.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_transcript_skips_the_llm() {
        let llm = Arc::new(FakeLlm::default());
        let loader = FakeLoader::with_title(Some("x"), "[Música]  ");

        let err = transcriber(loader, llm.clone())
            .transcribe("dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoTranscript(_)));
        assert!(llm.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fence("```html\n<p>a</p>\n```"), "<p>a</p>");
        assert_eq!(strip_code_fence("```<p>a</p>```"), "<p>a</p>");
        assert_eq!(strip_code_fence("  <p>a</p> "), "<p>a</p>");
    }
}
