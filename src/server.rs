use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    App, HttpResponse, HttpServer, Responder, delete, get, middleware::Logger, post, web,
};
use anyhow::Result;
use log::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::dto::{
    MessageResponse, TranscribeResponse, TranscriptionList, TranscriptionListItem, VideoIdRequest,
};
use crate::error::ApiError;
use crate::llm::OpenAiClient;
use crate::store::TranscriptionStore;
use crate::transcriber::Transcriber;
use crate::youtube::{YoutubeLoader, validate_video_id};

const HOME_PAGE: &str = "<h1>Transcripción de Videos de YouTube</h1>\n\
<p>API para transcribir videos de YouTube a texto utilizando el ID del video.</p>";
pub const DELETED_MESSAGE: &str = "Transcripción eliminada exitosamente";

pub struct AppState {
    pub store: TranscriptionStore,
    pub transcriber: Transcriber,
    pub reject_duplicates: bool,
}

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(HOME_PAGE)
}

#[get("/api/v1/health")]
pub async fn health_check() -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "YouTube transcription service is running"
    }))
}

#[post("/api/v1/transcribe")]
pub async fn transcribe(
    data: web::Data<AppState>,
    body: web::Json<VideoIdRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("Transcription request received");
    let video_id = require_video_id(body.into_inner())?;
    if validate_video_id(&video_id).is_err() {
        warn!("Rejecting malformed video id {video_id:?}");
        return Err(ApiError::InvalidVideoId(video_id));
    }

    if data.store.get(&video_id).await?.is_some() {
        if data.reject_duplicates {
            warn!("Transcription for {video_id} already exists");
            return Err(ApiError::AlreadyExists(video_id));
        }
        info!("Transcription for {video_id} already exists, transcribing again");
    }

    let record = data.transcriber.transcribe(&video_id).await?;
    data.store.insert(&record).await?;
    info!("Stored transcription {video_id} as '{}'", record.uri);

    Ok(HttpResponse::Ok().json(TranscribeResponse::from(record)))
}

#[get("/api/v1/youtube_transcription")]
pub async fn list_transcriptions(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let items: Vec<TranscriptionListItem> = data
        .store
        .list()
        .await?
        .into_iter()
        .map(TranscriptionListItem::from)
        .collect();
    debug!("Listing {} transcriptions", items.len());
    Ok(HttpResponse::Ok().json(TranscriptionList { items }))
}

#[delete("/api/v1/delete_transcription")]
pub async fn delete_transcription(
    data: web::Data<AppState>,
    body: web::Json<VideoIdRequest>,
) -> Result<HttpResponse, ApiError> {
    let video_id = require_video_id(body.into_inner())?;

    if !data.store.delete(&video_id).await? {
        warn!("Delete requested for unknown transcription {video_id}");
        return Err(ApiError::NotFound(video_id));
    }

    info!("Deleted transcription {video_id}");
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: DELETED_MESSAGE.to_string(),
    }))
}

fn require_video_id(body: VideoIdRequest) -> Result<String, ApiError> {
    match body.video_id.map(|id| id.trim().to_string()) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => {
            warn!("Request without video_id");
            Err(ApiError::MissingVideoId)
        }
    }
}

/// JSON extractor settings; malformed bodies answer with the same error shape
/// as every other client error.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(health_check)
        .service(transcribe)
        .service(list_transcriptions)
        .service(delete_transcription);
}

pub async fn run_server(host: String, port: u16, config: ServiceConfig) -> Result<()> {
    info!("Starting YouTube transcription service");
    info!(
        "Using configuration: api_url={}, database={:?}, languages={:?}, reject_duplicates={}",
        config.openai_api_url,
        config.database_path,
        config.languages,
        config.reject_duplicates
    );

    let store = TranscriptionStore::open(&config.database_path).await?;
    let llm = OpenAiClient::with_url(
        config.openai_key.clone(),
        config.openai_model.clone(),
        config.openai_api_url.clone(),
    );
    info!("Using chat model {}", llm.model());
    let transcriber = Transcriber::new(
        Arc::new(YoutubeLoader::new().add_video_info(true)),
        Arc::new(llm),
        config.languages.clone(),
    );

    let app_state = web::Data::new(AppState {
        store,
        transcriber,
        reject_duplicates: config.reject_duplicates,
    });
    let json_limit = config.json_limit;

    info!("Starting HTTP server on {host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(json_config(json_limit))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
