use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::dto::VideoIdRequest;

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let response_text = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response: {}", e))?;

    if !status.is_success() {
        return Err(anyhow!(
            "Server returned error {}: {}",
            status,
            response_text
        ));
    }

    serde_json::from_str(&response_text).map_err(|e| anyhow!("Failed to parse JSON response: {}", e))
}

fn video_body(video_id: &str) -> VideoIdRequest {
    VideoIdRequest {
        video_id: Some(video_id.to_string()),
    }
}

pub async fn check_server_health(config: &ClientConfig) -> Result<()> {
    let client = reqwest::Client::new();
    let url = config.endpoint("/api/v1/health");

    println!("🔍 Checking server health at: {url}");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| anyhow!("Failed to connect to server: {}", e))?;

    if response.status().is_success() {
        println!("✅ Server is healthy");
        Ok(())
    } else {
        Err(anyhow!("Server health check failed: {}", response.status()))
    }
}

pub async fn send_transcription_request(config: &ClientConfig, video_id: &str) -> Result<Value> {
    let url = config.endpoint("/api/v1/transcribe");
    println!("🚀 Sending transcription request for {video_id} to: {url}");

    let response = reqwest::Client::new()
        .post(&url)
        .json(&video_body(video_id))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    read_json(response).await
}

pub async fn list_transcriptions(config: &ClientConfig) -> Result<Value> {
    let response = reqwest::Client::new()
        .get(config.endpoint("/api/v1/youtube_transcription"))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    read_json(response).await
}

pub async fn delete_transcription(config: &ClientConfig, video_id: &str) -> Result<Value> {
    let response = reqwest::Client::new()
        .delete(config.endpoint("/api/v1/delete_transcription"))
        .json(&video_body(video_id))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    read_json(response).await
}

pub async fn run_transcribe(config: ClientConfig, video_id: &str) -> Result<()> {
    println!("🎬 YouTube Transcription Client");
    println!("===============================");

    if let Err(e) = check_server_health(&config).await {
        eprintln!("❌ {e}");
        eprintln!("💡 Make sure the server is running: yt-transcribe serve");
        return Err(e);
    }

    match send_transcription_request(&config, video_id).await {
        Ok(result) => {
            println!("\n✅ Transcription completed!");
            println!("📝 Result:");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            eprintln!("❌ Transcription failed: {e}");
            return Err(e);
        }
    }

    Ok(())
}

pub async fn run_list(config: ClientConfig) -> Result<()> {
    let result = list_transcriptions(&config).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn run_delete(config: ClientConfig, video_id: &str) -> Result<()> {
    match delete_transcription(&config, video_id).await {
        Ok(result) => {
            println!("🗑️  {}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Delete failed: {e}");
            Err(e)
        }
    }
}
