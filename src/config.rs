use anyhow::{Context, Result, anyhow};
use dotenv::dotenv;
use std::path::PathBuf;

use crate::llm::openai::{DEFAULT_API_URL, DEFAULT_MODEL};

pub const DEFAULT_DATABASE_PATH: &str = "transcriptions.db";
pub const DEFAULT_LANGUAGES: &str = "es";
pub const DEFAULT_JSON_LIMIT: usize = 1024 * 1024; // 1MB

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub openai_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub database_path: PathBuf,
    /// Caption languages in priority order.
    pub languages: Vec<String>,
    /// Answer 409 instead of re-transcribing an id that is already stored.
    pub reject_duplicates: bool,
    pub json_limit: usize,
}

impl ServiceConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let openai_key = lookup("OPENAI_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("OPENAI_KEY is not set"))?;

        let languages = parse_languages(
            &lookup("TRANSCRIPT_LANGUAGES").unwrap_or_else(|| DEFAULT_LANGUAGES.to_string()),
        );
        if languages.is_empty() {
            return Err(anyhow!("TRANSCRIPT_LANGUAGES must name at least one language"));
        }

        let reject_duplicates = match lookup("REJECT_DUPLICATES") {
            Some(v) => parse_bool(&v)
                .ok_or_else(|| anyhow!("REJECT_DUPLICATES must be true or false, got {v:?}"))?,
            None => false,
        };

        let json_limit = match lookup("JSON_LIMIT_BYTES") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("JSON_LIMIT_BYTES is not a number: {v:?}"))?,
            None => DEFAULT_JSON_LIMIT,
        };

        Ok(Self {
            openai_key,
            openai_api_url: lookup("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            database_path: PathBuf::from(
                lookup("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            ),
            languages,
            reject_duplicates,
            json_limit,
        })
    }
}

fn parse_languages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub struct ClientConfig {
    pub server_url: String,
}

impl ClientConfig {
    pub fn new(server_url: String) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }
}
