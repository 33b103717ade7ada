//! SQLite persistence for finished transcriptions.

use std::path::Path;

use log::{debug, info};
use rusqlite::{OptionalExtension, Row, params};
use tokio_rusqlite::Connection;

pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS youtube_transcription (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    transcription TEXT NOT NULL,
    content_html TEXT NOT NULL,
    thumbnail_url TEXT,
    uri TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

const COLUMNS: &str = "id, title, transcription, content_html, thumbnail_url, uri, created_at";

/// An anonymized transcript of one video, keyed by the video id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub id: String,
    pub title: String,
    pub transcription: String,
    pub content_html: String,
    pub thumbnail_url: Option<String>,
    pub uri: String,
    pub created_at: String,
}

impl Transcription {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            transcription: row.get(2)?,
            content_html: row.get(3)?,
            thumbnail_url: row.get(4)?,
            uri: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("database error: {0}")]
pub struct StoreError(#[from] tokio_rusqlite::Error);

#[derive(Clone)]
pub struct TranscriptionStore {
    conn: Connection,
}

impl TranscriptionStore {
    /// Opens (or creates) the database file and ensures the table exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        info!("Opening transcription database at {}", path.display());
        let conn = Connection::open(path).await?;
        Self::init(conn).await
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        Ok(Self { conn })
    }

    pub async fn get(&self, id: &str) -> Result<Option<Transcription>, StoreError> {
        let id = id.to_string();
        let found = self
            .conn
            .call(move |conn| {
                let row = conn
                    .query_row(
                        &format!("SELECT {COLUMNS} FROM youtube_transcription WHERE id = ?1"),
                        params![id],
                        Transcription::from_row,
                    )
                    .optional()?;
                Ok(row)
            })
            .await?;
        Ok(found)
    }

    /// Inserts the record, replacing any existing row with the same id.
    pub async fn insert(&self, record: &Transcription) -> Result<(), StoreError> {
        let record = record.clone();
        debug!("Storing transcription {}", record.id);
        self.conn
            .call(move |conn| {
                conn.execute(
                    &format!(
                        "INSERT OR REPLACE INTO youtube_transcription ({COLUMNS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                    ),
                    params![
                        record.id,
                        record.title,
                        record.transcription,
                        record.content_html,
                        record.thumbnail_url,
                        record.uri,
                        record.created_at
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Transcription>, StoreError> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM youtube_transcription ORDER BY created_at, id"
                ))?;
                let rows = stmt
                    .query_map([], Transcription::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows)
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let id = id.to_string();
        let removed = self
            .conn
            .call(move |conn| {
                let n = conn.execute("DELETE FROM youtube_transcription WHERE id = ?1", params![id])?;
                Ok(n > 0)
            })
            .await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, created_at: &str) -> Transcription {
        Transcription {
            id: id.to_string(),
            title: title.to_string(),
            transcription: format!("text of {id}"),
            content_html: format!("<p>text of {id}</p>"),
            thumbnail_url: None,
            uri: crate::text::build_uri(title),
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_then_get() {
        let store = TranscriptionStore::in_memory().await.unwrap();
        let mut rec = record("dQw4w9WgXcQ", "Una receta", "2024-05-01 10:00:00");
        rec.thumbnail_url = Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hq.jpg".to_string());
        store.insert(&rec).await.unwrap();

        assert_eq!(store.get("dQw4w9WgXcQ").await.unwrap(), Some(rec));
        assert_eq!(store.get("missing0000").await.unwrap(), None);
    }

    #[tokio::test]
    async fn insert_replaces_existing_id() {
        let store = TranscriptionStore::in_memory().await.unwrap();
        store
            .insert(&record("dQw4w9WgXcQ", "Primera", "2024-05-01 10:00:00"))
            .await
            .unwrap();
        store
            .insert(&record("dQw4w9WgXcQ", "Segunda", "2024-05-02 10:00:00"))
            .await
            .unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Segunda");
        assert_eq!(all[0].uri, "segunda");
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation() {
        let store = TranscriptionStore::in_memory().await.unwrap();
        store
            .insert(&record("bbbbbbbbbbb", "B", "2024-05-02 10:00:00"))
            .await
            .unwrap();
        store
            .insert(&record("aaaaaaaaaaa", "A", "2024-05-01 10:00:00"))
            .await
            .unwrap();

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["aaaaaaaaaaa", "bbbbbbbbbbb"]);
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let store = TranscriptionStore::in_memory().await.unwrap();
        store
            .insert(&record("dQw4w9WgXcQ", "X", "2024-05-01 10:00:00"))
            .await
            .unwrap();

        assert!(store.delete("dQw4w9WgXcQ").await.unwrap());
        assert!(!store.delete("dQw4w9WgXcQ").await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }
}
