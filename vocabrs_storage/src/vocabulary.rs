//! Reader for the device's vocabulary builder database.
//!
//! Lookups live in the `WORDS` table of a SQLite file; `timestamp` is
//! milliseconds since the Unix epoch.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::path::Path;
use tracing::{debug, info};
use vocabrs_core::{DevicePath, Error, LookupRecord, Result, VocabularyStore};

const REQUIRED_COLUMNS: [&str; 3] = ["word", "lang", "timestamp"];

const SELECT_SINCE: &str = "SELECT word, lang, timestamp FROM WORDS \
     WHERE word IS NOT NULL AND word <> '' AND timestamp > 0 AND timestamp > ?1 \
     ORDER BY timestamp ASC, rowid ASC";

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteVocabularyStore;

impl SqliteVocabularyStore {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VocabularyStore for SqliteVocabularyStore {
    async fn read_since(&self, device: &DevicePath, since: i64) -> Result<Vec<LookupRecord>> {
        let path = device.vocabulary_db();
        if !path.is_file() {
            return Err(Error::StoreUnavailable {
                path,
                reason: "file not found".to_string(),
            });
        }

        info!("Reading lookups from {}", path.display());
        read_records(&path, since)
            .await
            .map_err(|e| Error::StoreUnavailable {
                path,
                reason: format!("{e:#}"),
            })
    }
}

async fn read_records(path: &Path, since: i64) -> anyhow::Result<Vec<LookupRecord>> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .create_if_missing(false);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .context("cannot open database")?;

    check_schema(&mut conn).await?;

    let rows: Vec<(String, Option<String>, i64)> = sqlx::query_as(SELECT_SINCE)
        .bind(since)
        .fetch_all(&mut conn)
        .await
        .context("lookup query failed")?;
    conn.close().await?;

    debug!("Fetched {} rows newer than {since}", rows.len());
    Ok(rows
        .into_iter()
        .map(|(word, lang, timestamp)| LookupRecord {
            word,
            timestamp,
            language: lang.unwrap_or_default(),
        })
        .collect())
}

async fn check_schema(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('WORDS')")
        .fetch_all(&mut *conn)
        .await
        .context("cannot inspect schema")?;

    if columns.is_empty() {
        anyhow::bail!("incompatible schema: table WORDS is missing");
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !columns.iter().any(|c| c.eq_ignore_ascii_case(required)))
        .collect();
    if !missing.is_empty() {
        anyhow::bail!(
            "incompatible schema: WORDS lacks column(s) {}",
            missing.join(", ")
        );
    }
    Ok(())
}
