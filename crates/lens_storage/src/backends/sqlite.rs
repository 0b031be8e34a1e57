use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use lens_core::{
    content_digest, AnalysisRecord, Article, ArticleRepository, Error, NewAnalysis, NewArticle,
    Result,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Connection, Row};
use std::path::{Path, PathBuf};
use tracing::debug;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT UNIQUE NOT NULL,
        title TEXT,
        content TEXT NOT NULL,
        content_hash TEXT NOT NULL,
        fetched_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS analyses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        article_id INTEGER NOT NULL,
        model_provider TEXT NOT NULL,
        model_name TEXT NOT NULL,
        output_path TEXT NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY(article_id) REFERENCES articles(id)
    )
    "#,
];

const ARTICLE_COLUMNS: &str = "id, url, title, content, content_hash, fetched_at";

/// Article repository backed by a single SQLite file.
///
/// No connection is held between calls: each operation opens its own
/// connection, and dropping it on any exit path releases the file.
pub struct SqliteRepository {
    options: SqliteConnectOptions,
    db_path: PathBuf,
}

impl SqliteRepository {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let repository = Self {
            options,
            db_path: db_path.to_path_buf(),
        };

        let mut conn = repository.connect().await?;
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&mut conn)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }
        debug!("Database ready at {}", db_path.display());

        Ok(repository)
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))
    }
}

#[async_trait]
impl ArticleRepository for SqliteRepository {
    async fn get_article(&self, url: &str) -> Result<Option<Article>> {
        let mut conn = self.connect().await?;
        let row = sqlx::query(&format!("SELECT {} FROM articles WHERE url = ?", ARTICLE_COLUMNS))
            .bind(url)
            .fetch_optional(&mut conn)
            .await
            .map_err(|e| Error::Database(format!("Failed to get article: {}", e)))?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn save_article(&self, article: &NewArticle) -> Result<Article> {
        let mut conn = self.connect().await?;
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| Error::Database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO articles (url, title, content, content_hash, fetched_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                content_hash = excluded.content_hash,
                fetched_at = excluded.fetched_at
            "#,
        )
        .bind(&article.url)
        .bind(article.title.as_deref())
        .bind(&article.content)
        .bind(content_digest(&article.content))
        .bind(format_timestamp(&article.fetched_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Database(format!("Failed to save article: {}", e)))?;

        let row = sqlx::query(&format!("SELECT {} FROM articles WHERE url = ?", ARTICLE_COLUMNS))
            .bind(&article.url)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| Error::Database(format!("Failed to read back article: {}", e)))?;
        let saved = row_to_article(&row)?;

        tx.commit()
            .await
            .map_err(|e| Error::Database(format!("Failed to commit article: {}", e)))?;

        Ok(saved)
    }

    async fn record_analysis(&self, analysis: &NewAnalysis) -> Result<()> {
        let mut conn = self.connect().await?;
        sqlx::query(
            r#"
            INSERT INTO analyses (article_id, model_provider, model_name, output_path, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(analysis.article_id)
        .bind(&analysis.model_provider)
        .bind(&analysis.model_name)
        .bind(&analysis.output_path)
        .bind(format_timestamp(&analysis.created_at))
        .execute(&mut conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                Error::ReferentialIntegrity {
                    article_id: analysis.article_id,
                }
            }
            e => Error::Database(format!("Failed to record analysis: {}", e)),
        })?;

        Ok(())
    }

    async fn list_recent_analyses(&self, limit: usize) -> Result<Vec<AnalysisRecord>> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query(
            r#"
            SELECT
                analyses.id,
                analyses.article_id,
                articles.url AS article_url,
                articles.title AS article_title,
                analyses.model_provider,
                analyses.model_name,
                analyses.output_path,
                analyses.created_at
            FROM analyses
            INNER JOIN articles ON analyses.article_id = articles.id
            ORDER BY analyses.created_at DESC, analyses.id DESC
            LIMIT ?
            "#,
        )
        .bind(limit_param(limit))
        .fetch_all(&mut conn)
        .await
        .map_err(|e| Error::Database(format!("Failed to list analyses: {}", e)))?;

        rows.iter().map(row_to_analysis).collect()
    }

    async fn list_cached_articles(&self, limit: usize) -> Result<Vec<Article>> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query(&format!(
            "SELECT {} FROM articles ORDER BY fetched_at DESC, id DESC LIMIT ?",
            ARTICLE_COLUMNS
        ))
        .bind(limit_param(limit))
        .fetch_all(&mut conn)
        .await
        .map_err(|e| Error::Database(format!("Failed to list articles: {}", e)))?;

        rows.iter().map(row_to_article).collect()
    }
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Fixed-width RFC 3339 in UTC, so ordering the TEXT column is chronological.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        // Offset-less ISO-8601 is read as UTC.
        Err(err) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| Error::Timestamp(err)),
    }
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| Error::Database(format!("Failed to read column {}: {}", name, e)))
}

fn row_to_article(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: column(row, "id")?,
        url: column(row, "url")?,
        title: column(row, "title")?,
        content: column(row, "content")?,
        content_hash: column(row, "content_hash")?,
        fetched_at: parse_timestamp(&column::<String>(row, "fetched_at")?)?,
    })
}

fn row_to_analysis(row: &SqliteRow) -> Result<AnalysisRecord> {
    Ok(AnalysisRecord {
        id: column(row, "id")?,
        article_id: column(row, "article_id")?,
        article_url: column(row, "article_url")?,
        article_title: column(row, "article_title")?,
        model_provider: column(row, "model_provider")?,
        model_name: column(row, "model_name")?,
        output_path: column(row, "output_path")?,
        created_at: parse_timestamp(&column::<String>(row, "created_at")?)?,
    })
}
