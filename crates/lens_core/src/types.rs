use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the extracted article text.
pub fn content_digest(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// A cached article as committed to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub content: String,
    pub content_hash: String,
    pub fetched_at: DateTime<Utc>,
}

/// Input for `ArticleRepository::save_article`.
///
/// Carries no digest: repositories hash `content` at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub url: String,
    pub title: Option<String>,
    pub content: String,
    pub fetched_at: DateTime<Utc>,
}

impl NewArticle {
    pub fn new(
        url: impl Into<String>,
        title: Option<String>,
        content: impl Into<String>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            url: url.into(),
            title,
            content: content.into(),
            fetched_at,
        }
    }
}

/// One analysis run, joined with the article it was run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub article_id: i64,
    pub article_url: String,
    pub article_title: Option<String>,
    pub model_provider: String,
    pub model_name: String,
    pub output_path: String,
    pub created_at: DateTime<Utc>,
}

/// Input for `ArticleRepository::record_analysis`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnalysis {
    pub article_id: i64,
    pub model_provider: String,
    pub model_name: String,
    pub output_path: String,
    pub created_at: DateTime<Utc>,
}

/// What a fetcher hands back: readable text plus an optional title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArticle {
    pub content: String,
    pub title: Option<String>,
}

/// Result of a get-or-fetch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePayload {
    pub record: Article,
    pub content: String,
    pub title: Option<String>,
}

impl From<Article> for ArticlePayload {
    fn from(record: Article) -> Self {
        Self {
            content: record.content.clone(),
            title: record.title.clone(),
            record,
        }
    }
}
