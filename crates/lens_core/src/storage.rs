use async_trait::async_trait;
use crate::types::{AnalysisRecord, Article, NewAnalysis, NewArticle};
use crate::Result;

/// Persistent store of fetched articles and the analyses run against them.
///
/// Every call is its own unit of work; implementations must not keep a
/// connection or transaction open between calls.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Exact-match lookup on the URL as given.
    async fn get_article(&self, url: &str) -> Result<Option<Article>>;

    /// Insert the article, or overwrite title, content, hash and fetch time of
    /// the row with the same URL while keeping its id. Returns the committed row.
    async fn save_article(&self, article: &NewArticle) -> Result<Article>;

    /// Append an analysis. Fails with `Error::ReferentialIntegrity` when the
    /// article does not exist.
    async fn record_analysis(&self, analysis: &NewAnalysis) -> Result<()>;

    /// Most recent analyses first, at most `limit`.
    async fn list_recent_analyses(&self, limit: usize) -> Result<Vec<AnalysisRecord>>;

    /// Most recently fetched articles first, at most `limit`.
    async fn list_cached_articles(&self, limit: usize) -> Result<Vec<Article>>;
}
