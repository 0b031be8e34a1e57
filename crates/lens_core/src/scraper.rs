use async_trait::async_trait;
use crate::types::FetchedArticle;
use crate::Result;

#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Downloads `url` and extracts its readable text. One attempt, no retries.
    async fn fetch(&self, url: &str) -> Result<FetchedArticle>;
}
