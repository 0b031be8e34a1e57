use chrono::Utc;
use lens_core::{ArticleFetcher, ArticlePayload, ArticleRepository, NewArticle, Result};
use std::sync::Arc;
use tracing::info;

/// Get-or-fetch access to articles.
///
/// A URL already in the repository is returned as stored, however old, and
/// no request is made. Otherwise the page is fetched once and upserted; a
/// failed fetch writes nothing.
pub struct ArticleCacheService {
    repository: Arc<dyn ArticleRepository>,
    fetcher: Arc<dyn ArticleFetcher>,
}

impl ArticleCacheService {
    pub fn new(repository: Arc<dyn ArticleRepository>, fetcher: Arc<dyn ArticleFetcher>) -> Self {
        Self {
            repository,
            fetcher,
        }
    }

    pub async fn get_article(&self, url: &str) -> Result<ArticlePayload> {
        if let Some(cached) = self.repository.get_article(url).await? {
            info!("📦 Using cached article {} (fetched {})", url, cached.fetched_at);
            return Ok(cached.into());
        }

        info!("🌐 Fetching article {}", url);
        self.fetch_and_store(url).await
    }

    /// Fetches `url` even when cached, overwriting the stored row in place.
    pub async fn refresh_article(&self, url: &str) -> Result<ArticlePayload> {
        info!("🔄 Refreshing article {}", url);
        self.fetch_and_store(url).await
    }

    async fn fetch_and_store(&self, url: &str) -> Result<ArticlePayload> {
        let fetched = self.fetcher.fetch(url).await?;
        let record = self
            .repository
            .save_article(&NewArticle::new(
                url,
                fetched.title,
                fetched.content,
                Utc::now(),
            ))
            .await?;
        info!("💾 Cached article {} as #{}", url, record.id);
        Ok(record.into())
    }
}
