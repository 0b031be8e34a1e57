use async_trait::async_trait;
use lens_core::{
    content_digest, AnalysisRecord, Article, ArticleRepository, Error, NewAnalysis, NewArticle,
    Result,
};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredAnalysis {
    id: i64,
    analysis: NewAnalysis,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
    analyses: Vec<StoredAnalysis>,
    next_article_id: i64,
    next_analysis_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_article_id: 1,
            next_analysis_id: 1,
            ..Self::default()
        }
    }

    pub fn get_article(&self, url: &str) -> Option<Article> {
        self.articles.iter().find(|a| a.url == url).cloned()
    }

    pub fn save_article(&mut self, article: &NewArticle) -> Article {
        if let Some(existing) = self.articles.iter_mut().find(|a| a.url == article.url) {
            existing.title = article.title.clone();
            existing.content = article.content.clone();
            existing.content_hash = content_digest(&article.content);
            existing.fetched_at = article.fetched_at;
            return existing.clone();
        }

        let saved = Article {
            id: self.next_article_id,
            url: article.url.clone(),
            title: article.title.clone(),
            content: article.content.clone(),
            content_hash: content_digest(&article.content),
            fetched_at: article.fetched_at,
        };
        self.next_article_id += 1;
        self.articles.push(saved.clone());
        saved
    }

    pub fn record_analysis(&mut self, analysis: &NewAnalysis) -> Result<()> {
        if !self.articles.iter().any(|a| a.id == analysis.article_id) {
            return Err(Error::ReferentialIntegrity {
                article_id: analysis.article_id,
            });
        }
        self.analyses.push(StoredAnalysis {
            id: self.next_analysis_id,
            analysis: analysis.clone(),
        });
        self.next_analysis_id += 1;
        Ok(())
    }

    pub fn list_recent_analyses(&self, limit: usize) -> Vec<AnalysisRecord> {
        let mut records: Vec<AnalysisRecord> = self
            .analyses
            .iter()
            .filter_map(|stored| {
                let article = self.articles.iter().find(|a| a.id == stored.analysis.article_id)?;
                Some(AnalysisRecord {
                    id: stored.id,
                    article_id: article.id,
                    article_url: article.url.clone(),
                    article_title: article.title.clone(),
                    model_provider: stored.analysis.model_provider.clone(),
                    model_name: stored.analysis.model_name.clone(),
                    output_path: stored.analysis.output_path.clone(),
                    created_at: stored.analysis.created_at,
                })
            })
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        records
    }

    pub fn list_cached_articles(&self, limit: usize) -> Vec<Article> {
        let mut articles = self.articles.clone();
        articles.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at).then(b.id.cmp(&a.id)));
        articles.truncate(limit);
        articles
    }
}

/// In-process repository with the same upsert and integrity rules as the
/// SQLite backend. Nothing survives the process.
#[derive(Clone)]
pub struct MemoryRepository {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleRepository for MemoryRepository {
    async fn get_article(&self, url: &str) -> Result<Option<Article>> {
        Ok(self.store.read().await.get_article(url))
    }

    async fn save_article(&self, article: &NewArticle) -> Result<Article> {
        Ok(self.store.write().await.save_article(article))
    }

    async fn record_analysis(&self, analysis: &NewAnalysis) -> Result<()> {
        self.store.write().await.record_analysis(analysis)
    }

    async fn list_recent_analyses(&self, limit: usize) -> Result<Vec<AnalysisRecord>> {
        Ok(self.store.read().await.list_recent_analyses(limit))
    }

    async fn list_cached_articles(&self, limit: usize) -> Result<Vec<Article>> {
        Ok(self.store.read().await.list_cached_articles(limit))
    }
}
